//! Bubbletrack - per-person video bubble tracking core.
//!
//! Takes the per-frame bounding boxes produced by an external face detector
//! and turns them into a stable set of identity-persistent tracks, then maps
//! the live tracks onto a fixed number of display slots for an external
//! renderer to paint. The two stages are the [`centroid::CentroidTracker`]
//! and the [`slots::SlotAssigner`]; [`Pipeline`] runs them back-to-back once
//! per detection cycle.

use serde::{Deserialize, Serialize};

pub mod centroid;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod slots;

pub use centroid::{CentroidTracker, Track};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use slots::{SlotAssigner, SlotPolicy};

/// Axis-aligned bounding box for a single frame, in image-pixel coordinates.
///
/// Detections are ephemeral: the detector produces a fresh list every cycle
/// and the tracker copies the box of whichever detection a track adopts.
/// Geometry is opaque to the core; degenerate widths and heights are carried
/// through unchanged, any clamping belongs to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Detection {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center of the box, the only geometric property matching looks at.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Euclidean distance between the centers of two boxes. Unnormalized: a
    /// large and a small face at equal center distance are equally close.
    pub fn center_distance(&self, other: &Detection) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::Detection;

    #[test]
    fn test_center() {
        let det = Detection::new(10.0, 20.0, 50.0, 30.0);
        assert_eq!(det.center(), (35.0, 35.0));
    }

    #[test]
    fn test_center_distance() {
        let a = Detection::new(0.0, 0.0, 10.0, 10.0);
        let b = Detection::new(3.0, 4.0, 10.0, 10.0);
        assert!((a.center_distance(&b) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_center_distance_ignores_size() {
        let small = Detection::new(0.0, 0.0, 10.0, 10.0);
        let large = Detection::new(-45.0, -45.0, 100.0, 100.0);
        // both centered on (5, 5)
        assert!(small.center_distance(&large) < f32::EPSILON);
    }

    #[test]
    fn test_degenerate_box_is_carried() {
        let det = Detection::new(5.0, 5.0, 0.0, -2.0);
        assert_eq!(det.center(), (5.0, 4.0));
    }
}
