//! Greedy nearest-centroid multi-object tracker.
//!
//! Association is a single pass over the tracks in creation order: each
//! track claims the globally closest unclaimed detection within the match
//! threshold. This is a deliberate greedy approximation, not an optimal
//! bipartite assignment; an earlier-created track always wins a contested
//! detection and a later track settles for a farther one or goes unmatched.

use crate::Detection;
use log::{debug, trace};

/// A persistent identity built up from matched detections.
///
/// `id` is assigned once at creation and never reused, even across track
/// deaths. `last_seen` advances only on cycles where the track matched a
/// detection. `slot` is populated and cleared only by the slot assigner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub id: u64,
    pub bbox: Detection,
    pub last_seen: u64,
    pub slot: Option<usize>,
}

/// Tracker state: the live track set in creation order plus the id counter.
#[derive(Debug, Default)]
pub struct CentroidTracker {
    /// Maximum center distance, in pixels, for a detection to extend a track.
    pub match_distance_threshold: f32,
    /// Milliseconds without a match before a track is evicted.
    pub stale_timeout: u64,

    tracks: Vec<Track>,
    next_id: u64,
}

impl CentroidTracker {
    pub fn new(match_distance_threshold: f32, stale_timeout: u64) -> Self {
        Self {
            match_distance_threshold,
            stale_timeout,
            tracks: Vec::new(),
            next_id: 0,
        }
    }

    /// Advance the tracker by one detection cycle.
    ///
    /// Matched tracks adopt their detection's box and refresh `last_seen`,
    /// unclaimed detections become new tracks, and stale tracks are removed.
    /// Eviction runs after matching and creation, so a track matched this
    /// cycle can never be evicted in the same cycle. `now` must be
    /// monotonically non-decreasing across calls.
    pub fn update(&mut self, detections: &[Detection], now: u64) {
        let mut claimed = vec![false; detections.len()];

        for track in &mut self.tracks {
            let mut best: Option<(usize, f32)> = None;
            for (i, det) in detections.iter().enumerate() {
                if claimed[i] {
                    continue;
                }
                let dist = track.bbox.center_distance(det);
                if best.map_or(true, |(_, d)| dist < d) {
                    best = Some((i, dist));
                }
            }

            if let Some((i, dist)) = best {
                if dist < self.match_distance_threshold {
                    trace!(
                        "track {} matched detection {} at distance {:.1}",
                        track.id,
                        i,
                        dist
                    );
                    track.bbox = detections[i];
                    track.last_seen = now;
                    claimed[i] = true;
                }
            }
        }

        self.create_new_tracks(detections, &claimed, now);
        self.remove_stale_tracks(now);
    }

    /// Create new tracks for every detection left unclaimed this cycle.
    fn create_new_tracks(&mut self, detections: &[Detection], claimed: &[bool], now: u64) {
        for (i, det) in detections.iter().enumerate() {
            if claimed[i] {
                continue;
            }

            let id = self.next_id;
            self.next_id += 1;
            debug!("track {} created at {:?}", id, det.center());
            self.tracks.push(Track {
                id,
                bbox: *det,
                last_seen: now,
                slot: None,
            });
        }
    }

    /// Remove every track whose staleness deadline has passed.
    fn remove_stale_tracks(&mut self, now: u64) {
        // retain, not swap_remove: the track set stays in creation order
        let stale_timeout = self.stale_timeout;
        self.tracks.retain(|track| {
            let stale = now.saturating_sub(track.last_seen) >= stale_timeout;
            if stale {
                debug!("track {} removed, last seen {}", track.id, track.last_seen);
            }
            !stale
        });
    }

    /// Live tracks in creation order.
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub(crate) fn tracks_mut(&mut self) -> &mut [Track] {
        &mut self.tracks
    }
}
