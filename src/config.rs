//! Pipeline configuration, loadable from YAML or JSON.

use crate::{error::Result, Error, SlotPolicy};
use serde::{Deserialize, Serialize};

/// Construction-time configuration for the whole pipeline.
///
/// ```rust
/// # use bubbletrack::{PipelineConfig, SlotPolicy};
/// let config = PipelineConfig::from_yaml_str(
///     "match_distance_threshold: 80.0\n\
///      stale_timeout_ms: 500\n\
///      num_slots: 3\n\
///      slot_policy: sticky-random\n",
/// )
/// .unwrap();
/// assert_eq!(config.num_slots, 3);
/// assert_eq!(config.slot_policy, SlotPolicy::StickyRandom);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum center distance, in pixels, for a detection to extend a track.
    pub match_distance_threshold: f32,
    /// Milliseconds without a match before a track is evicted.
    pub stale_timeout_ms: u64,
    /// Number of display slots, at least 1.
    pub num_slots: usize,
    /// Track-to-slot policy, `arrival-order` or `sticky-random`.
    pub slot_policy: SlotPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            match_distance_threshold: 80.0,
            stale_timeout_ms: 500,
            num_slots: 3,
            slot_policy: SlotPolicy::ArrivalOrder,
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: PipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()
    }

    pub(crate) fn validate(self) -> Result<Self> {
        if self.num_slots == 0 {
            return Err(Error::InvalidSlotCount(self.num_slots));
        }
        Ok(self)
    }
}
