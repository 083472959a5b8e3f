//! The per-cycle driver: tracker and slot assigner run back-to-back.

use crate::{
    centroid::{CentroidTracker, Track},
    config::PipelineConfig,
    error::Result,
    slots::{SlotAssigner, SlotPolicy},
    Detection,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Owns the tracker, the slot assigner, and the randomness source, and runs
/// one detection cycle at a time.
///
/// Strictly sequential and single-threaded: the caller invokes [`update`]
/// once per detection cycle with a monotonically non-decreasing timestamp,
/// and nothing else may mutate the track set between cycles. The returned
/// per-slot boxes are snapshots; the renderer never holds references into
/// tracker state.
///
/// [`update`]: Pipeline::update
#[derive(Debug)]
pub struct Pipeline<R: Rng = StdRng> {
    tracker: CentroidTracker,
    assigner: SlotAssigner,
    rng: R,
    last_now: Option<u64>,
}

impl<R: Rng> Pipeline<R> {
    /// Run one detection cycle and return the per-slot output for the
    /// renderer: index `i` holds the box to paint into slot `i`, or `None`
    /// to leave the slot empty.
    ///
    /// Panics if `now` goes backwards across calls; matching correctness
    /// depends on time moving forward, so the contract violation fails
    /// loudly instead of producing undefined ordering.
    pub fn update(&mut self, detections: &[Detection], now: u64) -> Vec<Option<Detection>> {
        if let Some(last) = self.last_now {
            assert!(
                now >= last,
                "cycle timestamp went backwards: {} < {}",
                now,
                last
            );
        }
        self.last_now = Some(now);

        self.tracker.update(detections, now);
        self.assigner.assign(self.tracker.tracks_mut(), &mut self.rng)
    }

    /// Live tracks in creation order, read-only.
    pub fn active_tracks(&self) -> &[Track] {
        self.tracker.tracks()
    }
}

/// Builds a [`Pipeline`] from an optional YAML/JSON configuration plus
/// field-level overrides.
///
/// ```rust
/// # use bubbletrack::{PipelineBuilder, SlotPolicy, Result};
/// # fn main() -> Result<()> {
/// let pipeline = PipelineBuilder::new()
///     .with_num_slots(4)
///     .with_slot_policy(SlotPolicy::StickyRandom)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config_src: Option<ConfigSource>,
    match_distance_threshold: Option<f32>,
    stale_timeout_ms: Option<u64>,
    num_slots: Option<usize>,
    slot_policy: Option<SlotPolicy>,
}

#[derive(Debug, Clone, PartialEq)]
enum ConfigSource {
    Yaml(String),
    Json(String),
    Config(PipelineConfig),
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML string. The string is not parsed
    /// until [`build`](PipelineBuilder::build).
    pub fn with_config_yaml_str(mut self, yaml_str: String) -> Self {
        self.config_src.replace(ConfigSource::Yaml(yaml_str));
        self
    }

    /// Loads configuration from a JSON string. The string is not parsed
    /// until [`build`](PipelineBuilder::build).
    pub fn with_config_json_str(mut self, json_str: String) -> Self {
        self.config_src.replace(ConfigSource::Json(json_str));
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config_src.replace(ConfigSource::Config(config));
        self
    }

    pub fn with_match_distance_threshold(mut self, pixels: f32) -> Self {
        self.match_distance_threshold = Some(pixels);
        self
    }

    pub fn with_stale_timeout_ms(mut self, millis: u64) -> Self {
        self.stale_timeout_ms = Some(millis);
        self
    }

    pub fn with_num_slots(mut self, num_slots: usize) -> Self {
        self.num_slots = Some(num_slots);
        self
    }

    pub fn with_slot_policy(mut self, policy: SlotPolicy) -> Self {
        self.slot_policy = Some(policy);
        self
    }

    /// Builds the pipeline with an OS-seeded randomness source. Use
    /// [`build_with_rng`](PipelineBuilder::build_with_rng) where slot draws
    /// must be reproducible.
    pub fn build(self) -> Result<Pipeline<StdRng>> {
        self.build_with_rng(StdRng::from_entropy())
    }

    /// Builds the pipeline with a caller-supplied randomness source, used
    /// for the sticky-random slot draws.
    pub fn build_with_rng<R: Rng>(self, rng: R) -> Result<Pipeline<R>> {
        let mut config = match self.config_src {
            Some(ConfigSource::Yaml(yaml)) => PipelineConfig::from_yaml_str(&yaml)?,
            Some(ConfigSource::Json(json)) => PipelineConfig::from_json_str(&json)?,
            Some(ConfigSource::Config(config)) => config,
            None => PipelineConfig::default(),
        };

        if let Some(pixels) = self.match_distance_threshold {
            config.match_distance_threshold = pixels;
        }
        if let Some(millis) = self.stale_timeout_ms {
            config.stale_timeout_ms = millis;
        }
        if let Some(num_slots) = self.num_slots {
            config.num_slots = num_slots;
        }
        if let Some(policy) = self.slot_policy {
            config.slot_policy = policy;
        }
        let config = config.validate()?;

        Ok(Pipeline {
            tracker: CentroidTracker::new(config.match_distance_threshold, config.stale_timeout_ms),
            assigner: SlotAssigner::new(config.num_slots, config.slot_policy),
            rng,
            last_now: None,
        })
    }
}
