//! Track-to-display-slot assignment.
//!
//! The renderer exposes a fixed number of display slots, referenced only by
//! index; slot geometry lives renderer-side. The assigner decides which live
//! track, if any, is painted into each slot.

use crate::{centroid::Track, Detection};
use log::{debug, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How tracks are mapped onto slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotPolicy {
    /// Sort by ascending track id and fill slots 0..N in that order, from
    /// scratch every cycle. Not sticky: evicting the lowest id shifts every
    /// later track down a slot.
    #[serde(rename = "arrival-order")]
    ArrivalOrder,
    /// Each new track draws a uniformly random free slot at creation and
    /// keeps it for its whole lifetime. If no slot is free the track stays
    /// slot-less for its whole lifetime, even if a slot frees up later;
    /// freed slots go only to tracks created afterwards. The original
    /// system behaves this way and it is preserved as-is, see DESIGN.md.
    #[serde(rename = "sticky-random")]
    StickyRandom,
}

/// Maps live tracks onto a fixed number of display slots.
///
/// Owns the track-to-slot relation: under [`SlotPolicy::StickyRandom`] it
/// writes `Track::slot` and remembers which track ids it has already offered
/// a slot, so a slot-less track is never reconsidered.
#[derive(Debug)]
pub struct SlotAssigner {
    num_slots: usize,
    policy: SlotPolicy,
    /// Ids below this have had their one sticky-random draw.
    offered_up_to: u64,
}

impl SlotAssigner {
    /// Panics if `num_slots` is zero; a slotless display is a caller bug.
    pub fn new(num_slots: usize, policy: SlotPolicy) -> Self {
        assert!(num_slots >= 1, "display needs at least one slot");
        Self {
            num_slots,
            policy,
            offered_up_to: 0,
        }
    }

    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    pub fn policy(&self) -> SlotPolicy {
        self.policy
    }

    /// Produce the per-slot output for this cycle: index `i` holds the box
    /// of whichever track occupies slot `i`, or `None` for an empty slot.
    ///
    /// `tracks` must be in creation order (ascending id), which the tracker
    /// maintains. The RNG is only consulted under sticky-random.
    pub fn assign<R: Rng>(&mut self, tracks: &mut [Track], rng: &mut R) -> Vec<Option<Detection>> {
        match self.policy {
            SlotPolicy::ArrivalOrder => self.assign_arrival_order(tracks),
            SlotPolicy::StickyRandom => self.assign_sticky_random(tracks, rng),
        }
    }

    fn assign_arrival_order(&self, tracks: &[Track]) -> Vec<Option<Detection>> {
        let mut by_id: Vec<&Track> = tracks.iter().collect();
        by_id.sort_by_key(|track| track.id);

        let mut slots = vec![None; self.num_slots];
        for (slot, track) in slots.iter_mut().zip(by_id) {
            *slot = Some(track.bbox);
        }
        slots
    }

    fn assign_sticky_random<R: Rng>(
        &mut self,
        tracks: &mut [Track],
        rng: &mut R,
    ) -> Vec<Option<Detection>> {
        let mut free: Vec<usize> = (0..self.num_slots)
            .filter(|&i| !tracks.iter().any(|track| track.slot == Some(i)))
            .collect();

        // offer each track a slot exactly once, at creation
        for track in tracks.iter_mut() {
            if track.id < self.offered_up_to {
                continue;
            }
            self.offered_up_to = track.id + 1;

            if free.is_empty() {
                trace!("track {} created with all slots occupied", track.id);
                continue;
            }
            let slot = free.swap_remove(rng.gen_range(0..free.len()));
            debug!("track {} pinned to slot {}", track.id, slot);
            track.slot = Some(slot);
        }

        let mut slots = vec![None; self.num_slots];
        for track in tracks.iter() {
            if let Some(i) = track.slot {
                if i < self.num_slots {
                    slots[i] = Some(track.bbox);
                }
            }
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::{SlotAssigner, SlotPolicy};
    use crate::{centroid::Track, Detection};
    use rand::{rngs::StdRng, SeedableRng};

    fn track(id: u64) -> Track {
        Track {
            id,
            bbox: Detection::new(id as f32 * 100.0, 0.0, 50.0, 50.0),
            last_seen: 0,
            slot: None,
        }
    }

    #[test]
    fn test_arrival_order_sorts_by_id() {
        let mut assigner = SlotAssigner::new(3, SlotPolicy::ArrivalOrder);
        let mut rng = StdRng::seed_from_u64(0);

        // iteration order deliberately scrambled
        let mut tracks = vec![track(9), track(3), track(7)];
        let slots = assigner.assign(&mut tracks, &mut rng);

        assert_eq!(slots[0], Some(track(3).bbox));
        assert_eq!(slots[1], Some(track(7).bbox));
        assert_eq!(slots[2], Some(track(9).bbox));
    }

    #[test]
    fn test_arrival_order_overflow_truncated() {
        let mut assigner = SlotAssigner::new(2, SlotPolicy::ArrivalOrder);
        let mut rng = StdRng::seed_from_u64(0);

        let mut tracks = vec![track(0), track(1), track(2)];
        let slots = assigner.assign(&mut tracks, &mut rng);

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0], Some(track(0).bbox));
        assert_eq!(slots[1], Some(track(1).bbox));
    }

    #[test]
    fn test_arrival_order_shifts_on_eviction() {
        let mut assigner = SlotAssigner::new(2, SlotPolicy::ArrivalOrder);
        let mut rng = StdRng::seed_from_u64(0);

        let mut tracks = vec![track(0), track(1), track(2)];
        assigner.assign(&mut tracks, &mut rng);

        // lowest id gone: everyone moves down, slotless track 2 appears
        let mut tracks = vec![track(1), track(2)];
        let slots = assigner.assign(&mut tracks, &mut rng);
        assert_eq!(slots[0], Some(track(1).bbox));
        assert_eq!(slots[1], Some(track(2).bbox));
    }

    #[test]
    fn test_empty_track_set_yields_empty_slots() {
        let mut assigner = SlotAssigner::new(3, SlotPolicy::ArrivalOrder);
        let mut rng = StdRng::seed_from_u64(0);

        let slots = assigner.assign(&mut [], &mut rng);
        assert_eq!(slots, vec![None, None, None]);
    }

    #[test]
    #[should_panic(expected = "at least one slot")]
    fn test_zero_slots_panics() {
        let _ = SlotAssigner::new(0, SlotPolicy::ArrivalOrder);
    }

    #[test]
    fn test_sticky_slot_persists_across_churn() {
        let mut assigner = SlotAssigner::new(3, SlotPolicy::StickyRandom);
        let mut rng = StdRng::seed_from_u64(42);

        let mut tracks = vec![track(0)];
        assigner.assign(&mut tracks, &mut rng);
        let pinned = tracks[0].slot.unwrap();

        // other tracks come and go; track 0 keeps its slot
        let mut tracks = vec![tracks[0], track(1), track(2)];
        assigner.assign(&mut tracks, &mut rng);
        assert_eq!(tracks[0].slot, Some(pinned));

        let mut tracks = vec![tracks[0], track(5)];
        let slots = assigner.assign(&mut tracks, &mut rng);
        assert_eq!(tracks[0].slot, Some(pinned));
        assert_eq!(slots[pinned], Some(tracks[0].bbox));
    }

    #[test]
    fn test_sticky_slots_unique() {
        let mut assigner = SlotAssigner::new(4, SlotPolicy::StickyRandom);
        let mut rng = StdRng::seed_from_u64(7);

        let mut tracks = vec![track(0), track(1), track(2), track(3)];
        assigner.assign(&mut tracks, &mut rng);

        let mut seen: Vec<usize> = tracks.iter().map(|t| t.slot.unwrap()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_sticky_excess_track_never_displayed() {
        let mut assigner = SlotAssigner::new(2, SlotPolicy::StickyRandom);
        let mut rng = StdRng::seed_from_u64(3);

        let mut tracks = vec![track(0), track(1), track(2)];
        assigner.assign(&mut tracks, &mut rng);
        assert!(tracks[2].slot.is_none());

        // a slot frees up when track 0 dies, but track 2 already had its
        // one offer and stays undisplayed
        let mut tracks = vec![tracks[1], tracks[2]];
        let slots = assigner.assign(&mut tracks, &mut rng);
        assert!(tracks[1].slot.is_none());
        assert_eq!(slots.iter().filter(|s| s.is_some()).count(), 1);
    }

    #[test]
    fn test_sticky_freed_slot_goes_to_new_track() {
        let mut assigner = SlotAssigner::new(1, SlotPolicy::StickyRandom);
        let mut rng = StdRng::seed_from_u64(11);

        let mut tracks = vec![track(0)];
        assigner.assign(&mut tracks, &mut rng);
        assert_eq!(tracks[0].slot, Some(0));

        // track 0 evicted, a later track inherits the freed slot
        let mut tracks = vec![track(4)];
        let slots = assigner.assign(&mut tracks, &mut rng);
        assert_eq!(tracks[0].slot, Some(0));
        assert_eq!(slots[0], Some(track(4).bbox));
    }

    #[test]
    fn test_sticky_reproducible_with_seed() {
        let mut tracks_a = vec![track(0), track(1), track(2)];
        let mut tracks_b = tracks_a.clone();

        let mut assigner_a = SlotAssigner::new(5, SlotPolicy::StickyRandom);
        let mut assigner_b = SlotAssigner::new(5, SlotPolicy::StickyRandom);
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);

        let slots_a = assigner_a.assign(&mut tracks_a, &mut rng_a);
        let slots_b = assigner_b.assign(&mut tracks_b, &mut rng_b);
        assert_eq!(slots_a, slots_b);
    }
}
