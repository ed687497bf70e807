//! A fixed set of processors multiplexed across many zones.
//!
//! Building a [`ZoneProcessor`](crate::ZoneProcessor) is cheap but its
//! year memo is not, so callers juggling several zones keep a small
//! cache of bound processors instead of one per zone. Replacement is
//! least-recently-used, driven by a monotonic tick.

use log::trace;

use crate::processor::ZoneProcessor;
use crate::zonedb::ZoneInfo;

#[derive(Debug)]
pub struct ZoneProcessorCache<const SLOTS: usize> {
    slots: [Option<ZoneProcessor>; SLOTS],
    last_used: [u32; SLOTS],
    tick: u32,
}

impl<const SLOTS: usize> ZoneProcessorCache<SLOTS> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: [const { None }; SLOTS],
            last_used: [0; SLOTS],
            tick: 0,
        }
    }

    /// The processor bound to `zone_info`, binding a free or
    /// least-recently-used slot when the zone is not cached yet.
    pub fn processor_for(&mut self, zone_info: &'static ZoneInfo) -> &mut ZoneProcessor {
        self.tick = self.tick.wrapping_add(1);

        let slot = self.slots.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|processor| processor.zone_id() == zone_info.zone_id)
        });
        let slot = slot.unwrap_or_else(|| {
            let victim = self.victim_slot();
            trace!("caching processor for {} in slot {victim}", zone_info.name);
            self.slots[victim] = Some(ZoneProcessor::new(zone_info));
            victim
        });

        self.last_used[slot] = self.tick;
        self.slots[slot]
            .as_mut()
            .expect("slot was filled above")
    }

    /// Number of slots currently bound to a zone.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    fn victim_slot(&self) -> usize {
        if let Some(free) = self.slots.iter().position(Option::is_none) {
            return free;
        }
        let mut victim = 0;
        for slot in 1..SLOTS {
            if self.last_used[slot] < self.last_used[victim] {
                victim = slot;
            }
        }
        victim
    }
}

impl<const SLOTS: usize> Default for ZoneProcessorCache<SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::ZoneProcessorCache;
    use crate::zonedb::data::{AMERICA_LOS_ANGELES, AMERICA_NEW_YORK, AMERICA_ST_JOHNS};

    #[test]
    fn rebinding_is_cached() {
        let mut cache = ZoneProcessorCache::<2>::new();
        assert!(cache.is_empty());

        let id = cache.processor_for(&AMERICA_LOS_ANGELES).zone_id();
        assert_eq!(id, AMERICA_LOS_ANGELES.zone_id);
        assert_eq!(cache.len(), 1);

        // Same zone again: no new slot.
        let _ = cache.processor_for(&AMERICA_LOS_ANGELES);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn least_recently_used_slot_is_evicted() {
        let mut cache = ZoneProcessorCache::<2>::new();
        let _ = cache.processor_for(&AMERICA_LOS_ANGELES);
        let _ = cache.processor_for(&AMERICA_NEW_YORK);
        // Touch Los Angeles so New York becomes the oldest.
        let _ = cache.processor_for(&AMERICA_LOS_ANGELES);

        let _ = cache.processor_for(&AMERICA_ST_JOHNS);
        assert_eq!(cache.len(), 2);

        // Los Angeles survived; New York was evicted and rebinding it
        // evicts the now-oldest St Johns.
        let survivors = [
            cache.processor_for(&AMERICA_LOS_ANGELES).zone_id(),
            cache.processor_for(&AMERICA_NEW_YORK).zone_id(),
        ];
        assert_eq!(
            survivors,
            [AMERICA_LOS_ANGELES.zone_id, AMERICA_NEW_YORK.zone_id]
        );
    }

    #[test]
    fn cached_processors_answer_queries() {
        let mut cache = ZoneProcessorCache::<2>::new();
        let processor = cache.processor_for(&AMERICA_LOS_ANGELES);
        // 2018-03-11T10:00:00Z.
        assert_eq!(
            processor.utc_offset(574_077_600).unwrap().minutes(),
            -7 * 60
        );
    }
}
