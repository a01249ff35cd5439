//! Fixed-capacity ring buffer of recent tick updates
//!
//! Slot `id % HISTORY_CAPACITY` holds the update for tick `id`, so each slot
//! is reused once per wrap-around cycle. Looking up a tick older than the
//! last `HISTORY_CAPACITY` ticks silently returns whatever newer update has
//! overwritten its slot; `valid_for` exists so callers can detect that case
//! without changing the lookup behavior itself.

use super::TickUpdate;

/// Number of tick updates retained before slots are reused
pub const HISTORY_CAPACITY: usize = 20;

/// Ring buffer of the most recent client tick updates
#[derive(Debug)]
pub struct UpdateHistory {
    slots: Vec<Option<TickUpdate>>,
}

impl UpdateHistory {
    pub fn new() -> Self {
        Self {
            slots: vec![None; HISTORY_CAPACITY],
        }
    }

    fn slot_index(id: u64) -> usize {
        (id % HISTORY_CAPACITY as u64) as usize
    }

    /// Store `update` at slot `update.id % capacity`, overwriting any prior
    /// occupant.
    pub fn record(&mut self, update: TickUpdate) {
        let idx = Self::slot_index(update.id);
        self.slots[idx] = Some(update);
    }

    /// Return whatever update currently occupies the slot for tick `id`.
    ///
    /// If tick `id` has been evicted by wraparound this returns the newer
    /// occupant, not an error. `None` only for slots never written.
    pub fn get(&self, id: u64) -> Option<&TickUpdate> {
        self.slots[Self::slot_index(id)].as_ref()
    }

    /// Replace the stored position for tick `id`, leaving the rest of the
    /// entry intact. The slot is rewritten wholesale rather than mutated in
    /// place.
    pub fn overwrite_position(&mut self, id: u64, new_position: i64) {
        let idx = Self::slot_index(id);
        if let Some(entry) = self.slots[idx].take() {
            self.slots[idx] = Some(TickUpdate {
                position: new_position,
                ..entry
            });
        }
    }

    /// Whether tick `id` is still recoverable given that ticks `0..next_id`
    /// have been recorded. False means `get(id)` would read an overwriting
    /// newer tick.
    pub fn valid_for(&self, id: u64, next_id: u64) -> bool {
        id < next_id && next_id - id <= HISTORY_CAPACITY as u64
    }
}

impl Default for UpdateHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ActivityState;

    fn update(id: u64, delta_ms: u64, position: i64) -> TickUpdate {
        TickUpdate {
            id,
            delta_ms,
            position,
            state: ActivityState::Moving,
        }
    }

    #[test]
    fn record_and_get() {
        let mut history = UpdateHistory::new();
        history.record(update(0, 0, 0));
        history.record(update(1, 1000, 1000));

        assert_eq!(history.get(0).unwrap().position, 0);
        assert_eq!(history.get(1).unwrap().position, 1000);
        assert!(history.get(2).is_none());
    }

    #[test]
    fn overwrite_position_keeps_delta() {
        let mut history = UpdateHistory::new();
        history.record(update(3, 1000, 3000));

        history.overwrite_position(3, 5000);

        let entry = history.get(3).unwrap();
        assert_eq!(entry.position, 5000);
        assert_eq!(entry.delta_ms, 1000);
        assert_eq!(entry.id, 3);
    }

    #[test]
    fn wraparound_reuses_slots_silently() {
        let mut history = UpdateHistory::new();
        for id in 0..=HISTORY_CAPACITY as u64 {
            history.record(update(id, 1000, id as i64 * 1000));
        }

        // Tick 20 landed in tick 0's slot; looking up tick 0 now reads
        // tick 20's data. That reuse is the point of the fixed capacity.
        let occupant = history.get(0).unwrap();
        assert_eq!(occupant.id, HISTORY_CAPACITY as u64);
        assert_eq!(occupant.position, HISTORY_CAPACITY as i64 * 1000);
    }

    #[test]
    fn valid_for_flags_evicted_ticks() {
        let history = UpdateHistory::new();
        let next_id = HISTORY_CAPACITY as u64 + 1;

        assert!(!history.valid_for(0, next_id));
        assert!(history.valid_for(1, next_id));
        assert!(history.valid_for(next_id - 1, next_id));
        // Ticks never produced are not recoverable either.
        assert!(!history.valid_for(next_id, next_id));
    }
}
