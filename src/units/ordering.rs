//! Turn-ordering sequencer.
//!
//! Units on the map or in the harbor carry a strictly increasing
//! ordering value. Bumping a unit hands it a value larger than all
//! others, so the most recently activated unit moves last.

use crate::units::UnitId;
use std::collections::BTreeMap;

/// Mutable view over the persisted ordering map and its counter.
#[derive(Debug)]
pub struct TurnOrdering<'a> {
    values: &'a mut BTreeMap<UnitId, i64>,
    counter: &'a mut i64,
}

impl<'a> TurnOrdering<'a> {
    /// Wrap the ordering map and counter.
    pub fn new(values: &'a mut BTreeMap<UnitId, i64>, counter: &'a mut i64) -> Self {
        Self { values, counter }
    }

    /// Give `id` a value larger than every value handed out so far.
    pub fn bump(&mut self, id: UnitId) -> i64 {
        self.values.remove(&id);
        *self.counter += 1;
        self.values.insert(id, *self.counter);
        *self.counter
    }

    /// Drop `id`'s entry.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no entry.
    #[track_caller]
    pub fn erase(&mut self, id: UnitId) {
        assert!(
            self.values.remove(&id).is_some(),
            "unit {id} has no turn-ordering entry to remove."
        );
    }
}

/// Units sorted by ascending ordering value.
#[must_use]
pub fn in_order(values: &BTreeMap<UnitId, i64>) -> Vec<UnitId> {
    let mut entries: Vec<(UnitId, i64)> = values.iter().map(|(&id, &v)| (id, v)).collect();
    entries.sort_by_key(|&(_, v)| v);
    entries.into_iter().map(|(id, _)| id).collect()
}
