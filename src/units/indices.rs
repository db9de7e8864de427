//! Secondary indices derived from the ownership records.
//!
//! Buckets that become empty are deleted so the maps only ever hold
//! occupied keys. Every removal checks that the entry is really there;
//! a missing entry means an earlier update went wrong.

use crate::units::{
    ColonyId, Coord, DwellingId, GenericId, NativeUnitId, UnitId, UnitOwnership, UnitState,
    WrappedUnitsState,
};
use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

static NO_UNITS: BTreeSet<GenericId> = BTreeSet::new();
static NO_WORKERS: BTreeSet<UnitId> = BTreeSet::new();
static NO_BRAVES: BTreeSet<NativeUnitId> = BTreeSet::new();

#[track_caller]
fn bucket_insert<K: Hash + Eq, V: Ord>(map: &mut HashMap<K, BTreeSet<V>>, key: K, value: V) -> bool {
    map.entry(key).or_default().insert(value)
}

#[track_caller]
fn bucket_remove<K, V>(map: &mut HashMap<K, BTreeSet<V>>, key: &K, value: &V, what: &str)
where
    K: Hash + Eq + std::fmt::Display,
    V: Ord + std::fmt::Display,
{
    let Some(bucket) = map.get_mut(key) else {
        panic!("{what} index has no bucket for {key} while removing {value}.");
    };
    assert!(
        bucket.remove(value),
        "{what} index bucket for {key} does not contain {value}."
    );
    if bucket.is_empty() {
        map.remove(key);
    }
}

/// All derived lookup tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecondaryIndices {
    by_coord: HashMap<Coord, BTreeSet<GenericId>>,
    workers_by_colony: HashMap<ColonyId, BTreeSet<UnitId>>,
    missionary_by_dwelling: HashMap<DwellingId, UnitId>,
    braves_by_dwelling: HashMap<DwellingId, BTreeSet<NativeUnitId>>,
}

impl SecondaryIndices {
    /// Build every index from scratch.
    ///
    /// # Panics
    ///
    /// Panics if two missionaries claim the same dwelling. Snapshots are
    /// validated before this runs, so that indicates a caller bug.
    #[must_use]
    pub fn rebuild(wrapped: &WrappedUnitsState) -> Self {
        let mut indices = Self::default();
        for (&id, state) in &wrapped.units {
            match state {
                UnitState::Euro(euro) => {
                    let unit_id = UnitId::from_generic_unchecked(id);
                    match euro.ownership {
                        UnitOwnership::World { coord } => indices.insert_on_map(coord, id),
                        UnitOwnership::Colony { id: colony } => {
                            indices.insert_worker(colony, unit_id);
                        }
                        UnitOwnership::Dwelling { id: dwelling } => {
                            indices.insert_missionary(dwelling, unit_id);
                        }
                        UnitOwnership::Free
                        | UnitOwnership::Cargo { .. }
                        | UnitOwnership::Harbor(_) => {}
                    }
                }
                UnitState::Native(native) => {
                    let native_id = NativeUnitId::from_generic_unchecked(id);
                    indices.insert_on_map(native.ownership.coord, id);
                    indices.insert_brave(native.ownership.dwelling_id, native_id);
                }
            }
        }
        log::debug!(
            "rebuilt unit indices: {} occupied tiles, {} colonies with workers, {} missions",
            indices.by_coord.len(),
            indices.workers_by_colony.len(),
            indices.missionary_by_dwelling.len()
        );
        indices
    }

    /// Units standing on `coord`.
    #[must_use]
    pub fn on_map(&self, coord: Coord) -> &BTreeSet<GenericId> {
        self.by_coord.get(&coord).unwrap_or(&NO_UNITS)
    }

    /// All occupied tiles.
    pub fn occupied_tiles(&self) -> impl ExactSizeIterator<Item = (&Coord, &BTreeSet<GenericId>)> {
        self.by_coord.iter()
    }

    /// Workers in `colony`.
    #[must_use]
    pub fn workers(&self, colony: ColonyId) -> &BTreeSet<UnitId> {
        self.workers_by_colony.get(&colony).unwrap_or(&NO_WORKERS)
    }

    /// Missionary in `dwelling`, if any.
    #[must_use]
    pub fn missionary(&self, dwelling: DwellingId) -> Option<UnitId> {
        self.missionary_by_dwelling.get(&dwelling).copied()
    }

    /// Braves belonging to `dwelling`.
    #[must_use]
    pub fn braves(&self, dwelling: DwellingId) -> &BTreeSet<NativeUnitId> {
        self.braves_by_dwelling.get(&dwelling).unwrap_or(&NO_BRAVES)
    }

    /// Add a unit to a tile.
    ///
    /// # Panics
    ///
    /// Panics if the unit is already on that tile.
    #[track_caller]
    pub fn insert_on_map(&mut self, coord: Coord, id: GenericId) {
        assert!(
            bucket_insert(&mut self.by_coord, coord, id),
            "unit {id} is already indexed at {coord}."
        );
    }

    /// Remove a unit from a tile.
    #[track_caller]
    pub fn remove_from_map(&mut self, coord: Coord, id: GenericId) {
        bucket_remove(&mut self.by_coord, &coord, &id, "coordinate");
    }

    /// Add a worker to a colony.
    ///
    /// # Panics
    ///
    /// Panics if the unit is already a worker there.
    #[track_caller]
    pub fn insert_worker(&mut self, colony: ColonyId, id: UnitId) {
        assert!(
            bucket_insert(&mut self.workers_by_colony, colony, id),
            "unit {id} is already a worker in colony {colony}."
        );
    }

    /// Remove a worker from a colony.
    #[track_caller]
    pub fn remove_worker(&mut self, colony: ColonyId, id: UnitId) {
        bucket_remove(&mut self.workers_by_colony, &colony, &id, "colony");
    }

    /// Station a missionary in a dwelling.
    ///
    /// # Panics
    ///
    /// Panics if the dwelling already has a missionary.
    #[track_caller]
    pub fn insert_missionary(&mut self, dwelling: DwellingId, id: UnitId) {
        if let Some(existing) = self.missionary_by_dwelling.get(&dwelling) {
            panic!(
                "cannot place missionary {id} in dwelling {dwelling}: \
                 it already has missionary {existing}."
            );
        }
        self.missionary_by_dwelling.insert(dwelling, id);
    }

    /// Remove the missionary from a dwelling.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not the dwelling's missionary.
    #[track_caller]
    pub fn remove_missionary(&mut self, dwelling: DwellingId, id: UnitId) {
        let removed = self.missionary_by_dwelling.remove(&dwelling);
        assert!(
            removed == Some(id),
            "dwelling {dwelling} does not hold missionary {id} (found {removed:?})."
        );
    }

    /// Associate a brave with a dwelling.
    ///
    /// # Panics
    ///
    /// Panics if the brave is already associated with it.
    #[track_caller]
    pub fn insert_brave(&mut self, dwelling: DwellingId, id: NativeUnitId) {
        assert!(
            bucket_insert(&mut self.braves_by_dwelling, dwelling, id),
            "brave {id} is already associated with dwelling {dwelling}."
        );
    }

    /// Drop a brave's dwelling association.
    #[track_caller]
    pub fn remove_brave(&mut self, dwelling: DwellingId, id: NativeUnitId) {
        bucket_remove(&mut self.braves_by_dwelling, &dwelling, &id, "dwelling brave");
    }
}
