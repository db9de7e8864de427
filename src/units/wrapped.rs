//! The persisted form of the units store.
//!
//! Only the primary map, the allocator and the turn ordering are saved.
//! Every secondary index is rebuilt from these when a store is loaded.

use crate::units::{
    GenericId, IdAllocator, NativeUnit, NativeUnitOwnership, Unit, UnitId, UnitKind, UnitOwnership,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A European unit together with its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EuroUnitState {
    /// The unit payload.
    pub unit: Unit,
    /// Current owner.
    pub ownership: UnitOwnership,
}

/// A native unit together with its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeUnitState {
    /// The unit payload.
    pub unit: NativeUnit,
    /// Current owner.
    pub ownership: NativeUnitOwnership,
}

/// A primary-map entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitState {
    /// A European unit.
    Euro(EuroUnitState),
    /// A native unit.
    Native(NativeUnitState),
}

impl UnitState {
    /// Which kind of unit this is.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        match self {
            UnitState::Euro(_) => UnitKind::Euro,
            UnitState::Native(_) => UnitKind::Native,
        }
    }
}

/// Serializable snapshot of the units store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WrappedUnitsState {
    /// Next ID to issue.
    pub next_unit_id: IdAllocator,
    /// Primary map.
    pub units: BTreeMap<GenericId, UnitState>,
    /// Turn-ordering values of units on the map or in the harbor.
    #[serde(default)]
    pub unit_ordering: BTreeMap<UnitId, i64>,
    /// Last ordering value handed out.
    #[serde(default)]
    pub curr_unit_ordering_index: i64,
}
