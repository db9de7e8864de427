//! Ownership records.
//!
//! Every European unit is owned by exactly one thing at a time. The
//! record is a closed enum so that adding a new owner forces every
//! match in the store and the validator to handle it.

use crate::error::PortStatusError;
use crate::units::{ColonyId, Coord, DwellingId, UnitId};
use serde::{Deserialize, Serialize};

/// Progress of a unit through the European harbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortStatus {
    /// Sailing towards Europe.
    Outbound {
        /// Turns already spent sailing.
        turns: i32,
    },
    /// Sailing from Europe to the new world.
    Inbound {
        /// Turns already spent sailing.
        turns: i32,
    },
    /// In port (ships) or on the dock (land units).
    InPort,
}

impl PortStatus {
    /// Check the turn counters.
    ///
    /// # Errors
    ///
    /// Returns an error if a turn count is negative.
    pub fn validate(&self) -> Result<(), PortStatusError> {
        match *self {
            PortStatus::Outbound { turns } if turns < 0 => {
                Err(PortStatusError::NegativeTurns { direction: "outbound", turns })
            }
            PortStatus::Inbound { turns } if turns < 0 => {
                Err(PortStatusError::NegativeTurns { direction: "inbound", turns })
            }
            PortStatus::Outbound { .. } | PortStatus::Inbound { .. } | PortStatus::InPort => Ok(()),
        }
    }
}

/// Harbor ownership payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarborState {
    /// Where in the harbor cycle the unit is.
    pub port_status: PortStatus,
    /// Map square the ship sailed from, if it came from the map.
    pub sailed_from: Option<Coord>,
}

/// Who owns a European unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitOwnership {
    /// Owned by nothing. Only legal while a transition is in progress.
    Free,
    /// On the map.
    World {
        /// Tile the unit stands on.
        coord: Coord,
    },
    /// In another unit's cargo hold.
    Cargo {
        /// The unit holding it.
        holder: UnitId,
    },
    /// In the European harbor.
    Harbor(HarborState),
    /// Working in a colony.
    Colony {
        /// The colony.
        id: ColonyId,
    },
    /// Missionary inside a native dwelling.
    Dwelling {
        /// The dwelling.
        id: DwellingId,
    },
}

impl UnitOwnership {
    /// Whether a unit in this state must hold a turn-ordering entry.
    #[must_use]
    pub const fn implies_ordering(&self) -> bool {
        match self {
            UnitOwnership::World { .. } | UnitOwnership::Harbor(_) => true,
            UnitOwnership::Free
            | UnitOwnership::Cargo { .. }
            | UnitOwnership::Colony { .. }
            | UnitOwnership::Dwelling { .. } => false,
        }
    }

    /// Short name of the state, for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            UnitOwnership::Free => "free",
            UnitOwnership::World { .. } => "world",
            UnitOwnership::Cargo { .. } => "cargo",
            UnitOwnership::Harbor(_) => "harbor",
            UnitOwnership::Colony { .. } => "colony",
            UnitOwnership::Dwelling { .. } => "dwelling",
        }
    }
}

/// Native units are always on the map and tied to one dwelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeUnitOwnership {
    /// Tile the unit stands on.
    pub coord: Coord,
    /// Dwelling the unit belongs to.
    pub dwelling_id: DwellingId,
}
