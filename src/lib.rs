// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Colonia: unit ownership and spatial indexing for a colonial strategy game.
//!
//! Every unit in a game is owned by exactly one thing at a time: the
//! map, another unit's cargo hold, the European harbor, a colony, or a
//! native dwelling. This crate stores those records and keeps the
//! lookups derived from them (units per tile, workers per colony,
//! missionary per dwelling, braves per dwelling) in agreement at all
//! times.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI (validate / inspect / sim)    │
//! ├─────────────────────────────────────┤
//! │   save (JSON)     │   sim (driver)  │
//! ├─────────────────────────────────────┤
//! │   UnitsState: transitions, queries  │
//! ├─────────────────────────────────────┤
//! │   records │ indices │ turn ordering │
//! └─────────────────────────────────────┘
//! ```
//!
//! Only the records, the ID counter and the turn ordering are saved.
//! Everything else is rebuilt on load, after the snapshot has passed
//! the validator.

pub mod error;
pub mod save;
pub mod sim;
pub mod units;

pub use error::{ConfigError, Invariant, InvariantViolation, SaveError};

// Re-export the types most callers need at the crate root
pub use units::{
    ColonyId, Coord, DwellingId, GenericId, NativeUnitId, UnitId, UnitKind, UnitOwnership,
    UnitsState, WrappedUnitsState,
};
