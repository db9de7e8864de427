//! Error types for data-level failures.
//!
//! Contract violations by callers (touching a destroyed unit, nesting
//! cargo holders, a second missionary in a dwelling) are not errors:
//! they panic. The types here describe bad *data*, typically a corrupt
//! save, and are returned so the loader can refuse it.

use crate::units::GenericId;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The invariant a snapshot or store failed to uphold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invariant {
    /// IDs are nonzero and below the allocator counter.
    IdInRange,
    /// No unit is persistently in the `free` state.
    NoFreeUnits,
    /// Harbor port-status counters are in range.
    HarborStatus,
    /// Ships in port have no orders unless damaged.
    InPortOrdersCleared,
    /// Ordering values are positive and no larger than the counter.
    OrderingInRange,
    /// No two units share an ordering value.
    OrderingUnique,
    /// Every ordering entry belongs to an existing map/harbor unit.
    OrderingOwner,
    /// Every map/harbor unit has an ordering entry.
    OrderingPresent,
    /// At most one missionary per dwelling.
    SingleMissionary,
    /// Cargo holds agree with the ownership records of held units.
    CargoConsistent,
    /// Secondary indices agree with the ownership records.
    IndexAgreement,
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Invariant::IdInRange => "id-in-range",
            Invariant::NoFreeUnits => "no-free-units",
            Invariant::HarborStatus => "harbor-status",
            Invariant::InPortOrdersCleared => "in-port-orders-cleared",
            Invariant::OrderingInRange => "ordering-in-range",
            Invariant::OrderingUnique => "ordering-unique",
            Invariant::OrderingOwner => "ordering-owner",
            Invariant::OrderingPresent => "ordering-present",
            Invariant::SingleMissionary => "single-missionary",
            Invariant::CargoConsistent => "cargo-consistent",
            Invariant::IndexAgreement => "index-agreement",
        };
        f.write_str(name)
    }
}

/// A broken invariant, with the unit it was detected on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invariant violation [{invariant}]: {message}")]
pub struct InvariantViolation {
    /// Which invariant broke.
    pub invariant: Invariant,
    /// The offending unit, when the failure is tied to one.
    pub unit: Option<GenericId>,
    /// Human readable description.
    pub message: String,
}

impl InvariantViolation {
    /// Create a violation tied to a unit.
    #[must_use]
    pub fn on_unit(invariant: Invariant, unit: GenericId, message: impl Into<String>) -> Self {
        Self {
            invariant,
            unit: Some(unit),
            message: message.into(),
        }
    }

    /// Create a violation not tied to a single unit.
    #[must_use]
    pub fn global(invariant: Invariant, message: impl Into<String>) -> Self {
        Self {
            invariant,
            unit: None,
            message: message.into(),
        }
    }
}

/// A harbor port status with out-of-range counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PortStatusError {
    /// A sailing turn counter is negative.
    #[error("ship {direction} turn count must be non-negative, but instead is {turns}")]
    NegativeTurns {
        /// `outbound` or `inbound`.
        direction: &'static str,
        /// The offending count.
        turns: i32,
    },
}

/// Failure to load or save a units snapshot.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Filesystem failure.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not a well-formed snapshot.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// Encoding the snapshot failed.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    /// The snapshot parsed but breaks a store invariant.
    #[error("corrupt save: {0}")]
    Corrupt(#[from] InvariantViolation),
}

/// A simulation config that cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The config file is not valid JSON for the config type.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// A field is out of range.
    #[error("invalid config: {field} {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}
