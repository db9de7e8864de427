//! Unit identifiers and the shared ID allocator.
//!
//! European and native units draw their IDs from one counter. A
//! `GenericId` names either kind; `UnitId` and `NativeUnitId` are views
//! over the same integers that the store only hands out after checking
//! the kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// First ID issued by a fresh allocator. Zero is never a valid ID.
pub const FIRST_UNIT_ID: u32 = 1;

/// An ID of a unit of either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericId(u32);

impl GenericId {
    /// Wrap a raw integer. No kind or existence check is implied.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The underlying integer.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// ID of a European unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(u32);

impl UnitId {
    /// Reinterpret without checking; only the store may do this.
    pub(crate) const fn from_generic_unchecked(id: GenericId) -> Self {
        Self(id.0)
    }

    /// The underlying integer.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// ID of a native unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeUnitId(u32);

impl NativeUnitId {
    pub(crate) const fn from_generic_unchecked(id: GenericId) -> Self {
        Self(id.0)
    }

    /// The underlying integer.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<UnitId> for GenericId {
    fn from(id: UnitId) -> Self {
        Self(id.0)
    }
}

impl From<NativeUnitId> for GenericId {
    fn from(id: NativeUnitId) -> Self {
        Self(id.0)
    }
}

/// ID of a colony. Colonies live outside this store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColonyId(pub u32);

/// ID of a native dwelling. Dwellings live outside this store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DwellingId(pub u32);

/// Which of the two unit kinds an ID belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// A European unit (colonists, soldiers, ships, ...).
    Euro,
    /// A native unit (braves).
    Native,
}

macro_rules! impl_display {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }
        )*
    };
}

impl_display!(GenericId, UnitId, NativeUnitId, ColonyId, DwellingId);

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Euro => write!(f, "european"),
            UnitKind::Native => write!(f, "native"),
        }
    }
}

/// Monotonic ID counter shared by both unit kinds.
///
/// The stored value is the next ID to be issued, so every ID strictly
/// below it has been allocated at some point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdAllocator {
    next: GenericId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next: GenericId(FIRST_UNIT_ID),
        }
    }
}

impl IdAllocator {
    /// Issue the next unused ID.
    ///
    /// # Panics
    ///
    /// Panics once every ID up to `u32::MAX - 1` has been issued; the
    /// counter never wraps back onto reserved or reused IDs.
    #[track_caller]
    pub fn next_id(&mut self) -> GenericId {
        let curr = self.next;
        let Some(next) = curr.0.checked_add(1) else {
            panic!("unit id space exhausted: cannot issue an id after {curr}.");
        };
        self.next = GenericId(next);
        curr
    }

    /// The next ID that would be issued.
    ///
    /// # Panics
    ///
    /// Panics if the counter is zero, which only a corrupt snapshot produces.
    #[must_use]
    #[track_caller]
    pub fn last_id(&self) -> GenericId {
        assert!(self.next.0 > 0, "no units yet created.");
        self.next
    }

    /// The raw counter, zero included.
    #[must_use]
    pub const fn peek(&self) -> GenericId {
        self.next
    }

    /// Whether `id` was ever issued by this allocator.
    #[must_use]
    pub fn was_allocated(&self, id: GenericId) -> bool {
        id.0 >= FIRST_UNIT_ID && id.0 < self.next.0
    }
}
