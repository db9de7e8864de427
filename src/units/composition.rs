//! Unit compositions.
//!
//! A composition is the unit's type and inventory. The store never
//! interprets it beyond the handful of attributes that decide cargo
//! rules; every change to a composition happens elsewhere and is
//! written back through the unit payload.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The attributes of a unit type that the ownership rules depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitAttributes {
    /// Number of cargo slots this unit provides (0 = cannot hold cargo).
    pub cargo_slots: usize,
    /// Slots this unit takes up when held as cargo (None = cannot be cargo).
    pub cargo_slots_occupies: Option<usize>,
    /// Whether this is a ship.
    pub ship: bool,
}

/// Opaque unit type and inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitComposition {
    /// Name of the unit type.
    pub unit_type: String,
    /// Attributes of the unit type.
    pub attributes: UnitAttributes,
    /// Inventory carried by the unit (muskets, horses, tools, ...).
    #[serde(default)]
    pub inventory: BTreeMap<String, i32>,
}

impl UnitComposition {
    /// Create a composition with an empty inventory.
    #[must_use]
    pub fn new(unit_type: impl Into<String>, attributes: UnitAttributes) -> Self {
        Self {
            unit_type: unit_type.into(),
            attributes,
            inventory: BTreeMap::new(),
        }
    }

    fn land(unit_type: &str) -> Self {
        Self::new(
            unit_type,
            UnitAttributes {
                cargo_slots: 0,
                cargo_slots_occupies: Some(1),
                ship: false,
            },
        )
    }

    fn ship(unit_type: &str, cargo_slots: usize) -> Self {
        Self::new(
            unit_type,
            UnitAttributes {
                cargo_slots,
                cargo_slots_occupies: None,
                ship: true,
            },
        )
    }

    /// A free colonist.
    #[must_use]
    pub fn free_colonist() -> Self {
        Self::land("free_colonist")
    }

    /// A soldier (colonist carrying 50 muskets).
    #[must_use]
    pub fn soldier() -> Self {
        let mut comp = Self::land("soldier");
        comp.inventory.insert("muskets".to_string(), 50);
        comp
    }

    /// A missionary.
    #[must_use]
    pub fn missionary() -> Self {
        Self::land("missionary")
    }

    /// A treasure train, which fills six cargo slots.
    #[must_use]
    pub fn treasure(gold: i32) -> Self {
        let mut comp = Self::new(
            "treasure",
            UnitAttributes {
                cargo_slots: 0,
                cargo_slots_occupies: Some(6),
                ship: false,
            },
        );
        comp.inventory.insert("gold".to_string(), gold);
        comp
    }

    /// A wagon train: holds commodities but cannot itself be cargo.
    #[must_use]
    pub fn wagon_train() -> Self {
        Self::new(
            "wagon_train",
            UnitAttributes {
                cargo_slots: 2,
                cargo_slots_occupies: None,
                ship: false,
            },
        )
    }

    /// A caravel (two cargo slots).
    #[must_use]
    pub fn caravel() -> Self {
        Self::ship("caravel", 2)
    }

    /// A galleon (six cargo slots).
    #[must_use]
    pub fn galleon() -> Self {
        Self::ship("galleon", 6)
    }
}

/// Native unit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeUnitType {
    /// Unarmed, on foot.
    Brave,
    /// Carrying muskets.
    ArmedBrave,
    /// Riding horses.
    MountedBrave,
    /// Muskets and horses.
    MountedWarrior,
}
