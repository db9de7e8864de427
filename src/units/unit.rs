//! Unit payloads stored by the units store.

use crate::units::{CargoHold, NativeUnitType, UnitComposition, UnitId};
use serde::{Deserialize, Serialize};

/// Standing orders of a European unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitOrders {
    /// Waiting for orders.
    #[default]
    None,
    /// Asleep; does not ask for orders.
    Sentry,
    /// First turn of fortification.
    Fortifying,
    /// Fully fortified.
    Fortified,
    /// Building a road.
    Road {
        /// Turns spent so far.
        turns_worked: u32,
    },
    /// Plowing.
    Plow {
        /// Turns spent so far.
        turns_worked: u32,
    },
    /// A ship under repair.
    Damaged {
        /// Turns left until the ship is seaworthy.
        turns_until_repair: u32,
    },
}

/// A European unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Type and inventory.
    pub composition: UnitComposition,
    /// Current orders.
    pub orders: UnitOrders,
    /// Cargo hold, sized by the composition's `cargo_slots`.
    pub cargo: CargoHold,
}

impl Unit {
    /// Create a unit with no orders and an empty hold.
    #[must_use]
    pub fn new(composition: UnitComposition) -> Self {
        let cargo = CargoHold::new(composition.attributes.cargo_slots);
        Self {
            composition,
            orders: UnitOrders::None,
            cargo,
        }
    }

    /// Whether the unit has any orders.
    #[must_use]
    pub fn has_orders(&self) -> bool {
        self.orders != UnitOrders::None
    }

    /// Put the unit to sleep.
    pub fn sentry(&mut self) {
        self.orders = UnitOrders::Sentry;
    }

    /// Drop whatever the unit was doing.
    pub fn clear_orders(&mut self) {
        self.orders = UnitOrders::None;
    }

    /// Begin fortifying.
    pub fn start_fortify(&mut self) {
        self.orders = UnitOrders::Fortifying;
    }

    /// Complete fortification.
    pub fn fortify(&mut self) {
        self.orders = UnitOrders::Fortified;
    }

    /// Whether the unit is a ship.
    #[must_use]
    pub fn is_ship(&self) -> bool {
        self.composition.attributes.ship
    }

    /// Units held in this unit's cargo, or `None` if it has no hold.
    #[must_use]
    pub fn units_in_cargo(&self) -> Option<Vec<UnitId>> {
        if self.composition.attributes.cargo_slots == 0 {
            return None;
        }
        Some(self.cargo.units())
    }
}

/// A native unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeUnit {
    /// What kind of brave this is.
    pub unit_type: NativeUnitType,
}

impl NativeUnit {
    /// Create a native unit.
    #[must_use]
    pub const fn new(unit_type: NativeUnitType) -> Self {
        Self { unit_type }
    }
}
