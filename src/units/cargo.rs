//! Cargo holds.
//!
//! A unit that takes up `n` slots sits in its first slot and is followed
//! by `n - 1` overflow slots. The hold does not know unit types, so
//! callers pass in how many slots a unit occupies.

use crate::units::UnitId;
use serde::{Deserialize, Serialize};

/// Maximum quantity of one commodity in a single slot.
pub const MAX_COMMODITY_PER_SLOT: u32 = 100;

/// A commodity stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    /// Commodity name.
    pub name: String,
    /// Quantity, `1..=MAX_COMMODITY_PER_SLOT` when stored.
    pub quantity: u32,
}

/// The contents of one cargo slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CargoSlot {
    /// Nothing here.
    Empty,
    /// Taken by the unit in a preceding slot.
    Overflow,
    /// Holds a unit.
    Unit(UnitId),
    /// Holds a commodity.
    Commodity(Commodity),
}

/// A unit's cargo hold.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CargoHold {
    slots: Vec<CargoSlot>,
}

impl CargoHold {
    /// Create an empty hold with `num_slots` slots.
    #[must_use]
    pub fn new(num_slots: usize) -> Self {
        Self {
            slots: vec![CargoSlot::Empty; num_slots],
        }
    }

    /// Total number of slots.
    #[must_use]
    pub fn slots_total(&self) -> usize {
        self.slots.len()
    }

    /// Number of empty slots.
    #[must_use]
    pub fn slots_remaining(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s, CargoSlot::Empty)).count()
    }

    /// Number of non-empty slots, overflow included.
    #[must_use]
    pub fn slots_occupied(&self) -> usize {
        self.slots_total() - self.slots_remaining()
    }

    /// All slots in order.
    #[must_use]
    pub fn slots(&self) -> &[CargoSlot] {
        &self.slots
    }

    /// The slot at `idx`, if in range.
    #[must_use]
    pub fn at(&self, idx: usize) -> Option<&CargoSlot> {
        self.slots.get(idx)
    }

    /// Slot index of the given unit, if it is in this hold.
    #[must_use]
    pub fn find_unit(&self, id: UnitId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| matches!(s, CargoSlot::Unit(held) if *held == id))
    }

    /// All units in the hold, in slot order.
    #[must_use]
    pub fn units(&self) -> Vec<UnitId> {
        self.slots
            .iter()
            .filter_map(|s| match s {
                CargoSlot::Unit(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Whether a unit occupying `occupies` slots fits starting at `slot`.
    #[must_use]
    pub fn fits_unit(&self, slot: usize, occupies: usize) -> bool {
        if occupies == 0 {
            return false;
        }
        let Some(end) = slot.checked_add(occupies) else {
            return false;
        };
        end <= self.slots.len()
            && self.slots[slot..end]
                .iter()
                .all(|s| matches!(s, CargoSlot::Empty))
    }

    /// First slot where a unit occupying `occupies` slots fits, trying
    /// `start` first and rotating right.
    #[must_use]
    pub fn first_fit_from(&self, start: usize, occupies: usize) -> Option<usize> {
        let total = self.slots_total();
        (start..start + total)
            .map(|i| i % total)
            .find(|&slot| self.fits_unit(slot, occupies))
    }

    /// Put a unit into `slot`, filling the following overflow slots.
    ///
    /// # Panics
    ///
    /// Panics if the unit is already in this hold or does not fit.
    #[track_caller]
    pub fn add_unit(&mut self, slot: usize, id: UnitId, occupies: usize) {
        assert!(
            self.find_unit(id).is_none(),
            "unit {id} is already in this cargo hold."
        );
        assert!(
            self.fits_unit(slot, occupies),
            "unit {id} occupying {occupies} slot(s) does not fit at slot {slot}."
        );
        self.slots[slot] = CargoSlot::Unit(id);
        for overflow in &mut self.slots[slot + 1..slot + occupies] {
            *overflow = CargoSlot::Overflow;
        }
    }

    /// Add commodities to `slot`, merging with a stack of the same kind.
    ///
    /// Returns false (and changes nothing) if the commodity does not fit.
    pub fn add_commodity(&mut self, slot: usize, commodity: Commodity) -> bool {
        if commodity.quantity == 0 || commodity.quantity > MAX_COMMODITY_PER_SLOT {
            return false;
        }
        match self.slots.get_mut(slot) {
            Some(target @ CargoSlot::Empty) => {
                *target = CargoSlot::Commodity(commodity);
                true
            }
            Some(CargoSlot::Commodity(existing))
                if existing.name == commodity.name
                    && existing.quantity + commodity.quantity <= MAX_COMMODITY_PER_SLOT =>
            {
                existing.quantity += commodity.quantity;
                true
            }
            _ => false,
        }
    }

    /// Empty `slot` and the overflow run that follows it.
    ///
    /// # Panics
    ///
    /// Panics if the slot is out of range or holds nothing.
    #[track_caller]
    pub fn remove(&mut self, slot: usize) {
        assert!(slot < self.slots.len(), "cargo slot {slot} out of range.");
        assert!(
            matches!(self.slots[slot], CargoSlot::Unit(_) | CargoSlot::Commodity(_)),
            "cargo slot {slot} holds no cargo."
        );
        self.slots[slot] = CargoSlot::Empty;
        for next in &mut self.slots[slot + 1..] {
            if *next != CargoSlot::Overflow {
                break;
            }
            *next = CargoSlot::Empty;
        }
    }

    /// Check the structural rules that need no knowledge of unit types.
    ///
    /// # Errors
    ///
    /// Returns a description of the first broken rule.
    pub fn validate_shape(&self) -> Result<(), String> {
        if self.slots.first() == Some(&CargoSlot::Overflow) {
            return Err("first cargo slot is an overflow slot".to_string());
        }
        for (idx, pair) in self.slots.windows(2).enumerate() {
            let follows_non_unit = matches!(pair[0], CargoSlot::Empty | CargoSlot::Commodity(_));
            if follows_non_unit && pair[1] == CargoSlot::Overflow {
                return Err(format!(
                    "cargo slot {} is an overflow slot not preceded by a unit",
                    idx + 1
                ));
            }
        }
        for (idx, slot) in self.slots.iter().enumerate() {
            if let CargoSlot::Commodity(c) = slot {
                if c.quantity == 0 || c.quantity > MAX_COMMODITY_PER_SLOT {
                    return Err(format!(
                        "cargo slot {idx} holds {} {} (allowed 1..={MAX_COMMODITY_PER_SLOT})",
                        c.quantity, c.name
                    ));
                }
            }
        }
        Ok(())
    }

    /// Length of the overflow run that follows `slot`.
    #[must_use]
    pub fn overflow_after(&self, slot: usize) -> usize {
        self.slots
            .get(slot + 1..)
            .map_or(0, |rest| rest.iter().take_while(|s| **s == CargoSlot::Overflow).count())
    }
}
