//! Store invariants.
//!
//! These never fail for a store that was only changed through its
//! transitions. They run when a snapshot is loaded, where a failure
//! means the save is corrupt, and in debug builds after mutations.

use crate::error::{Invariant, InvariantViolation};
use crate::units::indices::SecondaryIndices;
use crate::units::{
    CargoSlot, DwellingId, FIRST_UNIT_ID, GenericId, PortStatus, UnitId, UnitOrders, UnitOwnership, UnitState,
    UnitsState, WrappedUnitsState,
};
use std::collections::{HashMap, HashSet};

/// Check every invariant of a snapshot.
///
/// Returns all violations found, or an empty list if the snapshot is sound.
#[must_use]
pub fn check_invariants(o: &WrappedUnitsState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut missionaries: HashMap<DwellingId, GenericId> = HashMap::new();

    if o.next_unit_id.peek().raw() < FIRST_UNIT_ID {
        violations.push(InvariantViolation::global(
            Invariant::IdInRange,
            "the unit id counter is zero.",
        ));
    }

    for (&id, state) in &o.units {
        if !o.next_unit_id.was_allocated(id) {
            violations.push(InvariantViolation::on_unit(
                Invariant::IdInRange,
                id,
                format!(
                    "unit id {id} is out of bounds (next id to issue is {}).",
                    o.next_unit_id.peek()
                ),
            ));
        }

        let UnitState::Euro(euro) = state else {
            continue;
        };
        let unit_id = UnitId::from_generic_unchecked(id);

        match euro.ownership {
            UnitOwnership::Free => {
                violations.push(InvariantViolation::on_unit(
                    Invariant::NoFreeUnits,
                    id,
                    format!("unit {id} is in the `free` state."),
                ));
            }
            UnitOwnership::Harbor(harbor) => {
                if let Err(err) = harbor.port_status.validate() {
                    violations.push(InvariantViolation::on_unit(
                        Invariant::HarborStatus,
                        id,
                        format!("unit {id}: {err}"),
                    ));
                }
                // Damaged ships keep their repair counter while in port.
                let orders_cleared = matches!(
                    euro.unit.orders,
                    UnitOrders::None | UnitOrders::Damaged { .. }
                );
                if harbor.port_status == PortStatus::InPort && euro.unit.is_ship() && !orders_cleared {
                    violations.push(InvariantViolation::on_unit(
                        Invariant::InPortOrdersCleared,
                        id,
                        format!("ship {id} is in port but still has orders {:?}.", euro.unit.orders),
                    ));
                }
            }
            UnitOwnership::Dwelling { id: dwelling } => {
                if let Some(existing) = missionaries.insert(dwelling, id) {
                    violations.push(InvariantViolation::on_unit(
                        Invariant::SingleMissionary,
                        id,
                        format!("dwelling {dwelling} has multiple missionaries ({existing} and {id})."),
                    ));
                }
            }
            UnitOwnership::Cargo { holder } => {
                let in_hold = match o.units.get(&GenericId::from(holder)) {
                    Some(UnitState::Euro(h)) => h.unit.cargo.find_unit(unit_id).is_some(),
                    _ => false,
                };
                if !in_hold {
                    violations.push(InvariantViolation::on_unit(
                        Invariant::CargoConsistent,
                        id,
                        format!("unit {id} is owned as cargo by unit {holder} but is not in its hold."),
                    ));
                }
            }
            UnitOwnership::World { .. } | UnitOwnership::Colony { .. } => {}
        }

        if euro.ownership.implies_ordering() && !o.unit_ordering.contains_key(&unit_id) {
            violations.push(InvariantViolation::on_unit(
                Invariant::OrderingPresent,
                id,
                format!(
                    "unit {id} is in the `{}` state but has no turn-ordering entry.",
                    euro.ownership.name()
                ),
            ));
        }

        check_cargo_hold(o, unit_id, &mut violations);
    }

    check_ordering(o, &mut violations);
    violations
}

fn check_cargo_hold(o: &WrappedUnitsState, holder: UnitId, violations: &mut Vec<InvariantViolation>) {
    let Some(UnitState::Euro(euro)) = o.units.get(&GenericId::from(holder)) else {
        return;
    };
    let hold = &euro.unit.cargo;
    let capacity = euro.unit.composition.attributes.cargo_slots;
    if hold.slots_total() != capacity {
        violations.push(InvariantViolation::on_unit(
            Invariant::CargoConsistent,
            holder.into(),
            format!(
                "unit {holder} has {} cargo slots but its type provides {capacity}.",
                hold.slots_total()
            ),
        ));
    }
    if let Err(msg) = hold.validate_shape() {
        violations.push(InvariantViolation::on_unit(
            Invariant::CargoConsistent,
            holder.into(),
            format!("unit {holder}: {msg}."),
        ));
    }
    let mut seen = HashSet::new();
    for (slot, contents) in hold.slots().iter().enumerate() {
        let CargoSlot::Unit(held) = *contents else {
            continue;
        };
        let fail = |msg: String| {
            InvariantViolation::on_unit(Invariant::CargoConsistent, held.into(), msg)
        };
        if !seen.insert(held) {
            violations.push(fail(format!(
                "unit {held} appears more than once in the hold of unit {holder}."
            )));
            continue;
        }
        let Some(UnitState::Euro(held_state)) = o.units.get(&GenericId::from(held)) else {
            violations.push(fail(format!(
                "unit {holder} carries unit {held} in slot {slot}, which is not an existing european unit."
            )));
            continue;
        };
        if held_state.ownership != (UnitOwnership::Cargo { holder }) {
            violations.push(fail(format!(
                "unit {held} is in the cargo of unit {holder} but its owner is `{}`.",
                held_state.ownership.name()
            )));
        }
        let attributes = held_state.unit.composition.attributes;
        if attributes.cargo_slots > 0 {
            violations.push(fail(format!(
                "unit {held} has a cargo hold of its own but is carried by unit {holder}."
            )));
        }
        match attributes.cargo_slots_occupies {
            None => violations.push(fail(format!(
                "unit {held} cannot occupy cargo slots but is carried by unit {holder}."
            ))),
            Some(occupies) => {
                let overflow = hold.overflow_after(slot);
                if overflow + 1 != occupies {
                    violations.push(fail(format!(
                        "unit {held} occupies {occupies} slot(s) but has {} in the hold of unit {holder}.",
                        overflow + 1
                    )));
                }
            }
        }
    }
}

fn check_ordering(o: &WrappedUnitsState, violations: &mut Vec<InvariantViolation>) {
    // The next bump hands out counter + 1, which must be positive.
    if o.curr_unit_ordering_index < 0 {
        violations.push(InvariantViolation::global(
            Invariant::OrderingInRange,
            format!(
                "the turn-ordering counter is negative ({}).",
                o.curr_unit_ordering_index
            ),
        ));
    }
    let mut seen: HashMap<i64, UnitId> = HashMap::new();
    for (&id, &value) in &o.unit_ordering {
        if value <= 0 || value > o.curr_unit_ordering_index {
            violations.push(InvariantViolation::on_unit(
                Invariant::OrderingInRange,
                id.into(),
                format!(
                    "unit {id} has ordering value {value}, outside 1..={}.",
                    o.curr_unit_ordering_index
                ),
            ));
        }
        if let Some(other) = seen.insert(value, id) {
            violations.push(InvariantViolation::on_unit(
                Invariant::OrderingUnique,
                id.into(),
                format!("units {other} and {id} share ordering value {value}."),
            ));
        }
        let owned_by_map_or_harbor = matches!(
            o.units.get(&GenericId::from(id)),
            Some(UnitState::Euro(euro)) if euro.ownership.implies_ordering()
        );
        if !owned_by_map_or_harbor {
            violations.push(InvariantViolation::on_unit(
                Invariant::OrderingOwner,
                id.into(),
                format!("unit {id} has an ordering entry but is not a european unit on the map or in the harbor."),
            ));
        }
    }
}

/// Validate a snapshot, stopping at the first violation.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate(o: &WrappedUnitsState) -> Result<(), InvariantViolation> {
    match check_invariants(o).into_iter().next() {
        Some(violation) => Err(violation),
        None => Ok(()),
    }
}

/// Check that a live store's indices match a rebuild from its records.
#[must_use]
pub fn check_index_agreement(units: &UnitsState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let indices = units.indices();

    for (&id, state) in units.all() {
        match state {
            UnitState::Euro(euro) => {
                let unit_id = UnitId::from_generic_unchecked(id);
                let indexed = match euro.ownership {
                    UnitOwnership::World { coord } => indices.on_map(coord).contains(&id),
                    UnitOwnership::Colony { id: colony } => indices.workers(colony).contains(&unit_id),
                    UnitOwnership::Dwelling { id: dwelling } => {
                        indices.missionary(dwelling) == Some(unit_id)
                    }
                    UnitOwnership::Free | UnitOwnership::Cargo { .. } | UnitOwnership::Harbor(_) => true,
                };
                if !indexed {
                    violations.push(InvariantViolation::on_unit(
                        Invariant::IndexAgreement,
                        id,
                        format!(
                            "unit {id} is in the `{}` state but missing from the matching index.",
                            euro.ownership.name()
                        ),
                    ));
                }
            }
            UnitState::Native(native) => {
                let native_id = crate::units::NativeUnitId::from_generic_unchecked(id);
                let on_map = indices.on_map(native.ownership.coord).contains(&id);
                let with_dwelling = indices.braves(native.ownership.dwelling_id).contains(&native_id);
                if !on_map || !with_dwelling {
                    violations.push(InvariantViolation::on_unit(
                        Invariant::IndexAgreement,
                        id,
                        format!("native unit {id} is missing from the coordinate or dwelling index."),
                    ));
                }
            }
        }
    }

    // Catches stale entries, which the per-unit pass cannot see.
    if violations.is_empty() && *indices != SecondaryIndices::rebuild(units.wrapped()) {
        violations.push(InvariantViolation::global(
            Invariant::IndexAgreement,
            "secondary indices hold entries for units that are not owned accordingly.",
        ));
    }
    violations
}

/// Assert every invariant of a live store, indices included.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics listing every violation found.
#[cfg(debug_assertions)]
pub fn assert_invariants(units: &UnitsState) {
    let mut violations = check_invariants(units.wrapped());
    violations.extend(check_index_agreement(units));
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
        panic!("units store invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_units: &UnitsState) {}
