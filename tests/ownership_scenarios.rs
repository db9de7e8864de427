//! End-to-end ownership scenarios for the units store.
//!
//! Each test walks units through a sequence of transitions and checks
//! the records, the indices and the turn ordering together.
//!
//! Run with: cargo test ownership_scenarios

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use colonia::units::{
    HarborState, NativeUnit, NativeUnitType, PortStatus, Unit, UnitComposition, UnitOrders,
    check_index_agreement, check_invariants,
};
use colonia::{ColonyId, Coord, DwellingId, GenericId, UnitId, UnitKind, UnitOwnership, UnitsState};
use std::collections::BTreeSet;

fn add(units: &mut UnitsState, composition: UnitComposition) -> UnitId {
    units.add_unit(Unit::new(composition))
}

fn assert_consistent(units: &UnitsState) {
    let mut violations = check_invariants(units.wrapped());
    violations.extend(check_index_agreement(units));
    assert!(violations.is_empty(), "{violations:?}");
}

fn ids<I: IntoIterator<Item = T>, T: Into<GenericId>>(items: I) -> BTreeSet<GenericId> {
    items.into_iter().map(Into::into).collect()
}

#[test]
fn test_map_cargo_colony_destroy_walkthrough() {
    let mut units = UnitsState::new();
    let tile = Coord::new(3, 4);

    let a = add(&mut units, UnitComposition::free_colonist());
    units.to_map(a, tile);
    assert_eq!(*units.units_at(tile), ids([a]));
    let k1 = units.ordering_of(a).unwrap();
    assert!(k1 > 0);

    let b = add(&mut units, UnitComposition::caravel());
    units.to_map(b, tile);
    assert_eq!(*units.units_at(tile), ids([a, b]));
    let k2 = units.ordering_of(b).unwrap();
    assert!(k2 > k1);

    units.to_cargo(b, a, 0);
    assert_eq!(*units.units_at(tile), ids([b]));
    assert_eq!(units.holder_of(a), b);
    assert_eq!(units.ordering_of(a), None);
    assert_consistent(&units);

    // Straight from cargo; to_colony disowns internally.
    let colony = ColonyId(1);
    units.to_colony(a, colony);
    assert_eq!(units.workers_of(colony).iter().copied().collect::<Vec<_>>(), vec![a]);
    assert_eq!(units.unit_for(b).cargo.slots_occupied(), 0);
    assert_consistent(&units);

    units.destroy_unit(b);
    assert!(!units.exists(b));
    assert!(units.units_at(tile).is_empty());
    assert_consistent(&units);
}

#[test]
#[should_panic(expected = "existed but was destroyed")]
fn test_coord_for_destroyed_unit_is_fatal() {
    let mut units = UnitsState::new();
    let b = add(&mut units, UnitComposition::caravel());
    units.to_map(b, Coord::new(3, 4));
    units.destroy_unit(b);
    let _ = units.coord_for(b);
}

#[test]
#[should_panic(expected = "never existed")]
fn test_kind_of_unallocated_is_fatal() {
    let units = UnitsState::new();
    let _ = units.kind_of(GenericId::new(1));
}

#[test]
fn test_kind_survives_destruction() {
    let mut units = UnitsState::new();
    let n = units.add_unit_on_map(NativeUnit::new(NativeUnitType::MountedBrave), Coord::new(0, 0), DwellingId(1));
    units.destroy_native_unit(n);
    assert!(!units.exists(n));
    assert_eq!(units.kind_of(n), UnitKind::Native);
}

#[test]
fn test_harbor_cycle() {
    let mut units = UnitsState::new();
    let ship = add(&mut units, UnitComposition::galleon());
    let origin = Coord::new(10, 2);
    units.to_map(ship, origin);
    let soldier = add(&mut units, UnitComposition::soldier());
    units.to_cargo(ship, soldier, 0);

    units.to_harbor(ship, PortStatus::Outbound { turns: 0 }, Some(origin));
    assert!(units.units_at(origin).is_empty());
    // Cargo travels with the ship.
    assert_eq!(units.holder_of(soldier), ship);
    assert_eq!(units.coord_for_indirect(soldier), None);

    for turns in 1..3 {
        units.to_harbor(ship, PortStatus::Outbound { turns }, Some(origin));
    }
    units.to_harbor(ship, PortStatus::InPort, Some(origin));
    assert_eq!(
        units.harbor_state_of(ship),
        Some(&HarborState {
            port_status: PortStatus::InPort,
            sailed_from: Some(origin),
        })
    );
    assert_consistent(&units);

    // Unload onto the dock, then sail back.
    units.to_harbor(soldier, PortStatus::InPort, None);
    assert_eq!(units.units_in_harbor(), vec![ship, soldier]);
    units.to_harbor(ship, PortStatus::Inbound { turns: 0 }, Some(origin));
    assert_eq!(units.units_in_harbor(), vec![soldier, ship]);
    units.to_map(ship, origin);
    assert_eq!(units.units_in_harbor(), vec![soldier]);
    assert_consistent(&units);
}

#[test]
fn test_missionary_lifecycle() {
    let mut units = UnitsState::new();
    let dwelling = DwellingId(12);
    let missionary = add(&mut units, UnitComposition::missionary());
    units.to_map(missionary, Coord::new(5, 5));
    units.to_dwelling(missionary, dwelling);
    assert_eq!(units.missionary_of(dwelling), Some(missionary));
    assert_eq!(units.ordering_of(missionary), None);
    assert_consistent(&units);

    // A replacement may only arrive once the first has left.
    units.destroy_unit(missionary);
    assert_eq!(units.missionary_of(dwelling), None);
    let second = add(&mut units, UnitComposition::missionary());
    units.to_dwelling(second, dwelling);
    assert_eq!(units.missionary_of(dwelling), Some(second));
    assert_consistent(&units);
}

#[test]
fn test_braves_and_euro_units_share_tiles() {
    let mut units = UnitsState::new();
    let tile = Coord::new(8, 8);
    let brave = units.add_unit_on_map(NativeUnit::new(NativeUnitType::Brave), tile, DwellingId(3));
    let scout = add(&mut units, UnitComposition::free_colonist());
    units.to_map(scout, tile);
    assert_eq!(*units.units_at(tile), ids([GenericId::from(brave), GenericId::from(scout)]));

    units.move_native(brave, Coord::new(8, 9));
    assert_eq!(*units.units_at(tile), ids([scout]));
    assert_eq!(units.dwelling_for(brave), DwellingId(3));
    assert!(units.braves_of(DwellingId(3)).contains(&brave));
    assert_consistent(&units);
}

#[test]
fn test_destroying_wagon_train_destroys_its_cargo() {
    let mut units = UnitsState::new();
    let tile = Coord::new(2, 2);
    let wagon = add(&mut units, UnitComposition::wagon_train());
    units.to_map(wagon, tile);
    let a = add(&mut units, UnitComposition::free_colonist());
    let b = add(&mut units, UnitComposition::free_colonist());
    units.to_cargo(wagon, a, 0);
    units.to_cargo(wagon, b, 1);
    assert_eq!(units.units_at_recursive(tile), vec![GenericId::from(wagon), a.into(), b.into()]);

    units.destroy_unit(wagon);
    assert!(!units.exists(a));
    assert!(!units.exists(b));
    assert!(units.all().is_empty());
    assert_consistent(&units);
}

#[test]
fn test_cargo_units_are_sentried_and_woken_on_land() {
    let mut units = UnitsState::new();
    let ship = add(&mut units, UnitComposition::caravel());
    units.to_map(ship, Coord::new(0, 0));
    let a = add(&mut units, UnitComposition::free_colonist());
    units.to_map(a, Coord::new(0, 1));
    units.unit_for_mut(a).start_fortify();

    units.to_cargo(ship, a, 1);
    assert_eq!(units.unit_for(a).orders, UnitOrders::Sentry);

    units.to_map(a, Coord::new(0, 1));
    units.unit_for_mut(a).clear_orders();
    assert!(!units.unit_for(a).has_orders());
    assert_eq!(*units.ownership_of(a), UnitOwnership::World { coord: Coord::new(0, 1) });
}

#[test]
fn test_ordering_follows_activity() {
    let mut units = UnitsState::new();
    let tile = Coord::new(1, 1);
    let a = add(&mut units, UnitComposition::free_colonist());
    let b = add(&mut units, UnitComposition::free_colonist());
    let c = add(&mut units, UnitComposition::free_colonist());
    for id in [a, b, c] {
        units.to_map(id, tile);
    }
    assert_eq!(units.units_in_ordering(), vec![a, b, c]);

    units.bump_ordering(a);
    assert_eq!(units.units_in_ordering(), vec![b, c, a]);

    units.to_colony(b, ColonyId(2));
    units.to_map(b, tile);
    assert_eq!(units.units_in_ordering(), vec![c, a, b]);
    assert_eq!(units.curr_ordering_index(), 5);
}

#[test]
fn test_reload_from_snapshot_keeps_everything() {
    let mut units = UnitsState::new();
    let ship = add(&mut units, UnitComposition::galleon());
    units.to_map(ship, Coord::new(4, 4));
    let treasure = add(&mut units, UnitComposition::treasure(5000));
    units.to_cargo(ship, treasure, 0);
    let worker = add(&mut units, UnitComposition::free_colonist());
    units.to_colony(worker, ColonyId(9));
    let priest = add(&mut units, UnitComposition::missionary());
    units.to_dwelling(priest, DwellingId(2));
    let gone = add(&mut units, UnitComposition::soldier());
    units.to_map(gone, Coord::new(0, 0));
    units.destroy_unit(gone);
    let brave = units.add_unit_on_map(NativeUnit::new(NativeUnitType::ArmedBrave), Coord::new(4, 4), DwellingId(2));

    let reloaded = UnitsState::try_from(units.wrapped().clone()).unwrap();
    assert_eq!(reloaded, units);
    assert_consistent(&reloaded);
    assert_eq!(*reloaded.units_at(Coord::new(4, 4)), ids([GenericId::from(ship), GenericId::from(brave)]));
    assert_eq!(reloaded.holder_of(treasure), ship);
    assert_eq!(reloaded.missionary_of(DwellingId(2)), Some(priest));
    assert!(reloaded.workers_of(ColonyId(9)).contains(&worker));
    assert!(!reloaded.exists(gone));
    assert_eq!(reloaded.last_unit_id(), units.last_unit_id());
}
