//! Property-based tests for the units store.
//!
//! Random operation sequences are interpreted against a store, skipping
//! any operation that would break a caller contract. After every step
//! the records, indices and turn ordering must agree.
//! Run with: cargo test --release prop_units

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

use colonia::sim::{SimulationConfig, run_simulation};
use colonia::units::{
    NativeUnit, NativeUnitType, PortStatus, Unit, UnitComposition, UnitState, WrappedUnitsState,
    check_index_agreement, check_invariants,
};
use colonia::{ColonyId, Coord, DwellingId, GenericId, UnitId, UnitOwnership, UnitsState};

/// One randomly generated operation. Indices pick among live units.
#[derive(Debug, Clone)]
enum Op {
    AddEuro { kind: u8, x: u16, y: u16 },
    AddNative { x: u16, y: u16, dwelling: u32 },
    ToMap { unit: usize, x: u16, y: u16 },
    ToCargo { holder: usize, held: usize, slot: usize },
    ToHarbor { unit: usize, status: u8, turns: i32 },
    ToColony { unit: usize, colony: u32 },
    ToDwelling { unit: usize, dwelling: u32 },
    MoveNative { unit: usize, x: u16, y: u16 },
    Bump { unit: usize },
    Destroy { unit: usize, native: bool },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u8..7, 0u16..8, 0u16..8).prop_map(|(kind, x, y)| Op::AddEuro { kind, x, y }),
        1 => (0u16..8, 0u16..8, 0u32..3).prop_map(|(x, y, dwelling)| Op::AddNative { x, y, dwelling }),
        3 => (any::<usize>(), 0u16..8, 0u16..8).prop_map(|(unit, x, y)| Op::ToMap { unit, x, y }),
        3 => (any::<usize>(), any::<usize>(), 0usize..6)
            .prop_map(|(holder, held, slot)| Op::ToCargo { holder, held, slot }),
        2 => (any::<usize>(), 0u8..3, 0i32..5).prop_map(|(unit, status, turns)| Op::ToHarbor { unit, status, turns }),
        2 => (any::<usize>(), 0u32..3).prop_map(|(unit, colony)| Op::ToColony { unit, colony }),
        1 => (any::<usize>(), 0u32..3).prop_map(|(unit, dwelling)| Op::ToDwelling { unit, dwelling }),
        2 => (any::<usize>(), 0u16..8, 0u16..8).prop_map(|(unit, x, y)| Op::MoveNative { unit, x, y }),
        1 => any::<usize>().prop_map(|unit| Op::Bump { unit }),
        2 => (any::<usize>(), any::<bool>()).prop_map(|(unit, native)| Op::Destroy { unit, native }),
    ]
}

fn composition(kind: u8) -> UnitComposition {
    match kind {
        0 => UnitComposition::free_colonist(),
        1 => UnitComposition::soldier(),
        2 => UnitComposition::missionary(),
        3 => UnitComposition::treasure(300),
        4 => UnitComposition::wagon_train(),
        5 => UnitComposition::caravel(),
        _ => UnitComposition::galleon(),
    }
}

fn nth<T: Copy>(items: &[T], idx: usize) -> Option<T> {
    if items.is_empty() { None } else { Some(items[idx % items.len()]) }
}

/// Apply `op` if it is legal. Returns the ID of a newly created unit.
fn apply(units: &mut UnitsState, op: &Op) -> Option<GenericId> {
    let euros: Vec<UnitId> = units.euro_all().map(|(id, _)| id).collect();
    let natives: Vec<_> = units.native_all().map(|(id, _)| id).collect();
    match *op {
        Op::AddEuro { kind, x, y } => {
            let id = units.add_unit(Unit::new(composition(kind)));
            units.to_map(id, Coord::new(x, y));
            return Some(id.into());
        }
        Op::AddNative { x, y, dwelling } => {
            let id = units.add_unit_on_map(NativeUnit::new(NativeUnitType::Brave), Coord::new(x, y), DwellingId(dwelling));
            return Some(id.into());
        }
        Op::ToMap { unit, x, y } => {
            if let Some(id) = nth(&euros, unit) {
                units.to_map(id, Coord::new(x, y));
            }
        }
        Op::ToCargo { holder, held, slot } => {
            let (Some(holder), Some(held)) = (nth(&euros, holder), nth(&euros, held)) else {
                return None;
            };
            let held_attrs = units.unit_for(held).composition.attributes;
            let holder_unit = units.unit_for(holder);
            let Some(occupies) = held_attrs.cargo_slots_occupies else {
                return None;
            };
            let legal = holder != held
                && held_attrs.cargo_slots == 0
                && holder_unit.composition.attributes.cargo_slots > 0
                && units.maybe_holder_of(held).is_none()
                && holder_unit.cargo.fits_unit(slot, occupies);
            if legal {
                units.to_cargo(holder, held, slot);
            }
        }
        Op::ToHarbor { unit, status, turns } => {
            if let Some(id) = nth(&euros, unit) {
                let status = match status {
                    0 => PortStatus::Outbound { turns },
                    1 => PortStatus::Inbound { turns },
                    _ => PortStatus::InPort,
                };
                if units.unit_for(id).is_ship() {
                    units.unit_for_mut(id).clear_orders();
                }
                let from = units.maybe_coord_for(id);
                units.to_harbor(id, status, from);
            }
        }
        Op::ToColony { unit, colony } => {
            if let Some(id) = nth(&euros, unit) {
                if units.unit_for(id).composition.attributes.cargo_slots == 0 {
                    units.to_colony(id, ColonyId(colony));
                }
            }
        }
        Op::ToDwelling { unit, dwelling } => {
            if let Some(id) = nth(&euros, unit) {
                let dwelling = DwellingId(dwelling);
                let free = units.missionary_of(dwelling).is_none_or(|m| m == id);
                if free && units.unit_for(id).composition.attributes.cargo_slots == 0 {
                    units.to_dwelling(id, dwelling);
                }
            }
        }
        Op::MoveNative { unit, x, y } => {
            if let Some(id) = nth(&natives, unit) {
                units.move_native(id, Coord::new(x, y));
            }
        }
        Op::Bump { unit } => {
            if let Some(id) = nth(&euros, unit) {
                if units.ownership_of(id).implies_ordering() {
                    units.bump_ordering(id);
                }
            }
        }
        Op::Destroy { unit, native: false } => {
            if let Some(id) = nth(&euros, unit) {
                units.destroy_unit(id);
            }
        }
        Op::Destroy { unit, native: true } => {
            if let Some(id) = nth(&natives, unit) {
                units.destroy_native_unit(id);
            }
        }
    }
    None
}

/// Which single-owner indices hold `id`.
fn index_memberships(units: &UnitsState, id: UnitId) -> usize {
    let generic = GenericId::from(id);
    let on_map = units
        .euro_all()
        .filter_map(|(_, s)| match s.ownership {
            UnitOwnership::World { coord } => Some(coord),
            _ => None,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|&c| units.units_at(c).contains(&generic))
        .count();
    let in_colony = (0..3).filter(|&c| units.workers_of(ColonyId(c)).contains(&id)).count();
    let in_dwelling = (0..3).filter(|&d| units.missionary_of(DwellingId(d)) == Some(id)).count();
    on_map + in_colony + in_dwelling
}

fn roundtrip(units: &UnitsState) -> UnitsState {
    let json = serde_json::to_string(units.wrapped()).unwrap();
    let wrapped: WrappedUnitsState = serde_json::from_str(&json).unwrap();
    UnitsState::try_from(wrapped).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Records, indices and ordering agree after every operation.
    #[test]
    fn prop_indices_agree_with_records(ops in prop::collection::vec(op_strategy(), 1..120)) {
        let mut units = UnitsState::new();
        for op in &ops {
            apply(&mut units, op);
            let violations = check_index_agreement(&units);
            prop_assert!(violations.is_empty(), "after {:?}: {:?}", op, violations);
            let violations = check_invariants(units.wrapped());
            prop_assert!(violations.is_empty(), "after {:?}: {:?}", op, violations);
        }
    }

    /// No unit sits in more than one owner index.
    #[test]
    fn prop_single_ownership(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let mut units = UnitsState::new();
        for op in &ops {
            apply(&mut units, op);
        }
        let euros: Vec<UnitId> = units.euro_all().map(|(id, _)| id).collect();
        for id in euros {
            prop_assert!(index_memberships(&units, id) <= 1, "unit {} owned twice", id);
        }
    }

    /// Ordering values are unique and ascend with activity.
    #[test]
    fn prop_ordering_injective(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let mut units = UnitsState::new();
        for op in &ops {
            apply(&mut units, op);
        }
        let values: Vec<i64> = units
            .units_in_ordering()
            .into_iter()
            .map(|id| units.ordering_of(id).unwrap())
            .collect();
        let distinct: HashSet<i64> = values.iter().copied().collect();
        prop_assert_eq!(distinct.len(), values.len());
        prop_assert!(values.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(values.iter().all(|&v| v > 0 && v <= units.curr_ordering_index()));
    }

    /// IDs of destroyed units are never handed out again.
    #[test]
    fn prop_no_id_reuse(ops in prop::collection::vec(op_strategy(), 1..100)) {
        let mut units = UnitsState::new();
        let mut seen: HashSet<GenericId> = HashSet::new();
        for op in &ops {
            if let Some(new_id) = apply(&mut units, op) {
                prop_assert!(seen.insert(new_id), "id {} issued twice", new_id);
            }
        }
        for id in &seen {
            prop_assert_eq!(units.exists(*id), units.all().contains_key(id));
        }
    }

    /// Snapshot -> JSON -> snapshot -> store is lossless.
    #[test]
    fn prop_snapshot_roundtrip(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let mut units = UnitsState::new();
        for op in &ops {
            apply(&mut units, op);
        }
        let reloaded = roundtrip(&units);
        prop_assert_eq!(&reloaded, &units);
        prop_assert!(check_index_agreement(&reloaded).is_empty());
        let again = roundtrip(&reloaded);
        prop_assert_eq!(again.wrapped(), units.wrapped());
        for (id, state) in units.all() {
            if let UnitState::Euro(_) = state {
                let unit = reloaded.check_euro_unit(*id);
                prop_assert_eq!(reloaded.ownership_of(unit), units.ownership_of(unit));
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// The same seed replays to the same store, ordering included.
    #[test]
    fn prop_simulation_is_deterministic(seed in any::<u64>(), steps in 0u32..400) {
        let config = SimulationConfig { steps, ..SimulationConfig::default() };
        let a = run_simulation(seed, &config).unwrap();
        let b = run_simulation(seed, &config).unwrap();
        prop_assert_eq!(a.units.wrapped(), b.units.wrapped());
        prop_assert_eq!(a.transitions, b.transitions);
        prop_assert!(check_index_agreement(&a.units).is_empty());
    }
}
