#![no_main]

//! Ownership transition fuzzer.
//!
//! Drives a store with arbitrary operation sequences, skipping the ones
//! that would break a caller contract, and checks after every step that
//! the records, indices and turn ordering still agree. A final snapshot
//! round-trip must reproduce the same store.

use arbitrary::Arbitrary;
use colonia::units::{
    NativeUnit, NativeUnitType, PortStatus, Unit, UnitComposition, check_index_agreement,
    check_invariants,
};
use colonia::{ColonyId, Coord, DwellingId, UnitId, UnitsState};
use libfuzzer_sys::fuzz_target;

/// A fuzzer-generated operation. Unit indices wrap around the live units.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzOp {
    AddEuro { kind: u8, x: u8, y: u8 },
    AddNative { x: u8, y: u8, dwelling: u8 },
    ToMap { unit: u8, x: u8, y: u8 },
    ToCargo { holder: u8, held: u8, slot: u8 },
    ToHarbor { unit: u8, status: u8, turns: u8 },
    ToColony { unit: u8, colony: u8 },
    ToDwelling { unit: u8, dwelling: u8 },
    MoveNative { unit: u8, x: u8, y: u8 },
    Bump { unit: u8 },
    Destroy { unit: u8 },
    DestroyNative { unit: u8 },
}

fuzz_target!(|ops: Vec<FuzzOp>| {
    let mut units = UnitsState::new();

    for op in ops.iter().take(200) {
        apply_op(&mut units, op);

        let violations = check_index_agreement(&units);
        assert!(violations.is_empty(), "indices disagree after {op:?}: {violations:?}");
        let violations = check_invariants(units.wrapped());
        assert!(violations.is_empty(), "invariants violated after {op:?}: {violations:?}");
    }

    let json = serde_json::to_string(units.wrapped()).expect("encode snapshot");
    let wrapped = serde_json::from_str(&json).expect("decode snapshot");
    let reloaded = UnitsState::try_from(wrapped).expect("reload snapshot");
    assert_eq!(reloaded, units);
});

fn pick<T: Copy>(items: &[T], idx: u8) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[usize::from(idx) % items.len()])
    }
}

fn coord(x: u8, y: u8) -> Coord {
    Coord::new(u16::from(x % 16), u16::from(y % 16))
}

/// Apply a fuzzer-generated operation if it is legal.
fn apply_op(units: &mut UnitsState, op: &FuzzOp) {
    let euros: Vec<UnitId> = units.euro_all().map(|(id, _)| id).collect();
    let natives: Vec<_> = units.native_all().map(|(id, _)| id).collect();

    match *op {
        FuzzOp::AddEuro { kind, x, y } => {
            let composition = match kind % 7 {
                0 => UnitComposition::free_colonist(),
                1 => UnitComposition::soldier(),
                2 => UnitComposition::missionary(),
                3 => UnitComposition::treasure(i32::from(kind) * 10),
                4 => UnitComposition::wagon_train(),
                5 => UnitComposition::caravel(),
                _ => UnitComposition::galleon(),
            };
            let id = units.add_unit(Unit::new(composition));
            units.to_map(id, coord(x, y));
        }
        FuzzOp::AddNative { x, y, dwelling } => {
            let _ = units.add_unit_on_map(
                NativeUnit::new(NativeUnitType::Brave),
                coord(x, y),
                DwellingId(u32::from(dwelling % 4)),
            );
        }
        FuzzOp::ToMap { unit, x, y } => {
            if let Some(id) = pick(&euros, unit) {
                units.to_map(id, coord(x, y));
            }
        }
        FuzzOp::ToCargo { holder, held, slot } => {
            let (Some(holder), Some(held)) = (pick(&euros, holder), pick(&euros, held)) else {
                return;
            };
            let attrs = units.unit_for(held).composition.attributes;
            let Some(occupies) = attrs.cargo_slots_occupies else {
                return;
            };
            let hold = &units.unit_for(holder).cargo;
            let slot = usize::from(slot % 6);
            if holder != held
                && attrs.cargo_slots == 0
                && hold.slots_total() > 0
                && units.maybe_holder_of(held).is_none()
                && hold.fits_unit(slot, occupies)
            {
                units.to_cargo(holder, held, slot);
            }
        }
        FuzzOp::ToHarbor { unit, status, turns } => {
            if let Some(id) = pick(&euros, unit) {
                let turns = i32::from(turns % 8);
                let status = match status % 3 {
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
        FuzzOp::ToColony { unit, colony } => {
            if let Some(id) = pick(&euros, unit) {
                if units.unit_for(id).composition.attributes.cargo_slots == 0 {
                    units.to_colony(id, ColonyId(u32::from(colony % 4)));
                }
            }
        }
        FuzzOp::ToDwelling { unit, dwelling } => {
            if let Some(id) = pick(&euros, unit) {
                let dwelling = DwellingId(u32::from(dwelling % 4));
                let vacant = units.missionary_of(dwelling).is_none_or(|m| m == id);
                if vacant && units.unit_for(id).composition.attributes.cargo_slots == 0 {
                    units.to_dwelling(id, dwelling);
                }
            }
        }
        FuzzOp::MoveNative { unit, x, y } => {
            if let Some(id) = pick(&natives, unit) {
                units.move_native(id, coord(x, y));
            }
        }
        FuzzOp::Bump { unit } => {
            if let Some(id) = pick(&euros, unit) {
                if units.ownership_of(id).implies_ordering() {
                    units.bump_ordering(id);
                }
            }
        }
        FuzzOp::Destroy { unit } => {
            if let Some(id) = pick(&euros, unit) {
                units.destroy_unit(id);
            }
        }
        FuzzOp::DestroyNative { unit } => {
            if let Some(id) = pick(&natives, unit) {
                units.destroy_native_unit(id);
            }
        }
    }
}
