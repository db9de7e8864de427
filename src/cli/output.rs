//! Output formatting utilities for CLI.

use colonia::units::{UnitState, UnitsState};
use colonia::{Coord, GenericId, UnitKind, UnitOwnership};
use serde::Serialize;

/// Counts of units per ownership state.
#[derive(Debug, Default, Serialize)]
pub(super) struct OwnershipCounts {
    pub(super) free: usize,
    pub(super) world: usize,
    pub(super) cargo: usize,
    pub(super) harbor: usize,
    pub(super) colony: usize,
    pub(super) dwelling: usize,
}

/// JSON-serializable store summary.
#[derive(Debug, Serialize)]
pub(super) struct StoreSummary {
    /// Next ID the allocator will issue.
    pub(super) next_unit_id: GenericId,
    /// Live European units.
    pub(super) euro_units: usize,
    /// Live native units.
    pub(super) native_units: usize,
    /// European units per ownership state.
    pub(super) ownership: OwnershipCounts,
    /// Tiles with at least one unit.
    pub(super) occupied_tiles: usize,
    /// Units holding a turn-ordering value.
    pub(super) ordering_entries: usize,
    /// Last ordering value handed out.
    pub(super) curr_ordering_index: i64,
}

impl StoreSummary {
    /// Summarize a store.
    pub(super) fn from_units(units: &UnitsState) -> Self {
        let mut ownership = OwnershipCounts::default();
        for (_, state) in units.euro_all() {
            match state.ownership {
                UnitOwnership::Free => ownership.free += 1,
                UnitOwnership::World { .. } => ownership.world += 1,
                UnitOwnership::Cargo { .. } => ownership.cargo += 1,
                UnitOwnership::Harbor(_) => ownership.harbor += 1,
                UnitOwnership::Colony { .. } => ownership.colony += 1,
                UnitOwnership::Dwelling { .. } => ownership.dwelling += 1,
            }
        }
        Self {
            next_unit_id: units.last_unit_id(),
            euro_units: units.euro_all().count(),
            native_units: units.native_all().count(),
            ownership,
            occupied_tiles: units.occupied_tiles().len(),
            ordering_entries: units.units_in_ordering().len(),
            curr_ordering_index: units.curr_ordering_index(),
        }
    }
}

/// One unit listed on a tile.
#[derive(Debug, Serialize)]
pub(super) struct TileUnit {
    pub(super) id: GenericId,
    pub(super) kind: UnitKind,
    pub(super) unit_type: String,
    /// Set when the unit is cargo of another unit on the tile.
    pub(super) holder: Option<GenericId>,
}

/// Units on a tile, cargo included.
pub(super) fn tile_listing(units: &UnitsState, coord: Coord) -> Vec<TileUnit> {
    units
        .units_at_recursive(coord)
        .into_iter()
        .map(|id| match units.state_of(id) {
            UnitState::Euro(euro) => TileUnit {
                id,
                kind: UnitKind::Euro,
                unit_type: euro.unit.composition.unit_type.clone(),
                holder: match euro.ownership {
                    UnitOwnership::Cargo { holder } => Some(holder.into()),
                    _ => None,
                },
            },
            UnitState::Native(native) => TileUnit {
                id,
                kind: UnitKind::Native,
                unit_type: format!("{:?}", native.unit.unit_type).to_lowercase(),
                holder: None,
            },
        })
        .collect()
}

/// Format a store summary as human-readable text.
pub(super) fn format_summary(summary: &StoreSummary) -> String {
    let mut output = String::new();
    let o = &summary.ownership;

    output.push_str(&format!(
        "Units: {} european, {} native\n",
        summary.euro_units, summary.native_units
    ));
    output.push_str(&format!("  Next unit id: {}\n", summary.next_unit_id));
    output.push_str(&format!("  On map:       {}\n", o.world));
    output.push_str(&format!("  In cargo:     {}\n", o.cargo));
    output.push_str(&format!("  In harbor:    {}\n", o.harbor));
    output.push_str(&format!("  In colonies:  {}\n", o.colony));
    output.push_str(&format!("  Missionaries: {}\n", o.dwelling));
    if o.free > 0 {
        output.push_str(&format!("  Free:         {}\n", o.free));
    }
    output.push_str(&format!("  Occupied tiles: {}\n", summary.occupied_tiles));
    output.push_str(&format!(
        "  Turn ordering: {} entries, counter at {}\n",
        summary.ordering_entries, summary.curr_ordering_index
    ));
    output
}

/// Format a tile listing as human-readable text.
pub(super) fn format_tile(coord: Coord, listing: &[TileUnit]) -> String {
    let mut output = String::new();
    output.push_str(&format!("Tile {coord}: {} unit(s)\n", listing.len()));
    for unit in listing {
        match unit.holder {
            Some(holder) => {
                output.push_str(&format!("    {} {} (cargo of {holder})\n", unit.id, unit.unit_type));
            }
            None => {
                output.push_str(&format!("  {} {} [{}]\n", unit.id, unit.unit_type, unit.kind));
            }
        }
    }
    output
}
