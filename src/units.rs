//! Unit ownership and spatial indexing.
//!
//! Every unit in the game lives in one [`UnitsState`]. European units
//! move between six ownership states (free, on the map, in cargo, in
//! the harbor, in a colony, in a dwelling); native units are always on
//! the map and tied to a dwelling. The store keeps lookup tables by map
//! square, colony and dwelling in step with those records, plus a turn
//! ordering that decides which unit asks for orders next.

mod cargo;
mod composition;
mod coord;
mod ids;
mod indices;
mod ordering;
mod ownership;
mod state;
mod unit;
mod validate;
mod wrapped;

pub use cargo::{CargoHold, CargoSlot, Commodity, MAX_COMMODITY_PER_SLOT};
pub use composition::{NativeUnitType, UnitAttributes, UnitComposition};
pub use coord::{Coord, Rect};
pub use ids::{ColonyId, DwellingId, FIRST_UNIT_ID, GenericId, IdAllocator, NativeUnitId, UnitId, UnitKind};
pub use indices::SecondaryIndices;
pub use ordering::{TurnOrdering, in_order};
pub use ownership::{HarborState, NativeUnitOwnership, PortStatus, UnitOwnership};
pub use state::UnitsState;
pub use unit::{NativeUnit, Unit, UnitOrders};
pub use validate::{assert_invariants, check_index_agreement, check_invariants, validate};
pub use wrapped::{EuroUnitState, NativeUnitState, UnitState, WrappedUnitsState};
