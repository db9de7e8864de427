//! The units store.
//!
//! `UnitsState` owns every unit, its ownership record, and the indices
//! derived from those records. All ownership changes go through the
//! `to_*` transitions, and every transition goes through [`UnitsState::disown`]
//! first, which is what keeps the indices in step with the records.
//!
//! Misuse by a caller (a destroyed ID, a second missionary, a ship as
//! cargo) panics with a message naming the unit. Bad data coming from a
//! snapshot is reported by [`UnitsState::try_from`] instead.

use crate::error::InvariantViolation;
use crate::units::indices::SecondaryIndices;
use crate::units::ordering::{self, TurnOrdering};
use crate::units::validate;
use crate::units::{
    ColonyId, Coord, DwellingId, EuroUnitState, GenericId, HarborState, NativeUnit, NativeUnitId,
    NativeUnitOwnership, NativeUnitState, PortStatus, Rect, Unit, UnitId, UnitKind, UnitOwnership,
    UnitState, WrappedUnitsState,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// The unit ownership and spatial-index store.
#[derive(Debug, Clone, Default)]
pub struct UnitsState {
    o: WrappedUnitsState,
    // Destroyed IDs. They are never reused; kept to tell "destroyed"
    // apart from "never existed" in diagnostics.
    deleted: HashSet<GenericId>,
    // Kind of every ID seen by this store, destroyed ones included.
    kinds: HashMap<GenericId, UnitKind>,
    euro_units: BTreeSet<UnitId>,
    native_units: BTreeSet<NativeUnitId>,
    indices: SecondaryIndices,
}

impl PartialEq for UnitsState {
    fn eq(&self, rhs: &Self) -> bool {
        self.o == rhs.o
    }
}

impl TryFrom<WrappedUnitsState> for UnitsState {
    type Error = InvariantViolation;

    /// Validate a snapshot and rebuild all derived state from it.
    fn try_from(o: WrappedUnitsState) -> Result<Self, Self::Error> {
        validate::validate(&o)?;
        let indices = SecondaryIndices::rebuild(&o);
        let mut kinds = HashMap::with_capacity(o.units.len());
        let mut euro_units = BTreeSet::new();
        let mut native_units = BTreeSet::new();
        for (&id, state) in &o.units {
            kinds.insert(id, state.kind());
            match state {
                UnitState::Euro(_) => {
                    euro_units.insert(UnitId::from_generic_unchecked(id));
                }
                UnitState::Native(_) => {
                    native_units.insert(NativeUnitId::from_generic_unchecked(id));
                }
            }
        }
        Ok(Self {
            o,
            deleted: HashSet::new(),
            kinds,
            euro_units,
            native_units,
            indices,
        })
    }
}

impl UnitsState {
    /// An empty store whose first ID will be 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The persisted part of the store.
    #[must_use]
    pub fn wrapped(&self) -> &WrappedUnitsState {
        &self.o
    }

    /// Give up the store, keeping only its persisted part.
    #[must_use]
    pub fn into_wrapped(self) -> WrappedUnitsState {
        self.o
    }

    pub(crate) fn indices(&self) -> &SecondaryIndices {
        &self.indices
    }

    // ------------------------------------------------------------
    // IDs and kinds.
    // ------------------------------------------------------------

    /// The next ID that will be issued.
    #[must_use]
    pub fn last_unit_id(&self) -> GenericId {
        self.o.next_unit_id.last_id()
    }

    /// Whether the unit is alive right now.
    ///
    /// False for destroyed and for never-allocated IDs.
    #[must_use]
    pub fn exists(&self, id: impl Into<GenericId>) -> bool {
        self.o.units.contains_key(&Into::<GenericId>::into(id))
    }

    /// Whether this store destroyed the unit.
    #[must_use]
    pub fn was_destroyed(&self, id: impl Into<GenericId>) -> bool {
        self.deleted.contains(&Into::<GenericId>::into(id))
    }

    /// Kind of the unit. Destroyed units keep their kind.
    ///
    /// # Panics
    ///
    /// Panics if the ID was never allocated, or if it was destroyed
    /// before this store was loaded.
    #[must_use]
    #[track_caller]
    pub fn kind_of(&self, id: impl Into<GenericId>) -> UnitKind {
        let id: GenericId = id.into();
        assert!(self.o.next_unit_id.was_allocated(id), "unit {id} never existed.");
        match self.kinds.get(&id) {
            Some(kind) => *kind,
            None => panic!("unit {id} was destroyed before this game was loaded; its kind is unknown."),
        }
    }

    /// Convert to a European unit ID.
    ///
    /// # Panics
    ///
    /// Panics if the unit does not exist or is native.
    #[must_use]
    #[track_caller]
    pub fn check_euro_unit(&self, id: GenericId) -> UnitId {
        self.check_live(id);
        let kind = self.kind_of(id);
        assert!(kind == UnitKind::Euro, "unit {id} is a {kind} unit, not a european unit.");
        UnitId::from_generic_unchecked(id)
    }

    /// Convert to a native unit ID.
    ///
    /// # Panics
    ///
    /// Panics if the unit does not exist or is European.
    #[must_use]
    #[track_caller]
    pub fn check_native_unit(&self, id: GenericId) -> NativeUnitId {
        self.check_live(id);
        let kind = self.kind_of(id);
        assert!(kind == UnitKind::Native, "unit {id} is a {kind} unit, not a native unit.");
        NativeUnitId::from_generic_unchecked(id)
    }

    #[track_caller]
    fn check_live(&self, id: GenericId) {
        assert!(
            !self.deleted.contains(&id),
            "unit with ID {id} existed but was destroyed."
        );
        assert!(self.o.next_unit_id.was_allocated(id), "unit {id} never existed.");
        assert!(self.o.units.contains_key(&id), "unit {id} does not exist.");
    }

    // ------------------------------------------------------------
    // Primary map access.
    // ------------------------------------------------------------

    /// Every unit, keyed by ID.
    #[must_use]
    pub fn all(&self) -> &BTreeMap<GenericId, UnitState> {
        &self.o.units
    }

    /// Every European unit.
    pub fn euro_all(&self) -> impl Iterator<Item = (UnitId, &EuroUnitState)> + '_ {
        self.euro_units.iter().map(|&id| (id, self.euro_state(id)))
    }

    /// Every native unit.
    pub fn native_all(&self) -> impl Iterator<Item = (NativeUnitId, &NativeUnitState)> + '_ {
        self.native_units.iter().map(|&id| (id, self.native_state(id)))
    }

    /// Primary-map entry of a live unit.
    ///
    /// # Panics
    ///
    /// Panics if the unit is not alive.
    #[must_use]
    #[track_caller]
    pub fn state_of(&self, id: GenericId) -> &UnitState {
        self.check_live(id);
        match self.o.units.get(&id) {
            Some(state) => state,
            None => panic!("unit {id} does not exist."),
        }
    }

    #[track_caller]
    fn euro_state(&self, id: UnitId) -> &EuroUnitState {
        match self.state_of(id.into()) {
            UnitState::Euro(state) => state,
            UnitState::Native(_) => panic!("unit {id} is not a european unit."),
        }
    }

    #[track_caller]
    fn euro_state_mut(&mut self, id: UnitId) -> &mut EuroUnitState {
        self.check_live(id.into());
        match self.o.units.get_mut(&GenericId::from(id)) {
            Some(UnitState::Euro(state)) => state,
            _ => panic!("unit {id} is not a european unit."),
        }
    }

    #[track_caller]
    fn native_state(&self, id: NativeUnitId) -> &NativeUnitState {
        match self.state_of(id.into()) {
            UnitState::Native(state) => state,
            UnitState::Euro(_) => panic!("unit {id} is not a native unit."),
        }
    }

    #[track_caller]
    fn native_state_mut(&mut self, id: NativeUnitId) -> &mut NativeUnitState {
        self.check_live(id.into());
        match self.o.units.get_mut(&GenericId::from(id)) {
            Some(UnitState::Native(state)) => state,
            _ => panic!("unit {id} is not a native unit."),
        }
    }

    /// A European unit's payload.
    #[must_use]
    #[track_caller]
    pub fn unit_for(&self, id: UnitId) -> &Unit {
        &self.euro_state(id).unit
    }

    /// Mutable access to a European unit's payload.
    ///
    /// Compositions and orders may be edited freely. The cargo hold must
    /// not be used to add or remove units; use the transitions for that.
    #[track_caller]
    pub fn unit_for_mut(&mut self, id: UnitId) -> &mut Unit {
        &mut self.euro_state_mut(id).unit
    }

    /// A native unit's payload.
    #[must_use]
    #[track_caller]
    pub fn native_unit_for(&self, id: NativeUnitId) -> &NativeUnit {
        &self.native_state(id).unit
    }

    /// Mutable access to a native unit's payload.
    #[track_caller]
    pub fn native_unit_for_mut(&mut self, id: NativeUnitId) -> &mut NativeUnit {
        &mut self.native_state_mut(id).unit
    }

    // ------------------------------------------------------------
    // Ownership queries.
    // ------------------------------------------------------------

    /// Owner of a European unit.
    #[must_use]
    #[track_caller]
    pub fn ownership_of(&self, id: UnitId) -> &UnitOwnership {
        &self.euro_state(id).ownership
    }

    /// Owner of a native unit.
    #[must_use]
    #[track_caller]
    pub fn native_ownership_of(&self, id: NativeUnitId) -> &NativeUnitOwnership {
        &self.native_state(id).ownership
    }

    #[track_caller]
    fn ownership_mut(&mut self, id: UnitId) -> &mut UnitOwnership {
        &mut self.euro_state_mut(id).ownership
    }

    /// Map square of a unit of either kind, if it is directly on the map.
    #[must_use]
    #[track_caller]
    pub fn maybe_coord_for(&self, id: impl Into<GenericId>) -> Option<Coord> {
        match self.state_of(id.into()) {
            UnitState::Euro(euro) => match euro.ownership {
                UnitOwnership::World { coord } => Some(coord),
                UnitOwnership::Free
                | UnitOwnership::Cargo { .. }
                | UnitOwnership::Harbor(_)
                | UnitOwnership::Colony { .. }
                | UnitOwnership::Dwelling { .. } => None,
            },
            UnitState::Native(native) => Some(native.ownership.coord),
        }
    }

    /// Map square of a unit that must be on the map.
    ///
    /// # Panics
    ///
    /// Panics if the unit is not alive or not directly on the map.
    #[must_use]
    #[track_caller]
    pub fn coord_for(&self, id: impl Into<GenericId>) -> Coord {
        let id: GenericId = id.into();
        match self.maybe_coord_for(id) {
            Some(coord) => coord,
            None => panic!("unit {id} is not on the map."),
        }
    }

    /// Map square of a unit, or of the unit carrying it.
    #[must_use]
    #[track_caller]
    pub fn coord_for_indirect(&self, id: UnitId) -> Option<Coord> {
        match *self.ownership_of(id) {
            UnitOwnership::World { coord } => Some(coord),
            UnitOwnership::Cargo { holder } => self.coord_for_indirect(holder),
            UnitOwnership::Free
            | UnitOwnership::Harbor(_)
            | UnitOwnership::Colony { .. }
            | UnitOwnership::Dwelling { .. } => None,
        }
    }

    /// The unit carrying `id`, if it is cargo.
    #[must_use]
    #[track_caller]
    pub fn maybe_holder_of(&self, id: UnitId) -> Option<UnitId> {
        match *self.ownership_of(id) {
            UnitOwnership::Cargo { holder } => Some(holder),
            UnitOwnership::Free
            | UnitOwnership::World { .. }
            | UnitOwnership::Harbor(_)
            | UnitOwnership::Colony { .. }
            | UnitOwnership::Dwelling { .. } => None,
        }
    }

    /// The unit carrying `id`.
    ///
    /// # Panics
    ///
    /// Panics if the unit is not being held as cargo.
    #[must_use]
    #[track_caller]
    pub fn holder_of(&self, id: UnitId) -> UnitId {
        match self.maybe_holder_of(id) {
            Some(holder) => holder,
            None => panic!("unit {id} is not being held as cargo."),
        }
    }

    /// Harbor state of the unit, if it is in the harbor.
    #[must_use]
    #[track_caller]
    pub fn harbor_state_of(&self, id: UnitId) -> Option<&HarborState> {
        match self.ownership_of(id) {
            UnitOwnership::Harbor(harbor) => Some(harbor),
            UnitOwnership::Free
            | UnitOwnership::World { .. }
            | UnitOwnership::Cargo { .. }
            | UnitOwnership::Colony { .. }
            | UnitOwnership::Dwelling { .. } => None,
        }
    }

    /// Dwelling a native unit belongs to.
    #[must_use]
    #[track_caller]
    pub fn dwelling_for(&self, id: NativeUnitId) -> DwellingId {
        self.native_ownership_of(id).dwelling_id
    }

    /// Dwelling the unit is stationed in as a missionary, if any.
    #[must_use]
    #[track_caller]
    pub fn maybe_dwelling_for_missionary(&self, id: UnitId) -> Option<DwellingId> {
        match *self.ownership_of(id) {
            UnitOwnership::Dwelling { id } => Some(id),
            UnitOwnership::Free
            | UnitOwnership::World { .. }
            | UnitOwnership::Cargo { .. }
            | UnitOwnership::Harbor(_)
            | UnitOwnership::Colony { .. } => None,
        }
    }

    // ------------------------------------------------------------
    // Index queries.
    // ------------------------------------------------------------

    /// Units directly on `coord` (not counting cargo).
    #[must_use]
    pub fn units_at(&self, coord: Coord) -> &BTreeSet<GenericId> {
        self.indices.on_map(coord)
    }

    /// Units on `coord` followed by the units each of them carries.
    ///
    /// Cargo never nests, so one level is enough.
    #[must_use]
    pub fn units_at_recursive(&self, coord: Coord) -> Vec<GenericId> {
        let mut res = Vec::new();
        for &id in self.units_at(coord) {
            res.push(id);
            if let UnitState::Euro(euro) = self.state_of(id) {
                let held = euro.unit.units_in_cargo().unwrap_or_default();
                res.extend(held.into_iter().map(GenericId::from));
            }
        }
        res
    }

    /// Units directly on any tile inside `rect`, row by row.
    ///
    /// Walks the rectangle when it is small, otherwise filters the
    /// occupied tiles.
    #[must_use]
    pub fn units_in_rect(&self, rect: Rect) -> Vec<GenericId> {
        let area = usize::from(rect.w) * usize::from(rect.h);
        if area <= self.indices.occupied_tiles().len() {
            return rect
                .coords()
                .flat_map(|coord| self.units_at(coord).iter().copied())
                .collect();
        }
        let mut tiles: Vec<_> = self
            .indices
            .occupied_tiles()
            .filter(|(coord, _)| rect.contains(**coord))
            .collect();
        tiles.sort_by_key(|(coord, _)| (coord.y, coord.x));
        tiles.into_iter().flat_map(|(_, ids)| ids.iter().copied()).collect()
    }

    /// Tiles holding at least one unit, with the units on each.
    pub fn occupied_tiles(&self) -> impl ExactSizeIterator<Item = (&Coord, &BTreeSet<GenericId>)> {
        self.indices.occupied_tiles()
    }

    /// Workers inside `colony`. Units standing on the colony tile are not included.
    #[must_use]
    pub fn workers_of(&self, colony: ColonyId) -> &BTreeSet<UnitId> {
        self.indices.workers(colony)
    }

    /// Missionary stationed in `dwelling`.
    #[must_use]
    pub fn missionary_of(&self, dwelling: DwellingId) -> Option<UnitId> {
        self.indices.missionary(dwelling)
    }

    /// Braves belonging to `dwelling`. Usually one, but a temporary
    /// second brave may exist as the target of an attack.
    #[must_use]
    pub fn braves_of(&self, dwelling: DwellingId) -> &BTreeSet<NativeUnitId> {
        self.indices.braves(dwelling)
    }

    // ------------------------------------------------------------
    // Turn ordering.
    // ------------------------------------------------------------

    /// Ordering value of a unit on the map or in the harbor.
    #[must_use]
    #[track_caller]
    pub fn ordering_of(&self, id: UnitId) -> Option<i64> {
        self.check_live(id.into());
        self.o.unit_ordering.get(&id).copied()
    }

    /// Last ordering value handed out.
    #[must_use]
    pub fn curr_ordering_index(&self) -> i64 {
        self.o.curr_unit_ordering_index
    }

    /// Units with an ordering value, least recently activated first.
    #[must_use]
    pub fn units_in_ordering(&self) -> Vec<UnitId> {
        ordering::in_order(&self.o.unit_ordering)
    }

    /// Units in the harbor, least recently activated first.
    #[must_use]
    pub fn units_in_harbor(&self) -> Vec<UnitId> {
        self.units_in_ordering()
            .into_iter()
            .filter(|&id| matches!(self.ownership_of(id), UnitOwnership::Harbor(_)))
            .collect()
    }

    fn ordering(&mut self) -> TurnOrdering<'_> {
        TurnOrdering::new(&mut self.o.unit_ordering, &mut self.o.curr_unit_ordering_index)
    }

    /// Move the unit to the back of the turn order.
    ///
    /// # Panics
    ///
    /// Panics unless the unit is on the map or in the harbor.
    #[track_caller]
    pub fn bump_ordering(&mut self, id: UnitId) -> i64 {
        let ownership = *self.ownership_of(id);
        assert!(
            ownership.implies_ordering(),
            "unit {id} is in the `{}` state and cannot hold a turn-ordering entry.",
            ownership.name()
        );
        self.ordering().bump(id)
    }

    // ------------------------------------------------------------
    // Creation and destruction.
    // ------------------------------------------------------------

    /// Add a European unit. It starts `free` and must be given an
    /// owner by the caller straight away.
    #[must_use]
    pub fn add_unit(&mut self, unit: Unit) -> UnitId {
        let id = self.o.next_unit_id.next_id();
        debug_assert!(!self.o.units.contains_key(&id));
        debug_assert!(!self.deleted.contains(&id));
        let unit_id = UnitId::from_generic_unchecked(id);
        self.o.units.insert(
            id,
            UnitState::Euro(EuroUnitState {
                unit,
                ownership: UnitOwnership::Free,
            }),
        );
        self.kinds.insert(id, UnitKind::Euro);
        self.euro_units.insert(unit_id);
        unit_id
    }

    /// Add a native unit on the map, tied to `dwelling`.
    #[must_use]
    pub fn add_unit_on_map(&mut self, unit: NativeUnit, coord: Coord, dwelling: DwellingId) -> NativeUnitId {
        let id = self.o.next_unit_id.next_id();
        debug_assert!(!self.o.units.contains_key(&id));
        let native_id = NativeUnitId::from_generic_unchecked(id);
        self.o.units.insert(
            id,
            UnitState::Native(NativeUnitState {
                unit,
                ownership: NativeUnitOwnership {
                    coord,
                    dwelling_id: dwelling,
                },
            }),
        );
        self.kinds.insert(id, UnitKind::Native);
        self.native_units.insert(native_id);
        // A dwelling may briefly have a second brave, e.g. one created
        // as the visible target of an attack.
        self.indices.insert_on_map(coord, id);
        self.indices.insert_brave(dwelling, native_id);
        native_id
    }

    /// Destroy a European unit along with everything in its cargo.
    ///
    /// # Panics
    ///
    /// Panics if the unit is not alive.
    #[track_caller]
    pub fn destroy_unit(&mut self, id: UnitId) {
        let generic = GenericId::from(id);
        self.check_live(generic);
        // Collect first; destroying cargo changes the hold.
        let held = self.unit_for(id).units_in_cargo().unwrap_or_default();
        for cargo_id in held {
            log::debug!("unit {cargo_id} destroyed as a consequence of unit {id} being destroyed");
            self.destroy_unit(cargo_id);
        }
        self.disown(id);
        self.o.units.remove(&generic);
        self.euro_units.remove(&id);
        self.deleted.insert(generic);
    }

    /// Destroy a native unit.
    ///
    /// # Panics
    ///
    /// Panics if the unit is not alive.
    #[track_caller]
    pub fn destroy_native_unit(&mut self, id: NativeUnitId) {
        let generic = GenericId::from(id);
        let NativeUnitOwnership { coord, dwelling_id } = *self.native_ownership_of(id);
        self.indices.remove_brave(dwelling_id, id);
        self.indices.remove_from_map(coord, generic);
        self.o.units.remove(&generic);
        self.native_units.remove(&id);
        self.deleted.insert(generic);
    }

    // ------------------------------------------------------------
    // Ownership transitions.
    // ------------------------------------------------------------

    /// Release the unit from whatever owns it and mark it `free`.
    ///
    /// A `free` unit must be given a new owner before control returns
    /// to the game loop.
    #[track_caller]
    pub fn disown(&mut self, id: UnitId) {
        let generic = GenericId::from(id);
        match *self.ownership_of(id) {
            UnitOwnership::Free => {}
            UnitOwnership::World { coord } => {
                self.indices.remove_from_map(coord, generic);
                self.ordering().erase(id);
            }
            UnitOwnership::Cargo { holder } => {
                let hold = &mut self.unit_for_mut(holder).cargo;
                let Some(slot) = hold.find_unit(id) else {
                    panic!("unit {id} is owned by unit {holder} but is not in its cargo.");
                };
                hold.remove(slot);
            }
            UnitOwnership::Harbor(_) => {
                self.ordering().erase(id);
            }
            UnitOwnership::Colony { id: colony } => {
                self.indices.remove_worker(colony, id);
            }
            UnitOwnership::Dwelling { id: dwelling } => {
                self.indices.remove_missionary(dwelling, id);
            }
        }
        *self.ownership_mut(id) = UnitOwnership::Free;
    }

    /// Put the unit on the map at `target` and move it to the back of
    /// the turn order. Does no terrain checks.
    #[track_caller]
    pub fn to_map(&mut self, id: UnitId, target: Coord) {
        self.disown(id);
        self.indices.insert_on_map(target, id.into());
        *self.ownership_mut(id) = UnitOwnership::World { coord: target };
        self.ordering().bump(id);
    }

    #[track_caller]
    fn cargo_occupancy(&self, holder: UnitId, held: UnitId) -> usize {
        assert!(holder != held, "unit {held} cannot be placed in its own cargo.");
        // Touch the holder so a dead holder is reported as such.
        let _ = self.unit_for(holder);
        let attributes = self.unit_for(held).composition.attributes;
        // Units that hold cargo can never be cargo themselves.
        assert!(
            attributes.cargo_slots == 0,
            "unit {held} has a cargo hold of its own and cannot be held as cargo."
        );
        match attributes.cargo_slots_occupies {
            Some(occupies) => occupies,
            None => panic!("unit {held} cannot occupy a cargo slot."),
        }
    }

    /// Put `held` into `slot` of `holder`'s cargo and sentry it.
    ///
    /// # Panics
    ///
    /// Panics if `held` can hold cargo itself, cannot be cargo, or does
    /// not fit at `slot`.
    #[track_caller]
    pub fn to_cargo(&mut self, holder: UnitId, held: UnitId, slot: usize) {
        let occupies = self.cargo_occupancy(holder, held);
        self.disown(held);
        // Checked after disowning: the unit may be moving within the
        // same hold and only fit once its old slots are freed.
        let hold = &mut self.unit_for_mut(holder).cargo;
        assert!(
            hold.fits_unit(slot, occupies),
            "unit {held} does not fit in slot {slot} of unit {holder}'s cargo."
        );
        hold.add_unit(slot, held, occupies);
        self.unit_for_mut(held).sentry();
        *self.ownership_mut(held) = UnitOwnership::Cargo { holder };
    }

    /// Put `held` into the first slot of `holder`'s cargo where it fits,
    /// trying `starting_slot` first and rotating right.
    ///
    /// # Panics
    ///
    /// Panics if no slot fits, or for the same reasons as [`Self::to_cargo`].
    #[track_caller]
    pub fn to_cargo_somewhere(&mut self, holder: UnitId, held: UnitId, starting_slot: usize) {
        let occupies = self.cargo_occupancy(holder, held);
        let hold = &self.unit_for(holder).cargo;
        let Some(slot) = hold.first_fit_from(starting_slot, occupies) else {
            panic!(
                "unit {held} cannot be placed in unit {holder}'s cargo: {} of {} slots free.",
                hold.slots_remaining(),
                hold.slots_total()
            );
        };
        self.to_cargo(holder, held, slot);
    }

    /// Put the unit in the European harbor and move it to the back of
    /// the turn order. A unit already in the harbor only has its status
    /// updated.
    ///
    /// # Panics
    ///
    /// Panics if `port_status` has out-of-range counters.
    #[track_caller]
    pub fn to_harbor(&mut self, id: UnitId, port_status: PortStatus, sailed_from: Option<Coord>) {
        if let Err(err) = port_status.validate() {
            panic!("invalid harbor state for unit {id}: {err}");
        }
        if !matches!(self.ownership_of(id), UnitOwnership::Harbor(_)) {
            self.disown(id);
        }
        *self.ownership_mut(id) = UnitOwnership::Harbor(HarborState {
            port_status,
            sailed_from,
        });
        self.ordering().bump(id);
    }

    /// Make the unit a worker in `colony`.
    ///
    /// The colony's own job assignments are the caller's business.
    #[track_caller]
    pub fn to_colony(&mut self, id: UnitId, colony: ColonyId) {
        self.disown(id);
        self.indices.insert_worker(colony, id);
        *self.ownership_mut(id) = UnitOwnership::Colony { id: colony };
    }

    /// Station the unit as the missionary of `dwelling`.
    ///
    /// # Panics
    ///
    /// Panics if the dwelling already has a missionary.
    #[track_caller]
    pub fn to_dwelling(&mut self, id: UnitId, dwelling: DwellingId) {
        self.disown(id);
        self.indices.insert_missionary(dwelling, id);
        *self.ownership_mut(id) = UnitOwnership::Dwelling { id: dwelling };
    }

    /// Move a native unit to `target`, keeping its dwelling.
    #[track_caller]
    pub fn move_native(&mut self, id: NativeUnitId, target: Coord) {
        let generic = GenericId::from(id);
        let from = self.native_ownership_of(id).coord;
        self.indices.remove_from_map(from, generic);
        self.indices.insert_on_map(target, generic);
        self.native_state_mut(id).ownership.coord = target;
    }
}
