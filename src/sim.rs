//! Deterministic random driver for the units store.
//!
//! `run_simulation(seed, config)` populates a store and then applies a
//! stream of random but always legal transitions. The same seed and
//! config give the same store, turn ordering included, which makes this
//! the reference workload for replay determinism, benchmarks and the
//! `simulate` command.

// Coordinates come from bounded RNG draws
#![allow(clippy::cast_possible_truncation)]

use crate::error::ConfigError;
use crate::units::{
    self, ColonyId, Coord, DwellingId, NativeUnit, NativeUnitId, NativeUnitType, PortStatus, Unit,
    UnitComposition, UnitId, UnitOwnership, UnitsState,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deterministic PRNG using xorshift64.
#[derive(Debug, Clone, Copy)]
struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    const fn new(seed: u64) -> Self {
        // xorshift never leaves zero
        let state = if seed == 0 { 0x5555_5555_5555_5555 } else { seed };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Random u32 in [0, max).
    fn next_u32(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % u64::from(max)) as u32
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let idx = (self.next_u64() % items.len() as u64) as usize;
        Some(items[idx])
    }
}

/// Parameters of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Transitions to attempt after the initial population.
    pub steps: u32,
    /// European units created up front.
    pub euro_units: u32,
    /// Native units created up front.
    pub native_units: u32,
    /// Colonies available as worker destinations.
    pub colonies: u32,
    /// Dwellings available to missionaries and braves.
    pub dwellings: u32,
    /// Map width in tiles.
    pub map_width: u16,
    /// Map height in tiles.
    pub map_height: u16,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 1000,
            euro_units: 32,
            native_units: 12,
            colonies: 4,
            dwellings: 6,
            map_width: 40,
            map_height: 40,
        }
    }
}

impl SimulationConfig {
    /// Read a config from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// config is out of range.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the config describes a usable world.
    ///
    /// # Errors
    ///
    /// Returns the first field that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width == 0 {
            return Err(ConfigError::Invalid {
                field: "map_width",
                reason: "must be positive",
            });
        }
        if self.map_height == 0 {
            return Err(ConfigError::Invalid {
                field: "map_height",
                reason: "must be positive",
            });
        }
        if self.native_units > 0 && self.dwellings == 0 {
            return Err(ConfigError::Invalid {
                field: "dwellings",
                reason: "must be positive when native units are requested",
            });
        }
        Ok(())
    }
}

/// Outcome of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// The store after the last step.
    pub units: UnitsState,
    /// Transitions actually applied, initial placement included.
    pub transitions: u32,
    /// Steps whose randomly chosen transition had no legal target.
    pub skipped: u32,
}

struct Simulation<'a> {
    config: &'a SimulationConfig,
    rng: Rng,
    units: UnitsState,
    transitions: u32,
}

impl Simulation<'_> {
    fn random_coord(&mut self) -> Coord {
        let x = self.rng.next_u32(u32::from(self.config.map_width)) as u16;
        let y = self.rng.next_u32(u32::from(self.config.map_height)) as u16;
        Coord::new(x, y)
    }

    fn random_composition(&mut self) -> UnitComposition {
        match self.rng.next_u32(10) {
            0..=3 => UnitComposition::free_colonist(),
            4 => UnitComposition::soldier(),
            5 => UnitComposition::missionary(),
            6 => UnitComposition::treasure(100 + self.rng.next_u32(5000) as i32),
            7 => UnitComposition::wagon_train(),
            8 => UnitComposition::caravel(),
            _ => UnitComposition::galleon(),
        }
    }

    fn spawn_euro(&mut self) {
        let composition = self.random_composition();
        let coord = self.random_coord();
        let id = self.units.add_unit(Unit::new(composition));
        self.units.to_map(id, coord);
        self.transitions += 1;
    }

    fn spawn_native(&mut self) {
        let unit_type = match self.rng.next_u32(4) {
            0 => NativeUnitType::Brave,
            1 => NativeUnitType::ArmedBrave,
            2 => NativeUnitType::MountedBrave,
            _ => NativeUnitType::MountedWarrior,
        };
        let coord = self.random_coord();
        let dwelling = DwellingId(self.rng.next_u32(self.config.dwellings));
        let _ = self.units.add_unit_on_map(NativeUnit::new(unit_type), coord, dwelling);
        self.transitions += 1;
    }

    fn euro_ids(&self) -> Vec<UnitId> {
        self.units.euro_all().map(|(id, _)| id).collect()
    }

    fn native_ids(&self) -> Vec<NativeUnitId> {
        self.units.native_all().map(|(id, _)| id).collect()
    }

    // Units that may be workers, missionaries or cargo.
    fn is_plain_land_unit(&self, id: UnitId) -> bool {
        let attributes = self.units.unit_for(id).composition.attributes;
        attributes.cargo_slots == 0 && !attributes.ship
    }

    fn try_to_cargo(&mut self, held: UnitId) -> bool {
        let attributes = self.units.unit_for(held).composition.attributes;
        let Some(occupies) = attributes.cargo_slots_occupies else {
            return false;
        };
        if attributes.cargo_slots > 0 || self.units.maybe_holder_of(held).is_some() {
            return false;
        }
        // Holders must be somewhere a unit can walk onto them.
        let holders: Vec<UnitId> = self
            .units
            .euro_all()
            .filter(|(id, state)| {
                *id != held
                    && state.unit.cargo.slots_total() > 0
                    && matches!(state.ownership, UnitOwnership::World { .. } | UnitOwnership::Harbor(_))
            })
            .map(|(id, _)| id)
            .collect();
        let Some(holder) = self.rng.pick(&holders) else {
            return false;
        };
        let hold = &self.units.unit_for(holder).cargo;
        let start = self.rng.next_u32(hold.slots_total() as u32) as usize;
        if hold.first_fit_from(start, occupies).is_none() {
            return false;
        }
        self.units.to_cargo_somewhere(holder, held, start);
        true
    }

    fn try_to_harbor(&mut self, id: UnitId) -> bool {
        let sailed_from = self.units.maybe_coord_for(id);
        let port_status = match self.rng.next_u32(3) {
            0 => PortStatus::Outbound {
                turns: self.rng.next_u32(4) as i32,
            },
            1 => PortStatus::Inbound {
                turns: self.rng.next_u32(4) as i32,
            },
            _ => PortStatus::InPort,
        };
        if port_status == PortStatus::InPort && self.units.unit_for(id).is_ship() {
            self.units.unit_for_mut(id).clear_orders();
        }
        self.units.to_harbor(id, port_status, sailed_from);
        true
    }

    fn try_to_colony(&mut self, id: UnitId) -> bool {
        if self.config.colonies == 0 || !self.is_plain_land_unit(id) {
            return false;
        }
        let colony = ColonyId(self.rng.next_u32(self.config.colonies));
        self.units.to_colony(id, colony);
        true
    }

    fn try_to_dwelling(&mut self, id: UnitId) -> bool {
        if self.config.dwellings == 0 || !self.is_plain_land_unit(id) {
            return false;
        }
        let dwelling = DwellingId(self.rng.next_u32(self.config.dwellings));
        match self.units.missionary_of(dwelling) {
            Some(existing) if existing != id => false,
            _ => {
                self.units.to_dwelling(id, dwelling);
                true
            }
        }
    }

    fn try_fortify(&mut self, id: UnitId) -> bool {
        if !matches!(self.units.ownership_of(id), UnitOwnership::World { .. })
            || self.units.unit_for(id).is_ship()
        {
            return false;
        }
        let unit = self.units.unit_for_mut(id);
        if unit.has_orders() {
            unit.fortify();
        } else {
            unit.start_fortify();
        }
        true
    }

    fn try_native(&mut self) -> bool {
        let natives = self.native_ids();
        if self.config.dwellings == 0 {
            return false;
        }
        let Some(id) = self.rng.pick(&natives) else {
            self.spawn_native();
            return true;
        };
        match self.rng.next_u32(10) {
            0 => {
                self.units.destroy_native_unit(id);
                self.transitions += 1;
            }
            1 => {
                self.spawn_native();
            }
            _ => {
                let target = self.random_coord();
                self.units.move_native(id, target);
                self.transitions += 1;
            }
        }
        true
    }

    fn step(&mut self) -> bool {
        let roll = self.rng.next_u32(100);
        if roll >= 92 {
            return self.try_native();
        }
        if roll >= 85 {
            self.spawn_euro();
            return true;
        }
        let euros = self.euro_ids();
        let Some(id) = self.rng.pick(&euros) else {
            return false;
        };
        let applied = match roll {
            0..=24 => {
                let target = self.random_coord();
                self.units.to_map(id, target);
                true
            }
            25..=39 => self.try_to_cargo(id),
            40..=51 => self.try_to_harbor(id),
            52..=61 => self.try_to_colony(id),
            62..=67 => self.try_to_dwelling(id),
            68..=73 => {
                if self.units.ownership_of(id).implies_ordering() {
                    self.units.bump_ordering(id);
                    true
                } else {
                    false
                }
            }
            74..=79 => self.try_fortify(id),
            _ => {
                self.units.destroy_unit(id);
                true
            }
        };
        if applied {
            self.transitions += 1;
        }
        applied
    }
}

/// Populate a store and apply `config.steps` random legal transitions.
///
/// # Errors
///
/// Returns an error if the config is out of range.
pub fn run_simulation(seed: u64, config: &SimulationConfig) -> Result<SimulationResult, ConfigError> {
    config.validate()?;
    let mut sim = Simulation {
        config,
        rng: Rng::new(seed),
        units: UnitsState::new(),
        transitions: 0,
    };
    for _ in 0..config.euro_units {
        sim.spawn_euro();
    }
    for _ in 0..config.native_units {
        sim.spawn_native();
    }
    let mut skipped = 0;
    for _ in 0..config.steps {
        if !sim.step() {
            skipped += 1;
        }
    }
    units::assert_invariants(&sim.units);
    log::debug!(
        "simulation with seed {seed}: {} transitions, {skipped} skipped, {} live units",
        sim.transitions,
        sim.units.all().len()
    );
    Ok(SimulationResult {
        units: sim.units,
        transitions: sim.transitions,
        skipped,
    })
}
