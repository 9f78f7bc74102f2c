//! Tick scheduler
//!
//! One tick runs two phases:
//! 1. Reaction replay: the dirty-location queue from the previous tick is
//!    swapped out and every location in it is reacted around. Reactions that
//!    fire here enqueue into the fresh queue, so they are picked up next tick.
//! 2. Movement: each atom, with probability `movement_chance`, tries to step
//!    to a random neighbouring cell. Moves that would overstretch or cross a
//!    bond are dropped. A successful move reacts around the new cell at once.
//!
//! At the end of the tick a snapshot is published and the renderer notified.

use achem_chemistry::{CapacityError, ReactionRegistry};

use crate::config::SimConfig;
use crate::mutation::{Mutation, MutationOperator, select_mutation};
use crate::simulation::{NoopRenderer, ReactionEngine, Renderer};
use crate::world::{
    AtomId, GridError, Location, MAX_BOND_LENGTH, SimRng, SimStats, SnapshotCell, SquareMap,
};

/// Result of a single move attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Destination off the grid, occupied, or the atom is unknown
    Blocked,
    /// Some bond would end up longer than the maximum bond length
    StretchesBond,
    /// Some bond would cross a bond in the neighbourhood
    CrossesBond,
}

pub struct Simulator {
    map: SquareMap,
    engine: ReactionEngine,
    movement_chance: f32,
    updated_locations: Vec<Location>,
    renderer: Box<dyn Renderer>,
    ticks: u64,
}

impl Simulator {
    /// Drive an existing map with the given rule registry
    pub fn new(map: SquareMap, registry: ReactionRegistry, config: &SimConfig) -> Self {
        Self {
            map,
            engine: ReactionEngine::new(registry, config.enzyme_range),
            movement_chance: config.movement_chance,
            updated_locations: Vec::new(),
            renderer: Box::new(NoopRenderer),
            ticks: 0,
        }
    }

    /// Build an empty map sized by `config`
    pub fn from_config(config: &SimConfig, registry: ReactionRegistry) -> Result<Self, GridError> {
        let map = SquareMap::new(config.grid_size)?;
        Ok(Self::new(map, registry, config))
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn map(&self) -> &SquareMap {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut SquareMap {
        &mut self.map
    }

    pub fn engine(&self) -> &ReactionEngine {
        &self.engine
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Handle for observers reading the published snapshots
    pub fn snapshots(&self) -> SnapshotCell {
        self.map.snapshots()
    }

    /// Schedule `location` for reaction replay on the next tick
    pub fn mark_dirty(&mut self, location: Location) {
        self.updated_locations.push(location);
    }

    /// Locations queued for the next reaction replay, duplicates included
    pub fn pending_locations(&self) -> &[Location] {
        &self.updated_locations
    }

    /// Advance the simulation by one tick
    pub fn tick<R: SimRng + ?Sized>(&mut self, stats: &mut dyn SimStats, rng: &mut R) {
        let replay = std::mem::take(&mut self.updated_locations);
        let replayed = replay.len();
        for location in replay {
            self.engine
                .react_around(&mut self.map, location, &mut self.updated_locations, stats);
        }

        for id in self.map.atom_ids() {
            if !rng.check_probability(self.movement_chance) {
                continue;
            }
            let Some(current) = self.map.location_of(id) else {
                continue;
            };
            let neighbors = self.map.adjacent_locations(current);
            if neighbors.is_empty() {
                continue;
            }
            let target = neighbors[rng.gen_index(neighbors.len())];

            match self.attempt_move(id, target, stats) {
                MoveOutcome::Moved => stats.record_atom_moved(),
                outcome => {
                    log::trace!("{id} stayed at {current}: {outcome:?} towards {target}");
                    stats.record_move_rejected();
                }
            }
        }

        self.ticks += 1;
        log::debug!(
            "Tick {} done: replayed {replayed} locations, {} queued for next tick",
            self.ticks,
            self.updated_locations.len()
        );

        let snapshot = self.map.snapshot(self.ticks);
        self.renderer.redraw(&snapshot);
        self.map.snapshots().publish(snapshot);
    }

    /// Try to move atom `id` to `destination`, enforcing bond constraints.
    /// On success the new neighbourhood is reacted around immediately.
    pub fn attempt_move(
        &mut self,
        id: AtomId,
        destination: Location,
        stats: &mut dyn SimStats,
    ) -> MoveOutcome {
        let Some(atom) = self.map.atom(id) else {
            return MoveOutcome::Blocked;
        };
        let Some(current) = atom.location() else {
            return MoveOutcome::Blocked;
        };
        let is_enzyme = atom.is_enzyme();

        if !self.map.is_on_grid(destination)
            || self.map.atom_at(destination).is_some_and(|other| other != id)
        {
            return MoveOutcome::Blocked;
        }
        if self.will_stretch_bonds(id, destination) {
            return MoveOutcome::StretchesBond;
        }
        if self.will_cross_bonds(id, destination) {
            return MoveOutcome::CrossesBond;
        }

        if is_enzyme {
            let entering =
                self.map
                    .newly_in_range(current, destination, self.engine.enzyme_range());
            self.updated_locations.extend(entering);
        }

        if !self.map.move_atom(id, destination) {
            return MoveOutcome::Blocked;
        }
        self.engine
            .react_around(&mut self.map, destination, &mut self.updated_locations, stats);
        MoveOutcome::Moved
    }

    fn will_stretch_bonds(&self, id: AtomId, destination: Location) -> bool {
        let Some(atom) = self.map.atom(id) else {
            return false;
        };
        atom.bonds().iter().any(|&partner| {
            self.map
                .location_of(partner)
                .is_some_and(|at| self.map.distance(at, destination) > MAX_BOND_LENGTH)
        })
    }

    fn will_cross_bonds(&self, id: AtomId, destination: Location) -> bool {
        let Some(atom) = self.map.atom(id) else {
            return false;
        };
        atom.bonds().iter().any(|&partner| {
            self.map.location_of(partner).is_some_and(|at| {
                self.map.bond_would_cross(destination, at, id, partner)
            })
        })
    }

    /// Apply one weighted-random valid operator to enzyme `id` and re-index it.
    ///
    /// Returns false if `id` is not an enzyme or no operator applies to its
    /// rule table.
    pub fn mutate_enzyme(
        &mut self,
        id: AtomId,
        operators: &[MutationOperator],
        rng: &mut dyn SimRng,
        stats: &mut dyn SimStats,
    ) -> Result<bool, CapacityError> {
        let Some(rules) = self.map.atom(id).and_then(|atom| atom.rules()).cloned() else {
            return Ok(false);
        };
        let Some(operator) = select_mutation(operators, &rules, rng) else {
            log::warn!("No mutation applies to enzyme {id} with {} rules", rules.active_count());
            return Ok(false);
        };

        let mutated = operator.mutate(&rules, rng, id, &self.map)?;
        log::debug!(
            "{} mutation on enzyme {id}: {} -> {} rules",
            operator.name(),
            rules.active_count(),
            mutated.active_count()
        );
        self.map.update_enzyme_index(id, mutated);
        stats.record_mutation();
        Ok(true)
    }
}
