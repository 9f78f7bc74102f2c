//! Square grid map - occupancy, atom storage, geometry queries
//!
//! The map is the only place atom positions change. Atoms live in an
//! insertion-ordered arena keyed by [`AtomId`]; the occupancy table maps each
//! occupied cell to its atom. An empty cell is simply absent from the table.

use achem_chemistry::{ReactionData, RuleSlots};
use ahash::AHashMap;
use glam::IVec2;
use indexmap::IndexMap;
use smallvec::SmallVec;
use thiserror::Error;

use super::geometry::{self, chebyshev};
use super::{Atom, AtomId, AtomSnapshot, EnzymeIndex, GridSnapshot, Location, SnapshotCell};

/// Longest allowed bond, in grid steps
pub const MAX_BOND_LENGTH: i32 = 2;

/// Moore neighbourhood offsets: W, E, N, S, NW, SE, NE, SW
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid size must be positive, got {0}")]
    InvalidSize(i32),
}

/// Why an atom could not be placed. The map is unchanged in either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("cell {0} is already occupied")]
    Occupied(Location),
    #[error("cell {0} is outside the grid")]
    OffGrid(Location),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BondError {
    #[error("no atom with id {0}")]
    UnknownAtom(AtomId),
    #[error("atom {0} cannot bond to itself")]
    SelfBond(AtomId),
    #[error("atoms {0} and {1} are {2} cells apart, bonds reach at most 2")]
    TooLong(AtomId, AtomId, i32),
    #[error("bond between atoms {0} and {1} would cross a nearby bond")]
    Crosses(AtomId, AtomId),
}

/// A `size` x `size` grid of cells, each empty or holding one atom
pub struct SquareMap {
    size: i32,
    atoms: IndexMap<AtomId, Atom>,
    occupancy: AHashMap<Location, AtomId>,
    enzymes: EnzymeIndex,
    next_id: u32,
    snapshots: SnapshotCell,
}

impl SquareMap {
    pub fn new(size: i32) -> Result<Self, GridError> {
        if size <= 0 {
            return Err(GridError::InvalidSize(size));
        }

        Ok(Self {
            size,
            atoms: IndexMap::new(),
            occupancy: AHashMap::new(),
            enzymes: EnzymeIndex::new(),
            next_id: 0,
            snapshots: SnapshotCell::new(),
        })
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    fn square(location: Location) -> IVec2 {
        match location {
            Location::Square(pos) => pos,
        }
    }

    /// True iff both coordinates lie in `[0, size)`
    pub fn is_on_grid(&self, location: Location) -> bool {
        let pos = Self::square(location);
        (0..self.size).contains(&pos.x) && (0..self.size).contains(&pos.y)
    }

    /// The 8 surrounding cells that lie on the grid, in a fixed order
    pub fn adjacent_locations(&self, location: Location) -> SmallVec<[Location; 8]> {
        let pos = Self::square(location);
        NEIGHBOR_OFFSETS
            .iter()
            .map(|&(dx, dy)| Location::Square(pos + IVec2::new(dx, dy)))
            .filter(|&loc| self.is_on_grid(loc))
            .collect()
    }

    /// Chebyshev distance: one unit per horizontal, vertical or diagonal step
    pub fn distance(&self, a: Location, b: Location) -> i32 {
        chebyshev(Self::square(a), Self::square(b))
    }

    /// Atom occupying `location`, if any. Empty cells are not an error.
    pub fn atom_at(&self, location: Location) -> Option<AtomId> {
        self.occupancy.get(&location).copied()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(&id)
    }

    pub fn location_of(&self, id: AtomId) -> Option<Location> {
        self.atoms.get(&id).and_then(Atom::location)
    }

    /// All atoms in placement order
    pub fn atoms(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter().map(|(&id, atom)| (id, atom))
    }

    /// Handles of all atoms in placement order
    pub fn atom_ids(&self) -> Vec<AtomId> {
        self.atoms.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Atoms in the Moore neighbourhood of `location`
    pub fn adjacent_atoms(&self, location: Location) -> SmallVec<[AtomId; 8]> {
        self.adjacent_locations(location)
            .into_iter()
            .filter_map(|loc| self.atom_at(loc))
            .collect()
    }

    /// Place `atom` at `location`. Enzymes are registered for every rule in
    /// their table.
    pub fn add_atom(&mut self, location: Location, mut atom: Atom) -> Result<AtomId, PlacementError> {
        if !self.is_on_grid(location) {
            return Err(PlacementError::OffGrid(location));
        }
        if self.occupancy.contains_key(&location) {
            return Err(PlacementError::Occupied(location));
        }

        let id = AtomId::from_raw(self.next_id);
        self.next_id += 1;

        atom.set_location(location);
        if let Some(rules) = atom.rules() {
            self.enzymes.register_all(id, rules);
        }
        self.occupancy.insert(location, id);
        self.atoms.insert(id, atom);
        Ok(id)
    }

    /// Remove an atom, breaking all of its bonds and dropping it from the
    /// enzyme index
    pub fn remove_atom(&mut self, id: AtomId) -> Option<Atom> {
        let atom = self.atoms.shift_remove(&id)?;

        if let Some(location) = atom.location() {
            self.occupancy.remove(&location);
        }
        for partner in atom.bonds() {
            if let Some(partner) = self.atoms.get_mut(partner) {
                partner.remove_bond(id);
            }
        }
        if let Some(rules) = atom.rules() {
            self.enzymes.unregister_all(id, rules);
        }
        Some(atom)
    }

    /// Move an atom to `new_location`. Fails if the cell is off the grid or
    /// held by a different atom. The old cell is vacated and the new one
    /// filled in the same call.
    pub fn move_atom(&mut self, id: AtomId, new_location: Location) -> bool {
        if !self.is_on_grid(new_location) {
            return false;
        }
        match self.occupancy.get(&new_location) {
            Some(&occupant) if occupant != id => return false,
            Some(_) => return true,
            None => {}
        }

        let Some(atom) = self.atoms.get_mut(&id) else {
            return false;
        };
        if let Some(old) = atom.location() {
            self.occupancy.remove(&old);
        }
        atom.set_location(new_location);
        self.occupancy.insert(new_location, id);
        true
    }

    pub fn set_state(&mut self, id: AtomId, state: i32) -> bool {
        match self.atoms.get_mut(&id) {
            Some(atom) => {
                atom.state = state;
                true
            }
            None => false,
        }
    }

    pub fn are_bonded(&self, a: AtomId, b: AtomId) -> bool {
        self.atoms.get(&a).is_some_and(|atom| atom.is_bonded_to(b))
    }

    /// Bond two atoms (both sides record the bond)
    pub fn bond(&mut self, a: AtomId, b: AtomId) -> Result<(), BondError> {
        if a == b {
            return Err(BondError::SelfBond(a));
        }
        let loc_a = self.location_of(a).ok_or(BondError::UnknownAtom(a))?;
        let loc_b = self.location_of(b).ok_or(BondError::UnknownAtom(b))?;

        let length = self.distance(loc_a, loc_b);
        if length > MAX_BOND_LENGTH {
            return Err(BondError::TooLong(a, b, length));
        }
        if self.bond_would_cross(loc_a, loc_b, a, b) {
            return Err(BondError::Crosses(a, b));
        }

        if let Some(atom) = self.atoms.get_mut(&a) {
            atom.add_bond(b);
        }
        if let Some(atom) = self.atoms.get_mut(&b) {
            atom.add_bond(a);
        }
        Ok(())
    }

    /// Break the bond between two atoms. Returns false if they were not bonded.
    pub fn unbond(&mut self, a: AtomId, b: AtomId) -> bool {
        let removed = self
            .atoms
            .get_mut(&a)
            .is_some_and(|atom| atom.remove_bond(b));
        if let Some(atom) = self.atoms.get_mut(&b) {
            atom.remove_bond(a);
        }
        removed
    }

    /// Replace an atom's catalytic rule table, re-indexing it. Must be used
    /// for every rule table change so the enzyme index stays in sync.
    pub fn update_enzyme_index(&mut self, id: AtomId, new_rules: RuleSlots) -> bool {
        let Some(atom) = self.atoms.get_mut(&id) else {
            return false;
        };

        if let Some(old) = atom.replace_rules(new_rules) {
            self.enzymes.unregister_all(id, &old);
        }
        if let Some(rules) = atom.rules() {
            self.enzymes.register_all(id, rules);
        }
        log::debug!(
            "Re-indexed enzyme {id}: {} rules now catalysed",
            self.enzymes.len()
        );
        true
    }

    pub fn enzyme_index(&self) -> &EnzymeIndex {
        &self.enzymes
    }

    /// Whether some enzyme carrying `rule` sits within `range` of any of
    /// `locations`
    pub fn enzyme_within(&self, rule: &ReactionData, locations: &[Location], range: i32) -> bool {
        self.enzymes.enzymes_for(rule).any(|enzyme| {
            self.location_of(enzyme)
                .is_some_and(|at| locations.iter().any(|&loc| self.distance(at, loc) <= range))
        })
    }

    /// Whether segment (a1, a2) crosses segment (b1, b2)
    pub fn crossed(&self, a1: Location, a2: Location, b1: Location, b2: Location) -> bool {
        geometry::crossed(
            Self::square(a1),
            Self::square(a2),
            Self::square(b1),
            Self::square(b2),
        )
    }

    /// On-grid cells entering the range of an enzyme moving from `start` to
    /// `end`
    pub fn newly_in_range(&self, start: Location, end: Location, range: i32) -> Vec<Location> {
        geometry::newly_in_range(Self::square(start), Self::square(end), range)
            .into_iter()
            .map(Location::Square)
            .filter(|&loc| self.is_on_grid(loc))
            .collect()
    }

    /// Whether a bond drawn from `p` to `q` would cross an existing bond of
    /// any atom adjacent to either end. Bonds touching `a` or `b` (the atoms
    /// the new segment belongs to) are ignored. Only the local neighbourhood
    /// is checked.
    pub fn bond_would_cross(&self, p: Location, q: Location, a: AtomId, b: AtomId) -> bool {
        let mut nearby = self.adjacent_atoms(p);
        nearby.extend(self.adjacent_atoms(q));

        nearby
            .into_iter()
            .filter(|&n| n != a && n != b)
            .filter_map(|n| Some((self.location_of(n)?, self.atoms.get(&n)?)))
            .any(|(n_loc, n_atom)| {
                n_atom
                    .bonds()
                    .iter()
                    .filter(|&&m| m != a && m != b)
                    .filter_map(|&m| self.location_of(m))
                    .any(|m_loc| self.crossed(p, q, n_loc, m_loc))
            })
    }

    /// Build a snapshot of the current state
    pub fn snapshot(&self, tick: u64) -> GridSnapshot {
        let atoms = self
            .atoms
            .iter()
            .filter_map(|(&id, atom)| {
                Some(AtomSnapshot {
                    id,
                    location: atom.location()?,
                    kind: atom.kind,
                    color: atom.kind.color(),
                    state: atom.state,
                    enzyme: atom.is_enzyme(),
                    bonded_to: atom
                        .bonds()
                        .iter()
                        .filter_map(|&b| self.location_of(b))
                        .collect(),
                })
            })
            .collect();

        GridSnapshot {
            size: self.size,
            tick,
            atoms,
        }
    }

    /// Shared handle observers can read published snapshots from
    pub fn snapshots(&self) -> SnapshotCell {
        self.snapshots.clone()
    }

    /// Publish the current state to all snapshot readers
    pub fn publish(&self, tick: u64) {
        self.snapshots.publish(self.snapshot(tick));
    }
}
