//! Atoms and their arena handles

use achem_chemistry::{AtomType, Reactant, RuleSlots};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::Location;

/// Stable handle to an atom stored in a [`super::SquareMap`]
///
/// Bonds refer to partners by handle, never by reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AtomId(u32);

impl AtomId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A particle on the grid
#[derive(Clone, Debug)]
pub struct Atom {
    /// Chemical type (fixed for the atom's lifetime)
    pub kind: AtomType,
    /// Internal state, rewritten by reactions
    pub state: i32,
    /// Set by the map when placed or moved
    location: Option<Location>,
    /// Bond partners (symmetric: each partner lists this atom too)
    bonds: SmallVec<[AtomId; 4]>,
    /// Catalytic rule table; present only on enzymes
    rules: Option<RuleSlots>,
}

impl Atom {
    pub fn new(kind: AtomType, state: i32) -> Self {
        Self {
            kind,
            state,
            location: None,
            bonds: SmallVec::new(),
            rules: None,
        }
    }

    /// An atom that catalyses every rule in `rules`
    pub fn enzyme(kind: AtomType, state: i32, rules: RuleSlots) -> Self {
        Self {
            rules: Some(rules),
            ..Self::new(kind, state)
        }
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn bonds(&self) -> &[AtomId] {
        &self.bonds
    }

    pub fn is_bonded_to(&self, other: AtomId) -> bool {
        self.bonds.contains(&other)
    }

    pub fn is_enzyme(&self) -> bool {
        self.rules.is_some()
    }

    pub fn rules(&self) -> Option<&RuleSlots> {
        self.rules.as_ref()
    }

    pub fn reactant(&self) -> Reactant {
        Reactant::new(self.kind, self.state)
    }

    pub(crate) fn set_location(&mut self, location: Location) {
        self.location = Some(location);
    }

    pub(crate) fn add_bond(&mut self, other: AtomId) {
        if !self.bonds.contains(&other) {
            self.bonds.push(other);
        }
    }

    pub(crate) fn remove_bond(&mut self, other: AtomId) -> bool {
        match self.bonds.iter().position(|&b| b == other) {
            Some(index) => {
                self.bonds.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn replace_rules(&mut self, rules: RuleSlots) -> Option<RuleSlots> {
        self.rules.replace(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_atom_is_unplaced() {
        let atom = Atom::new(AtomType::A, 3);
        assert!(atom.location().is_none());
        assert!(atom.bonds().is_empty());
        assert!(!atom.is_enzyme());
        assert_eq!(atom.reactant(), Reactant::new(AtomType::A, 3));
    }

    #[test]
    fn test_bonds_behave_as_set() {
        let mut atom = Atom::new(AtomType::B, 0);
        let other = AtomId::from_raw(7);

        atom.add_bond(other);
        atom.add_bond(other);
        assert_eq!(atom.bonds().len(), 1);
        assert!(atom.is_bonded_to(other));

        assert!(atom.remove_bond(other));
        assert!(!atom.remove_bond(other));
        assert!(atom.bonds().is_empty());
    }

    #[test]
    fn test_enzyme_carries_rules() {
        let atom = Atom::enzyme(AtomType::E, 0, RuleSlots::empty(4));
        assert!(atom.is_enzyme());
        assert_eq!(atom.rules().map(RuleSlots::capacity), Some(4));
    }
}
