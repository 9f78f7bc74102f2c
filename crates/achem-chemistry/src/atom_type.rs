//! Atom type tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// The chemical identity of an atom.
///
/// Types never change during a simulation; reactions only rewrite the
/// internal state and bonds of the atoms involved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AtomType {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl AtomType {
    /// Every concrete type, in declaration order
    pub const ALL: [AtomType; 6] = [
        AtomType::A,
        AtomType::B,
        AtomType::C,
        AtomType::D,
        AtomType::E,
        AtomType::F,
    ];

    /// Base color (RGBA) used by renderers
    pub fn color(self) -> [u8; 4] {
        match self {
            AtomType::A => [220, 60, 60, 255],
            AtomType::B => [60, 160, 220, 255],
            AtomType::C => [80, 190, 90, 255],
            AtomType::D => [230, 200, 60, 255],
            AtomType::E => [170, 90, 200, 255],
            AtomType::F => [240, 140, 40, 255],
        }
    }

    /// Single lowercase letter, as used in textual rule notation (`a1 + b2`)
    pub fn letter(self) -> char {
        match self {
            AtomType::A => 'a',
            AtomType::B => 'b',
            AtomType::C => 'c',
            AtomType::D => 'd',
            AtomType::E => 'e',
            AtomType::F => 'f',
        }
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
