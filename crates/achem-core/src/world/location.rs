//! Grid locations

use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell address on some grid topology.
///
/// Each topology is one variant; maps only accept the variant they were built
/// for. Locations are plain values: equality and hashing are by coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Location {
    /// Integer (x, y) cell on a square grid
    Square(IVec2),
}

impl Location {
    pub const fn square(x: i32, y: i32) -> Self {
        Location::Square(IVec2::new(x, y))
    }
}

impl From<IVec2> for Location {
    fn from(pos: IVec2) -> Self {
        Location::Square(pos)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Square(pos) => write!(f, "({}, {})", pos.x, pos.y),
        }
    }
}
