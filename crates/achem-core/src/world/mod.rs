//! Grid world - locations, atoms, occupancy, enzyme tracking

mod atom;
mod enzyme_index;
mod geometry;
mod location;
pub mod rng_trait;
mod snapshot;
mod square_map;
pub mod stats;

pub use atom::{Atom, AtomId};
pub use enzyme_index::EnzymeIndex;
pub use geometry::{Slope, crossed, newly_in_range};
pub use location::Location;
pub use rng_trait::SimRng;
pub use snapshot::{AtomSnapshot, GridSnapshot, SnapshotCell};
pub use square_map::{BondError, GridError, MAX_BOND_LENGTH, PlacementError, SquareMap};
pub use stats::{NoopStats, SimStats, TickCounters};
