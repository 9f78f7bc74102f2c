pub mod config;
pub mod mutation;
pub mod simulation;
pub mod world;

// Re-export the chemistry crate so callers only need one dependency
pub mod chemistry {
    pub use achem_chemistry::*;
}

pub use config::{ConfigError, SimConfig};
pub use mutation::{DeletionMutation, InsertionMutation, Mutation, MutationOperator, select_mutation};
pub use simulation::{MoveOutcome, NoopRenderer, ReactionEngine, Renderer, Simulator};
pub use world::{
    Atom, AtomId, GridSnapshot, Location, NoopStats, SimRng, SimStats, SnapshotCell, SquareMap,
    TickCounters,
};
