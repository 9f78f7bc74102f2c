//! Tick scheduling and reaction processing

mod reaction_engine;
mod renderer;
mod simulator;

pub use reaction_engine::ReactionEngine;
pub use renderer::{NoopRenderer, Renderer};
pub use simulator::{MoveOutcome, Simulator};
