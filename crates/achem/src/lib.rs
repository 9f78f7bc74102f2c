//! achem driver: configuration, initial populations, terminal output and the
//! evolutionary loop around the core simulator

pub mod config;
pub mod evolution;
pub mod render;
pub mod scenario;

pub use config::AppConfig;
pub use evolution::Evolution;
pub use render::AsciiRenderer;
pub use scenario::{ScenarioDefinition, random_soup};
