//! Engine configuration constants

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid_size must be positive, got {0}")]
    GridSize(i32),
    #[error("movement_chance must lie in [0, 1], got {0}")]
    MovementChance(f32),
    #[error("enzyme_range must be at least 1, got {0}")]
    EnzymeRange(i32),
    #[error("enzyme_capacity must be at least 1, got {0}")]
    EnzymeCapacity(usize),
}

/// Simulation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Side length of the square grid
    pub grid_size: i32,
    /// Probability that an atom attempts a move in a given tick
    pub movement_chance: f32,
    /// Chebyshev radius of catalytic influence
    pub enzyme_range: i32,
    /// Rule slots per enzyme
    pub enzyme_capacity: usize,
    /// Seed for the simulation RNG
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 40,
            movement_chance: 0.5,
            enzyme_range: 3,
            enzyme_capacity: 4,
            seed: 42,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size <= 0 {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if !(0.0..=1.0).contains(&self.movement_chance) {
            return Err(ConfigError::MovementChance(self.movement_chance));
        }
        if self.enzyme_range < 1 {
            return Err(ConfigError::EnzymeRange(self.enzyme_range));
        }
        if self.enzyme_capacity < 1 {
            return Err(ConfigError::EnzymeCapacity(self.enzyme_capacity));
        }
        Ok(())
    }
}
