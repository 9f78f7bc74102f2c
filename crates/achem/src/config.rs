//! Driver configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `achem.ron` file (if exists)
//! 3. Environment variables prefixed with `ACHEM_`
//!
//! Example environment variable: `ACHEM_SIMULATION__MOVEMENT_CHANCE=0.8`

use achem_core::SimConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Top-level driver configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimConfig,

    #[serde(default)]
    pub soup: SoupConfig,

    #[serde(default)]
    pub evolution: EvolutionConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Random initial population, used when no scenario file is given
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoupConfig {
    /// Fraction of cells that start occupied
    pub density: f32,
    /// Fraction of placed atoms that are enzymes
    pub enzyme_fraction: f32,
}

impl Default for SoupConfig {
    fn default() -> Self {
        Self {
            density: 0.3,
            enzyme_fraction: 0.05,
        }
    }
}

/// Outer evolutionary loop over enzyme rule tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub enabled: bool,
    /// Ticks between mutations (one random enzyme per mutation)
    pub mutation_interval: u64,
    /// Relative weight of rule splitting
    pub insertion_weight: u32,
    /// Relative weight of rule removal
    pub deletion_weight: u32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mutation_interval: 50,
            insertion_weight: 3,
            deletion_weight: 1,
        }
    }
}

/// Terminal output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print the grid every N ticks (0 disables printing)
    pub render_every: u64,
    /// Print atom states next to their type letters
    pub show_states: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            render_every: 100,
            show_states: false,
        }
    }
}

impl AppConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `achem.ron` file (if exists)
    /// 3. Environment variables prefixed with `ACHEM_` (highest priority)
    pub fn load() -> Result<Self> {
        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("simulation.grid_size", 40_i64)?
            .set_default("simulation.movement_chance", 0.5)?
            .set_default("simulation.enzyme_range", 3_i64)?
            .set_default("simulation.enzyme_capacity", 4_i64)?
            .set_default("simulation.seed", 42_i64)?
            .set_default("soup.density", 0.3)?
            .set_default("soup.enzyme_fraction", 0.05)?
            .set_default("evolution.enabled", true)?
            .set_default("evolution.mutation_interval", 50_i64)?
            .set_default("evolution.insertion_weight", 3_i64)?
            .set_default("evolution.deletion_weight", 1_i64)?
            .set_default("output.render_every", 100_i64)?
            .set_default("output.show_states", false)?
            // Layer 2: Config file (optional, won't error if missing)
            .add_source(
                File::with_name("achem")
                    .format(config::FileFormat::Ron)
                    .required(false),
            )
            // Layer 3: Environment variables (ACHEM_SIMULATION__SEED, etc.)
            .add_source(Environment::with_prefix("ACHEM").separator("__"));

        let config = builder.build().context("Failed to build configuration")?;

        let app: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        app.simulation
            .validate()
            .context("Invalid simulation configuration")?;
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.simulation.grid_size, 40);
        assert_eq!(config.simulation.enzyme_range, 3);
        assert_eq!(config.evolution.mutation_interval, 50);
        assert_eq!(config.output.render_every, 100);
        assert!(config.evolution.enabled);
    }

    #[test]
    fn test_load_config_with_defaults() {
        // Should load defaults when no config file exists
        let config = AppConfig::load().expect("Failed to load config");
        assert_eq!(config.simulation.enzyme_capacity, 4);
        assert_eq!(config.soup.density, 0.3);
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let config: AppConfig = ron::from_str("(simulation: (grid_size: 12))").unwrap();
        assert_eq!(config.simulation.grid_size, 12);
        assert_eq!(config.simulation.movement_chance, 0.5);
        assert_eq!(config.evolution.insertion_weight, 3);
    }
}
