//! Initial populations: RON scenario files and random soups

use achem_core::chemistry::{AtomType, MutableReactionData, ReactionRegistry, RuleSlots};
use achem_core::{Atom, AtomId, Location, SimConfig, SimRng, Simulator};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::AppConfig;

/// One atom to place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomSpec {
    pub kind: AtomType,
    #[serde(default)]
    pub state: i32,
    pub position: (i32, i32),
    /// Catalytic rules; present only for enzymes
    #[serde(default)]
    pub enzyme: Option<Vec<MutableReactionData>>,
}

/// Top-level scenario definition loaded from RON files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Scenario name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Overrides the configured grid size
    #[serde(default)]
    pub grid_size: Option<i32>,

    /// Start from the built-in chemistry before adding `reactions`
    #[serde(default)]
    pub default_reactions: bool,

    #[serde(default)]
    pub atoms: Vec<AtomSpec>,

    /// Bonds as pairs of indices into `atoms`
    #[serde(default)]
    pub bonds: Vec<(usize, usize)>,

    /// Global rules
    #[serde(default)]
    pub reactions: Vec<MutableReactionData>,
}

impl ScenarioDefinition {
    /// Load scenario from RON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;

        let scenario = ron::from_str(&content)
            .with_context(|| format!("Failed to parse RON scenario: {}", path.display()))?;

        Ok(scenario)
    }

    /// Build a simulator holding this scenario's atoms, bonds and rules.
    ///
    /// Atoms that cannot be placed and bonds that cannot be formed are
    /// skipped with a warning.
    pub fn build(&self, config: &SimConfig) -> Result<Simulator> {
        let config = SimConfig {
            grid_size: self.grid_size.unwrap_or(config.grid_size),
            ..config.clone()
        };
        config
            .validate()
            .with_context(|| format!("Scenario '{}' has invalid settings", self.name))?;

        let mut registry = if self.default_reactions {
            ReactionRegistry::with_default_reactions()
        } else {
            ReactionRegistry::new()
        };
        for rule in &self.reactions {
            registry.register(rule.build());
        }

        let mut sim = Simulator::from_config(&config, registry)
            .with_context(|| format!("Failed to create grid for scenario '{}'", self.name))?;

        let mut placed: Vec<Option<AtomId>> = Vec::with_capacity(self.atoms.len());
        for (index, entry) in self.atoms.iter().enumerate() {
            let atom = match &entry.enzyme {
                Some(rules) => {
                    let table = RuleSlots::from_rules(
                        rules.iter().map(|rule| rule.build()),
                        config.enzyme_capacity,
                    )
                    .with_context(|| format!("Enzyme #{index} in scenario '{}'", self.name))?;
                    Atom::enzyme(entry.kind, entry.state, table)
                }
                None => Atom::new(entry.kind, entry.state),
            };

            let location = Location::square(entry.position.0, entry.position.1);
            match sim.map_mut().add_atom(location, atom) {
                Ok(id) => placed.push(Some(id)),
                Err(err) => {
                    log::warn!("Skipping atom #{index}: {err}");
                    placed.push(None);
                }
            }
        }

        for &(i, j) in &self.bonds {
            let (Some(Some(a)), Some(Some(b))) = (placed.get(i), placed.get(j)) else {
                log::warn!("Skipping bond {i}-{j}: atom missing");
                continue;
            };
            if let Err(err) = sim.map_mut().bond(*a, *b) {
                log::warn!("Skipping bond {i}-{j}: {err}");
            }
        }

        log::info!(
            "Loaded scenario '{}': {} atoms, {} rules",
            self.name,
            sim.map().len(),
            sim.engine().registry().len()
        );
        Ok(sim)
    }
}

/// Fill a grid at random with the built-in chemistry.
///
/// A atoms start active (state 1) so chains can grow from them. Enzymes are
/// type E atoms carrying every catalysed built-in rule.
pub fn random_soup(config: &AppConfig, rng: &mut dyn SimRng) -> Result<Simulator> {
    let registry = ReactionRegistry::with_default_reactions();
    let mut catalysed: Vec<_> = registry
        .iter()
        .filter(|rule| rule.requires_enzyme())
        .copied()
        .collect();
    catalysed.sort_by_key(|rule| rule.to_string());
    let table = RuleSlots::from_rules(catalysed, config.simulation.enzyme_capacity)
        .context("Built-in catalysed rules exceed enzyme capacity")?;

    let mut sim = Simulator::from_config(&config.simulation, registry)
        .context("Failed to create grid for random soup")?;
    let size = config.simulation.grid_size;

    for y in 0..size {
        for x in 0..size {
            if !rng.check_probability(config.soup.density) {
                continue;
            }
            let atom = if rng.check_probability(config.soup.enzyme_fraction) {
                Atom::enzyme(AtomType::E, 0, table.clone())
            } else {
                let kind = AtomType::ALL[rng.gen_index(AtomType::ALL.len())];
                let state = if kind == AtomType::A { 1 } else { 0 };
                Atom::new(kind, state)
            };
            sim.map_mut()
                .add_atom(Location::square(x, y), atom)
                .context("Soup cell unexpectedly occupied")?;
        }
    }

    log::info!(
        "Generated random soup: {} atoms on a {size}x{size} grid",
        sim.map().len()
    );
    Ok(sim)
}
