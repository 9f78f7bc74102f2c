//! Outer evolutionary loop: periodically mutates one enzyme's rule table

use achem_core::{
    AtomId, DeletionMutation, InsertionMutation, MutationOperator, SimRng, SimStats, Simulator,
};
use anyhow::{Context, Result};

use crate::config::EvolutionConfig;

pub struct Evolution {
    operators: Vec<MutationOperator>,
    interval: u64,
    enabled: bool,
}

impl Evolution {
    pub fn from_config(config: &EvolutionConfig) -> Self {
        Self {
            operators: vec![
                InsertionMutation::new(config.insertion_weight).into(),
                DeletionMutation::new(config.deletion_weight).into(),
            ],
            interval: config.mutation_interval,
            enabled: config.enabled && config.mutation_interval > 0,
        }
    }

    /// Mutate a random enzyme if the simulator has just completed a mutation
    /// interval. Returns the mutated enzyme, if any.
    pub fn step(
        &self,
        sim: &mut Simulator,
        rng: &mut dyn SimRng,
        stats: &mut dyn SimStats,
    ) -> Result<Option<AtomId>> {
        if !self.enabled || sim.ticks() == 0 || sim.ticks() % self.interval != 0 {
            return Ok(None);
        }

        let enzymes: Vec<AtomId> = sim
            .map()
            .atoms()
            .filter(|(_, atom)| atom.is_enzyme())
            .map(|(id, _)| id)
            .collect();
        if enzymes.is_empty() {
            return Ok(None);
        }

        let enzyme = enzymes[rng.gen_index(enzymes.len())];
        let mutated = sim
            .mutate_enzyme(enzyme, &self.operators, rng, stats)
            .with_context(|| format!("Mutation of enzyme {enzyme} overflowed its rule table"))?;

        Ok(mutated.then_some(enzyme))
    }
}
