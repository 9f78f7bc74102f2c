//! Rule removal

use achem_chemistry::{CapacityError, ReactionData, RuleSlots};

use super::Mutation;
use crate::world::{AtomId, SimRng, SquareMap};

/// Drops one random rule from the table. Never empties a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionMutation {
    weight: u32,
}

impl DeletionMutation {
    pub fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Default for DeletionMutation {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Mutation for DeletionMutation {
    fn mutate(
        &self,
        rules: &RuleSlots,
        rng: &mut dyn SimRng,
        _atom: AtomId,
        _map: &SquareMap,
    ) -> Result<RuleSlots, CapacityError> {
        let mut active: Vec<ReactionData> = rules.active().copied().collect();
        if active.len() < 2 {
            return Ok(rules.clone());
        }

        let removed = active.remove(rng.gen_index(active.len()));
        log::trace!("Deleting rule {removed}");
        RuleSlots::from_rules(active, rules.capacity())
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    fn is_valid_mutation(&self, rules: &RuleSlots) -> bool {
        rules.active_count() >= 2
    }
}
