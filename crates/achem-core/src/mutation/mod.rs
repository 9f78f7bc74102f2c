//! Rule table mutation operators
//!
//! Operators rewrite an enzyme's fixed-capacity rule table. They are not part
//! of the tick: an outer evolutionary loop picks one by weight among those
//! valid for the table and applies it via [`crate::Simulator::mutate_enzyme`].

mod deletion;
mod insertion;

pub use deletion::DeletionMutation;
pub use insertion::InsertionMutation;

use achem_chemistry::{CapacityError, RuleSlots};

use crate::world::{AtomId, SimRng, SquareMap};

/// A strategy that turns one rule table into another
pub trait Mutation {
    /// Produce the mutated table. Fails rather than truncating if the result
    /// would exceed the table's capacity.
    fn mutate(
        &self,
        rules: &RuleSlots,
        rng: &mut dyn SimRng,
        atom: AtomId,
        map: &SquareMap,
    ) -> Result<RuleSlots, CapacityError>;

    /// Relative selection weight among competing operators
    fn weight(&self) -> u32;

    /// Whether this operator applies to `rules`
    fn is_valid_mutation(&self, rules: &RuleSlots) -> bool;
}

/// The closed set of available operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOperator {
    Insertion(InsertionMutation),
    Deletion(DeletionMutation),
}

impl MutationOperator {
    pub fn name(&self) -> &'static str {
        match self {
            MutationOperator::Insertion(_) => "Insertion",
            MutationOperator::Deletion(_) => "Deletion",
        }
    }
}

impl Mutation for MutationOperator {
    fn mutate(
        &self,
        rules: &RuleSlots,
        rng: &mut dyn SimRng,
        atom: AtomId,
        map: &SquareMap,
    ) -> Result<RuleSlots, CapacityError> {
        match self {
            MutationOperator::Insertion(op) => op.mutate(rules, rng, atom, map),
            MutationOperator::Deletion(op) => op.mutate(rules, rng, atom, map),
        }
    }

    fn weight(&self) -> u32 {
        match self {
            MutationOperator::Insertion(op) => op.weight(),
            MutationOperator::Deletion(op) => op.weight(),
        }
    }

    fn is_valid_mutation(&self, rules: &RuleSlots) -> bool {
        match self {
            MutationOperator::Insertion(op) => op.is_valid_mutation(rules),
            MutationOperator::Deletion(op) => op.is_valid_mutation(rules),
        }
    }
}

impl From<InsertionMutation> for MutationOperator {
    fn from(op: InsertionMutation) -> Self {
        MutationOperator::Insertion(op)
    }
}

impl From<DeletionMutation> for MutationOperator {
    fn from(op: DeletionMutation) -> Self {
        MutationOperator::Deletion(op)
    }
}

/// Pick an operator valid for `rules`, with probability proportional to its
/// weight. Operators with zero weight are never chosen.
pub fn select_mutation<'a>(
    operators: &'a [MutationOperator],
    rules: &RuleSlots,
    rng: &mut dyn SimRng,
) -> Option<&'a MutationOperator> {
    let valid: Vec<&MutationOperator> = operators
        .iter()
        .filter(|op| op.weight() > 0 && op.is_valid_mutation(rules))
        .collect();
    let weights: Vec<u32> = valid.iter().map(|op| op.weight()).collect();

    rng.gen_weighted(&weights).map(|index| valid[index])
}
