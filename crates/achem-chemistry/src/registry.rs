//! Global reaction rule table
//!
//! Rules that apply everywhere on the grid, as opposed to the per-enzyme rule
//! tables. Lookup is keyed on the normalized pre-state pair, since states are
//! always concrete while types may be variables.

use std::collections::HashMap;

use crate::reaction::normalized_states;
use crate::{
    AtomType, Macroreaction, MutableReactionData, Orientation, ReactionData, Reactant, TypePattern,
};

/// Registry of reaction rules with O(1) lookup via HashMap
/// Key: (state_a, state_b) where state_a <= state_b (normalized order)
/// Value: rules for that state pair, in registration order
#[derive(Clone, Debug, Default)]
pub struct ReactionRegistry {
    reactions: HashMap<(i32, i32), Vec<ReactionData>>,
    count: usize,
}

impl ReactionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with a small chain-growing chemistry
    pub fn with_default_reactions() -> Self {
        let mut registry = Self::new();
        registry.register_default_reactions();
        registry
    }

    fn register_default_reactions(&mut self) {
        // Seed activates a free monomer: a1 + b0 -> a2b1
        self.register(
            MutableReactionData::new(AtomType::A, 1, AtomType::B, 0)
                .to_states(2, 1)
                .bonds(false, true)
                .build(),
        );

        // Chain elongation, active end moves to the new monomer: b1 + b0 -> b2b1
        self.register(
            MutableReactionData::new(AtomType::B, 1, AtomType::B, 0)
                .to_states(2, 1)
                .bonds(false, true)
                .build(),
        );

        // Capping: b1 + f0 -> b2f2
        self.register(
            MutableReactionData::new(AtomType::B, 1, AtomType::F, 0)
                .to_states(2, 2)
                .bonds(false, true)
                .build(),
        );

        // Enzyme-only cleavage of a finished link: x2y2 -> x0 + y0
        self.register(
            MutableReactionData::new(TypePattern::X, 2, TypePattern::Y, 2)
                .to_states(0, 0)
                .bonds(true, false)
                .catalysed(true)
                .build(),
        );
    }

    /// Register a rule. Returns false if an identical rule is already present.
    pub fn register(&mut self, reaction: ReactionData) -> bool {
        let bucket = self.reactions.entry(reaction.state_key()).or_default();
        if bucket.contains(&reaction) {
            log::debug!("Skipping duplicate reaction {reaction}");
            return false;
        }

        bucket.push(reaction);
        self.count += 1;
        true
    }

    /// Register every elementary rule of a (possibly composite) macroreaction.
    /// Returns how many new rules were added.
    pub fn register_macroreaction(&mut self, macroreaction: &dyn Macroreaction) -> usize {
        macroreaction
            .elementary_reactions()
            .into_iter()
            .filter(|rule| self.register(*rule))
            .count()
    }

    /// All rules whose pre-states are `{state_a, state_b}` in either order
    pub fn candidates(&self, state_a: i32, state_b: i32) -> &[ReactionData] {
        self.reactions
            .get(&normalized_states(state_a, state_b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rules that match the two reactants and their bond status, with the
    /// orientation they matched in. Enzyme requirements are not checked here.
    pub fn matching(
        &self,
        first: Reactant,
        second: Reactant,
        bonded: bool,
    ) -> impl Iterator<Item = (ReactionData, Orientation)> + '_ {
        self.candidates(first.state, second.state)
            .iter()
            .filter_map(move |rule| rule.orient(first, second, bonded).map(|o| (*rule, o)))
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReactionData> {
        self.reactions.values().flatten()
    }
}
