//! Enzyme index: which enzymes currently catalyse which rules

use achem_chemistry::{ReactionData, RuleSlots, normalized_states};
use ahash::AHashMap;
use indexmap::{IndexMap, IndexSet};

use super::AtomId;

/// Multimap from rule to the enzymes carrying it.
///
/// Only rules with at least one registered enzyme are present. Iteration
/// follows first registration, so candidate order is reproducible.
#[derive(Debug, Default, Clone)]
pub struct EnzymeIndex {
    catalysts: IndexMap<ReactionData, IndexSet<AtomId>>,
    /// Indexed rules grouped by normalized pre-state pair
    by_states: AHashMap<(i32, i32), Vec<ReactionData>>,
}

impl EnzymeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: ReactionData, enzyme: AtomId) {
        let enzymes = self.catalysts.entry(rule).or_default();
        if enzymes.is_empty() {
            self.by_states.entry(rule.state_key()).or_default().push(rule);
        }
        enzymes.insert(enzyme);
    }

    pub fn unregister(&mut self, rule: &ReactionData, enzyme: AtomId) {
        let Some(enzymes) = self.catalysts.get_mut(rule) else {
            return;
        };
        enzymes.shift_remove(&enzyme);
        if !enzymes.is_empty() {
            return;
        }

        self.catalysts.shift_remove(rule);
        let key = rule.state_key();
        if let Some(bucket) = self.by_states.get_mut(&key) {
            bucket.retain(|r| r != rule);
            if bucket.is_empty() {
                self.by_states.remove(&key);
            }
        }
    }

    pub fn register_all(&mut self, enzyme: AtomId, rules: &RuleSlots) {
        for rule in rules.active() {
            self.register(*rule, enzyme);
        }
    }

    pub fn unregister_all(&mut self, enzyme: AtomId, rules: &RuleSlots) {
        for rule in rules.active() {
            self.unregister(rule, enzyme);
        }
    }

    /// Enzymes currently carrying `rule`
    pub fn enzymes_for(&self, rule: &ReactionData) -> impl Iterator<Item = AtomId> + '_ {
        self.catalysts
            .get(rule)
            .into_iter()
            .flat_map(|enzymes| enzymes.iter().copied())
    }

    /// Indexed rules whose pre-states are `{state_a, state_b}` in either order
    pub fn candidates(&self, state_a: i32, state_b: i32) -> &[ReactionData] {
        self.by_states
            .get(&normalized_states(state_a, state_b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct rules with at least one enzyme
    pub fn len(&self) -> usize {
        self.catalysts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalysts.is_empty()
    }
}
