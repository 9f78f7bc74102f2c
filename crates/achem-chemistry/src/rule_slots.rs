//! Fixed-capacity rule table carried by enzymes

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ReactionData;

/// A rule table would hold more rules than its capacity allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rule table holds {active} rules but capacity is {capacity}")]
pub struct CapacityError {
    pub active: usize,
    pub capacity: usize,
}

/// Enzyme rule table: exactly `capacity` slots, each empty or holding a rule
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSlots {
    slots: Vec<Option<ReactionData>>,
}

impl RuleSlots {
    /// Table with every slot empty
    pub fn empty(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Pack `rules` into the leading slots of a table of `capacity` slots
    pub fn from_rules(
        rules: impl IntoIterator<Item = ReactionData>,
        capacity: usize,
    ) -> Result<Self, CapacityError> {
        let mut slots: Vec<Option<ReactionData>> = rules.into_iter().map(Some).collect();
        if slots.len() > capacity {
            return Err(CapacityError {
                active: slots.len(),
                capacity,
            });
        }
        slots.resize(capacity, None);
        Ok(Self { slots })
    }

    /// Wrap raw slots; the slot count becomes the capacity
    pub fn from_slots(slots: Vec<Option<ReactionData>>) -> Self {
        Self { slots }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<ReactionData>] {
        &self.slots
    }

    /// Non-empty entries, in slot order
    pub fn active(&self) -> impl Iterator<Item = &ReactionData> {
        self.slots.iter().flatten()
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn has_free_slot(&self) -> bool {
        self.slots.iter().any(Option::is_none)
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    pub fn contains(&self, rule: &ReactionData) -> bool {
        self.active().any(|r| r == rule)
    }
}
