//! Rule splitting: one rule becomes a two-step catalysed pathway

use achem_chemistry::{CapacityError, MutableReactionData, ReactionData, RuleSlots, TypePattern};

use super::Mutation;
use crate::world::{AtomId, SimRng, SquareMap};

/// Standard deviation of the intermediate state offset
const OFFSET_SPREAD: f64 = 5.0;

/// Splits a random rule through a new intermediate state.
///
/// Given a rule `t1 p1 + t2 p2 -> t1 q1 + t2 q2` and a catalyst state `c`
/// taken from another random rule's post-states, one side (say the first) is
/// diverted to `q1 + offset`, and a second rule brings it from there back to
/// `q1` while reacting with any partner in state `c`:
///
/// ```text
/// t1 p1 + t2 p2 -> t1 (q1 + offset) + t2 q2
/// t1 (q1 + offset) + Y c -> t1 q1 + Y c
/// ```
///
/// The offset is a nonzero Gaussian draw. The table grows by exactly one
/// rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionMutation {
    weight: u32,
}

impl InsertionMutation {
    pub fn new(weight: u32) -> Self {
        Self { weight }
    }
}

impl Default for InsertionMutation {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Mutation for InsertionMutation {
    fn mutate(
        &self,
        rules: &RuleSlots,
        rng: &mut dyn SimRng,
        _atom: AtomId,
        _map: &SquareMap,
    ) -> Result<RuleSlots, CapacityError> {
        let mut active: Vec<ReactionData> = rules.active().copied().collect();
        let capacity = rules.capacity();
        if active.is_empty() {
            return Ok(rules.clone());
        }
        if active.len() >= capacity {
            return Err(CapacityError {
                active: active.len() + 1,
                capacity,
            });
        }

        let split_index = rng.gen_index(active.len());
        let to_split = active[split_index];
        let catalyst = active[rng.gen_index(active.len())];
        let catalyst_state = if rng.coin_flip() {
            catalyst.post_state1()
        } else {
            catalyst.post_state2()
        };
        // A zero offset would make the second step a no-op rule
        let offset = loop {
            let offset = (rng.gen_gaussian() * OFFSET_SPREAD) as i32;
            if offset != 0 {
                break offset;
            }
        };
        let modify_second = rng.coin_flip();

        let mut part1 = MutableReactionData::from(to_split);
        part1.requires_enzyme = true;
        let (side_type, side_post) = if modify_second {
            part1.post_state2 += offset;
            (to_split.type2(), to_split.post_state2())
        } else {
            part1.post_state1 += offset;
            (to_split.type1(), to_split.post_state1())
        };

        // Partner variable must differ from the side's own pattern
        let partner = if side_type == TypePattern::Y {
            TypePattern::X
        } else {
            TypePattern::Y
        };
        let part2 = MutableReactionData::new(side_type, side_post + offset, partner, catalyst_state)
            .to_states(side_post, catalyst_state)
            .bonds(rng.coin_flip(), rng.coin_flip())
            .catalysed(true)
            .build();

        active.remove(split_index);
        active.push(part1.build());
        active.push(part2);
        RuleSlots::from_rules(active, capacity)
    }

    fn weight(&self) -> u32 {
        self.weight
    }

    /// Needs a rule to split and a free slot for the extra rule
    fn is_valid_mutation(&self, rules: &RuleSlots) -> bool {
        !rules.is_empty() && rules.has_free_slot()
    }
}
