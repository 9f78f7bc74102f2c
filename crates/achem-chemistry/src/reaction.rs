//! Reaction rules and the rule matching language
//!
//! A rule is written `x1 + y2 -> x3y4`: two reactant slots, each with a type
//! pattern and an exact pre-state, and the post-states the atoms take when the
//! rule fires. `+` between the reactants means "not bonded", juxtaposition
//! means "bonded".

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AtomType;

/// Type constraint for one reactant slot of a rule
///
/// `X` and `Y` are variables: each matches any type, but a variable used on
/// both sides of a rule requires both atoms to share a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypePattern {
    Is(AtomType),
    X,
    Y,
}

impl TypePattern {
    pub fn is_variable(self) -> bool {
        matches!(self, TypePattern::X | TypePattern::Y)
    }

    /// Whether this slot, taken alone, admits `kind`
    pub fn admits(self, kind: AtomType) -> bool {
        match self {
            TypePattern::Is(expected) => expected == kind,
            TypePattern::X | TypePattern::Y => true,
        }
    }
}

impl From<AtomType> for TypePattern {
    fn from(kind: AtomType) -> Self {
        TypePattern::Is(kind)
    }
}

impl fmt::Display for TypePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypePattern::Is(kind) => write!(f, "{kind}"),
            TypePattern::X => write!(f, "x"),
            TypePattern::Y => write!(f, "y"),
        }
    }
}

/// The observable part of an atom that rules match against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reactant {
    pub kind: AtomType,
    pub state: i32,
}

impl Reactant {
    pub fn new(kind: AtomType, state: i32) -> Self {
        Self { kind, state }
    }
}

/// Which rule slot each of the two presented atoms landed in
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// First atom matched slot 1, second matched slot 2
    Forward,
    /// First atom matched slot 2, second matched slot 1
    Swapped,
}

/// Immutable reaction rule
///
/// Use [`MutableReactionData`] to build or derive new rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReactionData {
    type1: TypePattern,
    type2: TypePattern,
    pre_state1: i32,
    pre_state2: i32,
    post_state1: i32,
    post_state2: i32,
    bonded_before: bool,
    bonded_after: bool,
    /// Only fires when an enzyme carrying this exact rule is in range
    requires_enzyme: bool,
}

impl ReactionData {
    pub fn type1(&self) -> TypePattern {
        self.type1
    }

    pub fn type2(&self) -> TypePattern {
        self.type2
    }

    pub fn pre_state1(&self) -> i32 {
        self.pre_state1
    }

    pub fn pre_state2(&self) -> i32 {
        self.pre_state2
    }

    pub fn post_state1(&self) -> i32 {
        self.post_state1
    }

    pub fn post_state2(&self) -> i32 {
        self.post_state2
    }

    pub fn bonded_before(&self) -> bool {
        self.bonded_before
    }

    pub fn bonded_after(&self) -> bool {
        self.bonded_after
    }

    pub fn requires_enzyme(&self) -> bool {
        self.requires_enzyme
    }

    /// Pre-state pair with the smaller state first, used as a lookup key
    pub fn state_key(&self) -> (i32, i32) {
        normalized_states(self.pre_state1, self.pre_state2)
    }

    /// Try to match two atoms against this rule, in either order.
    ///
    /// `bonded` is whether the two atoms are currently bonded to each other;
    /// it must equal the rule's `bonded_before` flag. Forward orientation is
    /// tried first.
    pub fn orient(&self, first: Reactant, second: Reactant, bonded: bool) -> Option<Orientation> {
        if bonded != self.bonded_before {
            return None;
        }

        if self.matches_slots(first, second) {
            Some(Orientation::Forward)
        } else if self.matches_slots(second, first) {
            Some(Orientation::Swapped)
        } else {
            None
        }
    }

    /// Post-states for (first, second) given how they matched
    pub fn post_states(&self, orientation: Orientation) -> (i32, i32) {
        match orientation {
            Orientation::Forward => (self.post_state1, self.post_state2),
            Orientation::Swapped => (self.post_state2, self.post_state1),
        }
    }

    fn matches_slots(&self, slot1: Reactant, slot2: Reactant) -> bool {
        if slot1.state != self.pre_state1 || slot2.state != self.pre_state2 {
            return false;
        }
        if !self.type1.admits(slot1.kind) || !self.type2.admits(slot2.kind) {
            return false;
        }
        // Same variable on both sides binds both atoms to one type
        if self.type1.is_variable() && self.type1 == self.type2 {
            return slot1.kind == slot2.kind;
        }
        true
    }
}

impl fmt::Display for ReactionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |bonded: bool| if bonded { "" } else { " + " };
        write!(
            f,
            "{}{}{}{}{} -> {}{}{}{}{}",
            self.type1,
            self.pre_state1,
            join(self.bonded_before),
            self.type2,
            self.pre_state2,
            self.type1,
            self.post_state1,
            join(self.bonded_after),
            self.type2,
            self.post_state2,
        )?;
        if self.requires_enzyme {
            write!(f, " [enzyme]")?;
        }
        Ok(())
    }
}

/// Builder form of [`ReactionData`], used when deriving new rules
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutableReactionData {
    pub type1: TypePattern,
    pub type2: TypePattern,
    pub pre_state1: i32,
    pub pre_state2: i32,
    pub post_state1: i32,
    pub post_state2: i32,
    pub bonded_before: bool,
    pub bonded_after: bool,
    pub requires_enzyme: bool,
}

impl MutableReactionData {
    /// Rule `type1 pre1 + type2 pre2 -> type1 post1 + type2 post2` with no
    /// bonding change and no enzyme requirement
    pub fn new(
        type1: impl Into<TypePattern>,
        pre_state1: i32,
        type2: impl Into<TypePattern>,
        pre_state2: i32,
    ) -> Self {
        Self {
            type1: type1.into(),
            type2: type2.into(),
            pre_state1,
            pre_state2,
            post_state1: pre_state1,
            post_state2: pre_state2,
            bonded_before: false,
            bonded_after: false,
            requires_enzyme: false,
        }
    }

    pub fn to_states(mut self, post_state1: i32, post_state2: i32) -> Self {
        self.post_state1 = post_state1;
        self.post_state2 = post_state2;
        self
    }

    pub fn bonds(mut self, before: bool, after: bool) -> Self {
        self.bonded_before = before;
        self.bonded_after = after;
        self
    }

    pub fn catalysed(mut self, requires_enzyme: bool) -> Self {
        self.requires_enzyme = requires_enzyme;
        self
    }

    pub fn build(self) -> ReactionData {
        ReactionData {
            type1: self.type1,
            type2: self.type2,
            pre_state1: self.pre_state1,
            pre_state2: self.pre_state2,
            post_state1: self.post_state1,
            post_state2: self.post_state2,
            bonded_before: self.bonded_before,
            bonded_after: self.bonded_after,
            requires_enzyme: self.requires_enzyme,
        }
    }
}

impl From<ReactionData> for MutableReactionData {
    fn from(rule: ReactionData) -> Self {
        Self {
            type1: rule.type1,
            type2: rule.type2,
            pre_state1: rule.pre_state1,
            pre_state2: rule.pre_state2,
            post_state1: rule.post_state1,
            post_state2: rule.post_state2,
            bonded_before: rule.bonded_before,
            bonded_after: rule.bonded_after,
            requires_enzyme: rule.requires_enzyme,
        }
    }
}

impl From<MutableReactionData> for ReactionData {
    fn from(rule: MutableReactionData) -> Self {
        rule.build()
    }
}

/// Normalize a state pair (lower first) for order-independent lookup
pub fn normalized_states(a: i32, b: i32) -> (i32, i32) {
    if a <= b { (a, b) } else { (b, a) }
}
