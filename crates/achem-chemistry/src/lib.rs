//! Chemistry data for the achem artificial chemistry
//!
//! This crate provides the foundational data types for the reaction engine:
//! - Atom type tags and their display colours (AtomType)
//! - Reaction rules and the rule language (ReactionData, TypePattern)
//! - Fixed-capacity enzyme rule tables (RuleSlots)
//! - The global rule table (ReactionRegistry)
//! - Composite reactions (Macroreaction)

mod atom_type;
mod macroreaction;
mod reaction;
mod registry;
mod rule_slots;

pub use atom_type::AtomType;
pub use macroreaction::{
    CompositeMacroreaction, ElementaryMacroreaction, EmptyMacroreaction, Macroreaction,
};
pub use reaction::{
    MutableReactionData, Orientation, ReactionData, Reactant, TypePattern, normalized_states,
};
pub use registry::ReactionRegistry;
pub use rule_slots::{CapacityError, RuleSlots};
