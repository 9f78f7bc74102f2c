//! Composite reactions
//!
//! A macroreaction is a tree: composite nodes own their sub-reactions, leaves
//! have none. New node kinds plug in by implementing [`Macroreaction`].

use crate::ReactionData;

/// A reaction that may be composed of further reactions
pub trait Macroreaction {
    /// Direct children of this node. Leaves return an empty slice.
    fn subreactions(&self) -> &[Box<dyn Macroreaction>];

    /// The single rule this node stands for, if it is an elementary step
    fn elementary(&self) -> Option<ReactionData> {
        None
    }

    fn is_leaf(&self) -> bool {
        self.subreactions().is_empty()
    }

    /// Height of the tree rooted here (a leaf has depth 1)
    fn depth(&self) -> usize {
        1 + self
            .subreactions()
            .iter()
            .map(|sub| sub.depth())
            .max()
            .unwrap_or(0)
    }

    /// Every elementary rule in the tree, depth-first, left to right
    fn elementary_reactions(&self) -> Vec<ReactionData> {
        let mut rules = Vec::new();
        collect_elementary(self, &mut rules);
        rules
    }
}

fn collect_elementary<M: Macroreaction + ?Sized>(node: &M, out: &mut Vec<ReactionData>) {
    if let Some(rule) = node.elementary() {
        out.push(rule);
    }
    for sub in node.subreactions() {
        collect_elementary(sub.as_ref(), out);
    }
}

/// The empty reaction: no rule, no children
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyMacroreaction;

impl Macroreaction for EmptyMacroreaction {
    fn subreactions(&self) -> &[Box<dyn Macroreaction>] {
        &[]
    }
}

/// A leaf wrapping one rule
#[derive(Debug, Clone, Copy)]
pub struct ElementaryMacroreaction {
    rule: ReactionData,
}

impl ElementaryMacroreaction {
    pub fn new(rule: ReactionData) -> Self {
        Self { rule }
    }
}

impl Macroreaction for ElementaryMacroreaction {
    fn subreactions(&self) -> &[Box<dyn Macroreaction>] {
        &[]
    }

    fn elementary(&self) -> Option<ReactionData> {
        Some(self.rule)
    }
}

/// An ordered sequence of sub-reactions
#[derive(Default)]
pub struct CompositeMacroreaction {
    children: Vec<Box<dyn Macroreaction>>,
}

impl CompositeMacroreaction {
    pub fn new(children: Vec<Box<dyn Macroreaction>>) -> Self {
        Self { children }
    }

    pub fn push(&mut self, child: Box<dyn Macroreaction>) {
        self.children.push(child);
    }
}

impl Macroreaction for CompositeMacroreaction {
    fn subreactions(&self) -> &[Box<dyn Macroreaction>] {
        &self.children
    }
}
