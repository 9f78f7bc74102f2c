//! Simulation statistics collection trait

/// Trait for collecting simulation statistics
///
/// This allows the engine to record stats without depending on how the
/// driver aggregates or reports them.
pub trait SimStats {
    /// Record that an atom moved to a neighbouring cell
    fn record_atom_moved(&mut self);

    /// Record that a move was rejected (occupied cell or bond constraint)
    fn record_move_rejected(&mut self);

    /// Record that a reaction fired between two atoms
    fn record_reaction(&mut self);

    /// Record that an enzyme's rule table was mutated
    fn record_mutation(&mut self);
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_atom_moved(&mut self) {}
    fn record_move_rejected(&mut self) {}
    fn record_reaction(&mut self) {}
    fn record_mutation(&mut self) {}
}

/// Plain counters, reset by the caller between reporting intervals
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickCounters {
    pub atoms_moved: u64,
    pub moves_rejected: u64,
    pub reactions: u64,
    pub mutations: u64,
}

impl TickCounters {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl SimStats for TickCounters {
    fn record_atom_moved(&mut self) {
        self.atoms_moved += 1;
    }

    fn record_move_rejected(&mut self) {
        self.moves_rejected += 1;
    }

    fn record_reaction(&mut self) {
        self.reactions += 1;
    }

    fn record_mutation(&mut self) {
        self.mutations += 1;
    }
}
