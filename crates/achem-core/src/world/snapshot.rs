//! Read-only views of the grid for renderers and other observers
//!
//! The map publishes a complete snapshot at the end of every tick. Readers on
//! other threads swap in whole snapshots, so they never see an atom halfway
//! through a move.

use achem_chemistry::AtomType;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::sync::Arc;

use super::{AtomId, Location};

/// Everything a renderer needs to draw one atom
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSnapshot {
    pub id: AtomId,
    pub location: Location,
    pub kind: AtomType,
    /// Base color (RGBA)
    pub color: [u8; 4],
    pub state: i32,
    pub enzyme: bool,
    /// Locations of bond partners
    pub bonded_to: SmallVec<[Location; 4]>,
}

/// Immutable picture of the whole grid after some tick
#[derive(Debug, Clone, Default)]
pub struct GridSnapshot {
    pub size: i32,
    pub tick: u64,
    pub atoms: Vec<AtomSnapshot>,
}

impl GridSnapshot {
    pub fn atom_at(&self, location: Location) -> Option<&AtomSnapshot> {
        self.atoms.iter().find(|a| a.location == location)
    }
}

/// Shared slot holding the latest published snapshot
#[derive(Clone, Default)]
pub struct SnapshotCell {
    inner: Arc<RwLock<Arc<GridSnapshot>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest published snapshot. Cheap: clones an `Arc`.
    pub fn load(&self) -> Arc<GridSnapshot> {
        self.inner.read().clone()
    }

    /// Replace the published snapshot in one step
    pub fn publish(&self, snapshot: GridSnapshot) {
        let snapshot = Arc::new(snapshot);
        *self.inner.write() = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_replaces_whole_snapshot() {
        let cell = SnapshotCell::new();
        assert!(cell.load().atoms.is_empty());

        let held = cell.load();
        cell.publish(GridSnapshot {
            size: 4,
            tick: 7,
            atoms: vec![AtomSnapshot {
                id: AtomId::from_raw(0),
                location: Location::square(1, 1),
                kind: AtomType::A,
                color: AtomType::A.color(),
                state: 0,
                enzyme: false,
                bonded_to: SmallVec::new(),
            }],
        });

        // Readers holding the old snapshot keep a consistent view
        assert!(held.atoms.is_empty());

        let latest = cell.load();
        assert_eq!(latest.tick, 7);
        assert!(latest.atom_at(Location::square(1, 1)).is_some());
        assert!(latest.atom_at(Location::square(0, 0)).is_none());
    }

    #[test]
    fn test_clones_share_slot() {
        let cell = SnapshotCell::new();
        let reader = cell.clone();
        cell.publish(GridSnapshot {
            size: 2,
            tick: 1,
            atoms: Vec::new(),
        });
        assert_eq!(reader.load().tick, 1);
    }
}
