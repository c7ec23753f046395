//! Tile occupancy for placed towers.

use std::collections::BTreeMap;

use rampart_core::{TileCoord, TowerId};

/// Registry that maps occupied tiles to the towers standing on them.
#[derive(Clone, Debug, Default)]
pub(crate) struct TowerOccupancy {
    entries: BTreeMap<TileCoord, TowerId>,
}

impl TowerOccupancy {
    /// Creates an empty occupancy registry.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn tower_at(&self, tile: TileCoord) -> Option<TowerId> {
        self.entries.get(&tile).copied()
    }

    pub(crate) fn is_occupied(&self, tile: TileCoord) -> bool {
        self.entries.contains_key(&tile)
    }

    pub(crate) fn occupy(&mut self, tile: TileCoord, tower: TowerId) {
        let _ = self.entries.insert(tile, tower);
    }

    pub(crate) fn vacate(&mut self, tile: TileCoord) -> Option<TowerId> {
        self.entries.remove(&tile)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
