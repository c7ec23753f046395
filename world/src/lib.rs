#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid layout for Rampart.
//!
//! The world owns the tile grid, the finished enemy path and the set of tiles
//! occupied by towers. It implements [`PathProvider`] and [`TowerSites`],
//! which is all the simulation systems know about the map.

use std::{collections::BTreeSet, sync::Arc};

use glam::Vec2;
use rampart_core::{GridConfig, PathProvider, PlacementError, TileCoord, TowerId, TowerSites};

mod path;
mod towers;

pub use path::PathError;

use towers::TowerOccupancy;

/// Represents the authoritative Rampart grid state.
#[derive(Clone, Debug)]
pub struct World {
    columns: u32,
    rows: u32,
    tile_size: f32,
    path: Vec<TileCoord>,
    path_tiles: BTreeSet<TileCoord>,
    path_points: Arc<[Vec2]>,
    blocked: BTreeSet<TileCoord>,
    towers: TowerOccupancy,
}

impl World {
    /// Builds the world from grid configuration.
    ///
    /// An unusable waypoint list never aborts construction: the world falls
    /// back to a straight path across the middle row and logs a warning.
    #[must_use]
    pub fn new(config: &GridConfig) -> Self {
        let path = match path::expand_waypoints(&config.waypoints, config.columns, config.rows) {
            Ok(tiles) => tiles,
            Err(error) => {
                tracing::warn!(%error, "configured enemy path is unusable, using straight line");
                path::straight_line(config.columns, config.rows)
            }
        };
        Self::assemble(config, path)
    }

    /// Builds the world around an explicit tile path.
    ///
    /// The same straight-line fallback applies when the tiles are not a
    /// connected, in-bounds, non-repeating sequence.
    #[must_use]
    pub fn with_path(config: &GridConfig, tiles: Vec<TileCoord>) -> Self {
        let path = match path::validate_tiles(&tiles, config.columns, config.rows) {
            Ok(()) => tiles,
            Err(error) => {
                tracing::warn!(%error, "explicit enemy path is unusable, using straight line");
                path::straight_line(config.columns, config.rows)
            }
        };
        Self::assemble(config, path)
    }

    fn assemble(config: &GridConfig, path: Vec<TileCoord>) -> Self {
        let path_tiles = path.iter().copied().collect();
        let path_points = path
            .iter()
            .map(|tile| tile.center(config.tile_size))
            .collect::<Vec<_>>()
            .into();
        Self {
            columns: config.columns,
            rows: config.rows,
            tile_size: config.tile_size,
            path,
            path_tiles,
            path_points,
            blocked: config.blocked.iter().copied().collect(),
            towers: TowerOccupancy::new(),
        }
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Reports whether the tile lies inside the grid.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.column() < self.columns && tile.row() < self.rows
    }

    /// Tile containing a world-space point, if it lies inside the grid.
    #[must_use]
    pub fn tile_at(&self, point: Vec2) -> Option<TileCoord> {
        if point.x < 0.0 || point.y < 0.0 || self.tile_size <= 0.0 {
            return None;
        }
        let tile = TileCoord::new(
            (point.x / self.tile_size) as u32,
            (point.y / self.tile_size) as u32,
        );
        self.contains(tile).then_some(tile)
    }

    /// Number of occupied tiles.
    #[must_use]
    pub fn tower_count(&self) -> usize {
        self.towers.len()
    }

    /// Removes every tower from the grid.
    pub fn clear_towers(&mut self) {
        self.towers.clear();
    }
}

impl PathProvider for World {
    fn enemy_path(&self) -> &[TileCoord] {
        &self.path
    }

    fn path_points(&self) -> Arc<[Vec2]> {
        Arc::clone(&self.path_points)
    }

    fn is_on_enemy_path(&self, tile: TileCoord) -> bool {
        self.path_tiles.contains(&tile)
    }

    /// Checks bounds, then buildability, then occupancy.
    fn placement_error(&self, tile: TileCoord) -> Option<PlacementError> {
        if !self.contains(tile) {
            return Some(PlacementError::OutOfBounds);
        }
        if self.path_tiles.contains(&tile) || self.blocked.contains(&tile) {
            return Some(PlacementError::Unbuildable);
        }
        if self.towers.is_occupied(tile) {
            return Some(PlacementError::Occupied);
        }
        None
    }
}

impl TowerSites for World {
    fn tile_center(&self, tile: TileCoord) -> Vec2 {
        tile.center(self.tile_size)
    }

    fn tower_at(&self, tile: TileCoord) -> Option<TowerId> {
        self.towers.tower_at(tile)
    }

    /// Re-validates the tile and refuses rather than overwriting.
    fn occupy(&mut self, tile: TileCoord, tower: TowerId) -> Result<(), PlacementError> {
        if let Some(error) = self.placement_error(tile) {
            return Err(error);
        }
        self.towers.occupy(tile, tower);
        Ok(())
    }

    fn vacate(&mut self, tile: TileCoord) -> Option<TowerId> {
        self.towers.vacate(tile)
    }
}
