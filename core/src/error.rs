//! Error types shared by the engine's crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems detected while validating a [`crate::GameConfig`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The wave pattern table contains no entries.
    #[error("wave pattern table is empty")]
    NoWavePatterns,
    /// A wave pattern contains no spawn groups.
    #[error("wave pattern {index} has no spawn groups")]
    EmptyWavePattern {
        /// Zero-based index of the offending pattern.
        index: usize,
    },
    /// The boss rotation is empty.
    #[error("boss rotation is empty")]
    NoBosses,
    /// A multiplier that must be strictly positive was not.
    #[error("`{name}` must be positive, got {value}")]
    NonPositive {
        /// Name of the configuration field.
        name: &'static str,
        /// Value that was rejected.
        value: f64,
    },
    /// A duration that must be non-zero was zero.
    #[error("`{name}` must be a non-zero duration")]
    ZeroDuration {
        /// Name of the configuration field.
        name: &'static str,
    },
    /// The grid has no columns or rows.
    #[error("grid must have at least one column and one row")]
    EmptyGrid,
    /// The maximum tower level is outside the supported range.
    #[error("max tower level must be between 1 and 3, got {0}")]
    MaxLevel(u8),
}

/// Reasons a tower placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The tile lies outside the grid.
    #[error("tile is outside the grid")]
    OutOfBounds,
    /// The tile belongs to the enemy path or is otherwise unbuildable.
    #[error("tile is not buildable")]
    Unbuildable,
    /// Another tower already occupies the tile.
    #[error("tile is already occupied by a tower")]
    Occupied,
    /// The ledger cannot cover the tower's cost.
    #[error("not enough coins")]
    InsufficientFunds,
}

/// Reasons a tower upgrade request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// No tower stands on the tile.
    #[error("no tower on the tile")]
    MissingTower,
    /// The tower is already at its maximum level.
    #[error("tower is already at max level")]
    MaxLevel,
    /// The ledger cannot cover the upgrade cost.
    #[error("not enough coins")]
    InsufficientFunds,
}

/// Reasons a tower removal request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum RemovalError {
    /// No tower stands on the tile.
    #[error("no tower on the tile")]
    MissingTower,
}
