//! Enemy path expansion and validation.

use rampart_core::TileCoord;
use thiserror::Error;

/// Reasons a configured path cannot be used as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// No waypoints were provided.
    #[error("path has no waypoints")]
    Empty,
    /// A waypoint lies outside the grid.
    #[error("waypoint ({}, {}) is outside the grid", .0.column(), .0.row())]
    OutOfBounds(TileCoord),
    /// Two consecutive waypoints share neither a row nor a column.
    #[error(
        "waypoints ({}, {}) and ({}, {}) are not aligned",
        .from.column(), .from.row(), .to.column(), .to.row()
    )]
    Disconnected {
        /// Earlier waypoint.
        from: TileCoord,
        /// Later waypoint.
        to: TileCoord,
    },
    /// The expanded path visits the same tile twice.
    #[error("path revisits tile ({}, {})", .0.column(), .0.row())]
    Revisits(TileCoord),
}

/// Expands corner waypoints into an ordered list of orthogonally adjacent tiles.
pub(crate) fn expand_waypoints(
    waypoints: &[TileCoord],
    columns: u32,
    rows: u32,
) -> Result<Vec<TileCoord>, PathError> {
    let Some(&first) = waypoints.first() else {
        return Err(PathError::Empty);
    };
    ensure_in_bounds(first, columns, rows)?;

    let mut tiles = vec![first];
    for pair in waypoints.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        ensure_in_bounds(to, columns, rows)?;
        if from.column() != to.column() && from.row() != to.row() {
            return Err(PathError::Disconnected { from, to });
        }

        let mut current = from;
        while current != to {
            current = step_towards(current, to);
            tiles.push(current);
        }
    }

    ensure_simple(&tiles)?;
    Ok(tiles)
}

/// Checks that an explicit tile list forms a connected, non-repeating path.
pub(crate) fn validate_tiles(
    tiles: &[TileCoord],
    columns: u32,
    rows: u32,
) -> Result<(), PathError> {
    if tiles.is_empty() {
        return Err(PathError::Empty);
    }
    for &tile in tiles {
        ensure_in_bounds(tile, columns, rows)?;
    }
    for pair in tiles.windows(2) {
        if !pair[0].is_adjacent(pair[1]) {
            return Err(PathError::Disconnected {
                from: pair[0],
                to: pair[1],
            });
        }
    }
    ensure_simple(tiles)
}

/// Straight path across the middle row, used when the configured one is unusable.
pub(crate) fn straight_line(columns: u32, rows: u32) -> Vec<TileCoord> {
    let row = rows / 2;
    (0..columns).map(|column| TileCoord::new(column, row)).collect()
}

fn ensure_in_bounds(tile: TileCoord, columns: u32, rows: u32) -> Result<(), PathError> {
    if tile.column() < columns && tile.row() < rows {
        Ok(())
    } else {
        Err(PathError::OutOfBounds(tile))
    }
}

fn ensure_simple(tiles: &[TileCoord]) -> Result<(), PathError> {
    let mut seen = std::collections::BTreeSet::new();
    for &tile in tiles {
        if !seen.insert(tile) {
            return Err(PathError::Revisits(tile));
        }
    }
    Ok(())
}

fn step_towards(from: TileCoord, to: TileCoord) -> TileCoord {
    let column = step_axis(from.column(), to.column());
    let row = if column == from.column() {
        step_axis(from.row(), to.row())
    } else {
        from.row()
    };
    TileCoord::new(column, row)
}

fn step_axis(from: u32, to: u32) -> u32 {
    match from.cmp(&to) {
        std::cmp::Ordering::Less => from + 1,
        std::cmp::Ordering::Greater => from - 1,
        std::cmp::Ordering::Equal => from,
    }
}
