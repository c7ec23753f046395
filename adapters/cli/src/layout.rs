//! Tower layouts built before the first wave of a headless run.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use rampart_core::{Command, TileCoord, TowerKind};
use serde::Deserialize;

/// Ordered list of towers to build.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct TowerLayout {
    #[serde(default)]
    towers: Vec<PlannedTower>,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
struct PlannedTower {
    kind: TowerKind,
    column: u32,
    row: u32,
}

impl TowerLayout {
    /// Reads a layout from a TOML file with `[[towers]]` entries.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read tower layout {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid tower layout {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Placement commands in file order.
    pub(crate) fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.towers.iter().map(|tower| Command::PlaceTower {
            kind: tower.kind,
            tile: TileCoord::new(tower.column, tower.row),
        })
    }
}

impl Default for TowerLayout {
    /// Three basic towers beside the first two legs of the built-in path.
    fn default() -> Self {
        let basic = |column, row| PlannedTower {
            kind: TowerKind::Basic,
            column,
            row,
        };
        Self {
            towers: vec![basic(5, 4), basic(10, 4), basic(14, 8)],
        }
    }
}
