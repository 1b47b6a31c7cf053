//! Static map description and load-time validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lane_battle_core::{Direction, Position, Team, TileGrid, TileKind};

/// Structural problems that make a map unusable.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The map holds no tiles.
    #[error("map has no tiles")]
    EmptyGrid,
    /// A row's length differs from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedGrid {
        /// Offending row.
        row: u32,
        /// Length of the first row.
        expected: u32,
        /// Length of the offending row.
        found: u32,
    },
    /// A tile token is not `r`, `b` or `O`.
    #[error("unknown tile `{token}` at ({column}, {row})")]
    UnknownTile {
        /// Offending token.
        token: char,
        /// Column of the token.
        column: u32,
        /// Row of the token.
        row: u32,
    },
    /// A base lies outside the grid.
    #[error("{} base lies outside the map", team.label())]
    BaseOutOfBounds {
        /// Team owning the base.
        team: Team,
    },
    /// A demon spawner does not sit on a lane tile.
    #[error("demon spawner at ({column}, {row}) is not on a lane")]
    SpawnerOffLane {
        /// Column of the spawner.
        column: u32,
        /// Row of the spawner.
        row: u32,
    },
    /// A lane corridor forks.
    #[error("lane leaving {direction:?} branches at ({column}, {row})")]
    BranchingLane {
        /// Direction the lane leaves the red base.
        direction: Direction,
        /// Column of the fork.
        column: u32,
        /// Row of the fork.
        row: u32,
    },
    /// A lane corridor stops before reaching the blue base.
    #[error("lane leaving {direction:?} dead-ends at ({column}, {row})")]
    DeadEndLane {
        /// Direction the lane leaves the red base.
        direction: Direction,
        /// Column of the last tile.
        column: u32,
        /// Row of the last tile.
        row: u32,
    },
    /// The map document is not valid JSON for a map description.
    #[error("malformed map document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Demon spawner entry of a map description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnerDescription {
    /// Column of the spawn tile.
    pub x: u32,
    /// Row of the spawn tile.
    pub y: u32,
    /// Team attacked by spawned demons.
    pub target_team: Team,
}

/// Map document loaded at game start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDescription {
    /// Tile tokens, one string per row.
    pub floor_tiles: Vec<String>,
    /// Red base position.
    pub red_base: Position,
    /// Blue base position.
    pub blue_base: Position,
    /// Demon spawners in processing order.
    #[serde(default)]
    pub demon_spawners: Vec<SpawnerDescription>,
}

impl MapDescription {
    /// Parses a JSON map document.
    pub fn from_json(document: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Converts the token rows into a validated tile grid.
    pub fn tile_grid(&self) -> Result<TileGrid, LoadError> {
        let expected = self
            .floor_tiles
            .first()
            .map(|row| row.chars().count())
            .unwrap_or_default();
        if expected == 0 {
            return Err(LoadError::EmptyGrid);
        }

        let mut tiles = Vec::with_capacity(expected * self.floor_tiles.len());
        for (row_index, row) in self.floor_tiles.iter().enumerate() {
            let row_number = to_u32(row_index);
            let found = row.chars().count();
            if found != expected {
                return Err(LoadError::RaggedGrid {
                    row: row_number,
                    expected: to_u32(expected),
                    found: to_u32(found),
                });
            }
            for (column_index, token) in row.chars().enumerate() {
                let tile = TileKind::from_token(token).ok_or(LoadError::UnknownTile {
                    token,
                    column: to_u32(column_index),
                    row: row_number,
                })?;
                tiles.push(tile);
            }
        }

        TileGrid::new(to_u32(expected), to_u32(self.floor_tiles.len()), tiles)
            .ok_or(LoadError::EmptyGrid)
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
