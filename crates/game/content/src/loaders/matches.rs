//! Match definition loader.
//!
//! A match file holds everything needed to start a match:
//!
//! ```json
//! {
//!   "accessCode": "1234",
//!   "grid": [[{"id": "tile-0-0", "terrainKind": "Default", "occupantName": "alice"}, ...]],
//!   "players": [{"name": "alice", "hp": {"current": 4, "max": 4}, "speed": 4,
//!                "attack": {"value": 4, "bonusDie": "D4"},
//!                "defense": {"value": 4, "bonusDie": "D6"}, "spawn": "tile-0-0"}]
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use game_core::{GameState, Grid, GridSnapshot, Player};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchFile {
    access_code: String,
    grid: GridSnapshot,
    players: Vec<Player>,
}

/// A validated match, ready to hand to the runtime.
#[derive(Clone, Debug)]
pub struct MatchDefinition {
    pub access_code: String,
    pub state: GameState,
}

pub struct MatchLoader;

impl MatchLoader {
    pub fn load(path: &Path) -> LoadResult<MatchDefinition> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid match file {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<MatchDefinition> {
        let file: MatchFile =
            serde_json::from_str(content).context("Failed to parse match JSON")?;
        if file.access_code.trim().is_empty() {
            anyhow::bail!("accessCode must not be empty");
        }

        let grid = Grid::from_snapshot(file.grid)?;
        let state = GameState::new(grid, file.players)?;
        Ok(MatchDefinition {
            access_code: file.access_code,
            state,
        })
    }

    /// Loads every `*.json` file in `dir`, sorted by file name.
    pub fn load_dir(dir: &Path) -> LoadResult<Vec<MatchDefinition>> {
        let mut paths = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read match directory {}", dir.display()))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        paths.retain(|path| path.extension().is_some_and(|ext| ext == "json"));
        paths.sort();

        paths.iter().map(|path| Self::load(path)).collect()
    }
}
