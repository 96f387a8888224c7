//! Game configuration loader.

use std::path::Path;

use anyhow::bail;
use game_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Keys left out of the file keep their defaults. A `[movement_costs]` table,
/// when present, must list every terrain kind:
///
/// ```toml
/// turn_duration_secs = 20
///
/// [movement_costs]
/// Default = 1
/// Ice = 0
/// Water = 2
/// Door = 1
/// Wall = "impassable"
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        let missing = config.movement_costs.missing();
        if let Some(kind) = missing.first() {
            bail!("Unknown tile type: {kind} (missing from movement_costs)");
        }
        if config.escape_chance_percent > 100 {
            bail!(
                "escape_chance_percent must be within 0..=100, got {}",
                config.escape_chance_percent
            );
        }

        Ok(config)
    }
}
