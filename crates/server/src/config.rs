//! Server configuration read from the process environment.
use std::env;
use std::path::PathBuf;

use anyhow::Result;
use game_content::{ConfigLoader, ContentFactory, MatchDefinition};
use game_core::GameConfig;
use runtime::RuntimeConfig;

/// Everything the server needs before it can build a runtime.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Holds `config.toml` and `matches/`.
    pub data_dir: PathBuf,
    /// Overrides `data_dir/config.toml`.
    pub config_path: Option<PathBuf>,
    /// Overrides `data_dir/matches`.
    pub match_dir: Option<PathBuf>,
    pub event_buffer: usize,
    pub command_buffer: usize,
    pub log_dir: Option<PathBuf>,
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(Self::DEFAULT_DATA_DIR),
            config_path: None,
            match_dir: None,
            event_buffer: RuntimeConfig::DEFAULT_EVENT_BUFFER_SIZE,
            command_buffer: RuntimeConfig::DEFAULT_COMMAND_BUFFER_SIZE,
            log_dir: None,
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "./data";

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_DATA_DIR` - Content directory (default: `./data`)
    /// - `ARENA_CONFIG` - Game config TOML (default: `<data dir>/config.toml`)
    /// - `ARENA_MATCH_DIR` - Match JSON directory (default: `<data dir>/matches`)
    /// - `ARENA_EVENT_BUFFER` - Per-topic event capacity (default: 100)
    /// - `ARENA_COMMAND_BUFFER` - Per-match command queue size (default: 32)
    /// - `ARENA_LOG_DIR` - Log directory (default: platform cache dir)
    /// - `ARENA_RNG_SEED` - Fixed dice seed (default: random per match)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("ARENA_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.config_path = env::var("ARENA_CONFIG").ok().map(PathBuf::from);
        config.match_dir = env::var("ARENA_MATCH_DIR").ok().map(PathBuf::from);

        if let Some(capacity) = read_env::<usize>("ARENA_EVENT_BUFFER") {
            config.event_buffer = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("ARENA_COMMAND_BUFFER") {
            config.command_buffer = capacity.max(1);
        }

        config.log_dir = env::var("ARENA_LOG_DIR").ok().map(PathBuf::from);
        config.rng_seed = read_env::<u64>("ARENA_RNG_SEED");

        config
    }

    pub fn load_game_config(&self) -> Result<GameConfig> {
        match &self.config_path {
            Some(path) => ConfigLoader::load(path),
            None => ContentFactory::new(&self.data_dir).load_config(),
        }
    }

    pub fn load_matches(&self) -> Result<Vec<MatchDefinition>> {
        match &self.match_dir {
            Some(dir) => game_content::MatchLoader::load_dir(dir),
            None => ContentFactory::new(&self.data_dir).load_matches(),
        }
    }

    pub fn runtime_config(&self, game_config: GameConfig) -> RuntimeConfig {
        RuntimeConfig {
            game_config,
            event_buffer_size: self.event_buffer,
            command_buffer_size: self.command_buffer,
            rng_seed: self.rng_seed,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
