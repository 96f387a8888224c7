//! Data files for arena matches and loaders that turn them into game-core types.
//!
//! - Game configuration (TOML): timings, combat tuning, movement costs
//! - Match definitions (JSON): access code, grid snapshot and players
//!
//! Content is read once at startup; the runtime never touches files.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, MatchDefinition, MatchLoader};
