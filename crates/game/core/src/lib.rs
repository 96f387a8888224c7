//! Deterministic rules of a turn-based tactical arena match.
//!
//! `game-core` owns the grid, movement costs, pathfinding, combat resolution
//! and turn rotation. Everything here is synchronous and free of I/O; the
//! `runtime` crate adds clocks, channels and events on top.
pub mod combat;
pub mod config;
pub mod error;
pub mod grid;
pub mod movement;
pub mod pathfinding;
pub mod player;
pub mod rng;
pub mod state;
pub mod turn;

pub use combat::{
    AttackOutcome, CombatError, CombatPhase, CombatSession, Defeat, EscapeOutcome, abandon,
    attempt_escape, perform_attack,
};
pub use config::GameConfig;
pub use error::{ErrorSeverity, GameError};
pub use grid::{
    Grid, GridError, GridSnapshot, ItemId, MovementCost, MovementCostTable, TerrainKind, Tile,
    TileId, TileIdParseError, TileSnapshot,
};
pub use movement::{DoorError, DoorOutcome, MoveError, MoveOutcome, resolve_move, toggle_door};
pub use crate::pathfinding::{
    Move, MoveKind, PathError, candidate_moves, find_best_move_tile, find_closest_reachable_tile,
    find_nearest_free_tile, path_cost, quickest_free_path, quickest_path, reachable_tiles,
};
pub use player::{CombatStat, Die, Health, Player};
pub use rng::{PcgRng, RngOracle, ScriptedRng};
pub use state::{GameState, InitializationError};
pub use turn::{TurnError, TurnPhase, TurnSession};
