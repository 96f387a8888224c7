//! Errors raised while assembling a match from its definition.

use crate::error::{ErrorSeverity, GameError};
use crate::grid::{GridError, TileId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InitializationError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("a match needs at least two players, got {0}")]
    NotEnoughPlayers(usize),

    #[error("player name `{0}` is used more than once")]
    DuplicatePlayer(String),

    #[error("tile {tile} is occupied by unknown player `{occupant}`")]
    UnknownOccupant { tile: TileId, occupant: String },

    #[error("player `{0}` is not on the grid")]
    PlayerNotPlaced(String),

    #[error("player `{0}` occupies more than one tile")]
    PlayerPlacedTwice(String),

    #[error("spawn tile {spawn} of player `{player}` is off the grid or a wall")]
    InvalidSpawn { player: String, spawn: TileId },

    #[error("player `{0}` has more hit points than its maximum")]
    InvalidHealth(String),
}

impl GameError for InitializationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Grid(inner) => inner.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use InitializationError::*;
        match self {
            Grid(inner) => inner.error_code(),
            NotEnoughPlayers(_) => "INIT_NOT_ENOUGH_PLAYERS",
            DuplicatePlayer(_) => "INIT_DUPLICATE_PLAYER",
            UnknownOccupant { .. } => "INIT_UNKNOWN_OCCUPANT",
            PlayerNotPlaced(_) => "INIT_PLAYER_NOT_PLACED",
            PlayerPlacedTwice(_) => "INIT_PLAYER_PLACED_TWICE",
            InvalidSpawn { .. } => "INIT_INVALID_SPAWN",
            InvalidHealth(_) => "INIT_INVALID_HEALTH",
        }
    }
}
