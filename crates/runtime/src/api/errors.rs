//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, the match registry, and the
//! game-core rules so callers can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{
    CombatError, DoorError, ErrorSeverity, GameError, InitializationError, MoveError, PathError,
    TileId, TurnError,
};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("match worker command channel closed")]
    CommandChannelClosed,

    #[error("match worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("match worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("no match with access code `{0}`")]
    UnknownMatch(String),

    #[error("a match with access code `{0}` already exists")]
    DuplicateMatch(String),

    #[error("match already started")]
    AlreadyStarted,

    #[error("match is over")]
    MatchFinished,

    #[error("a combat is in progress")]
    CombatInProgress,

    #[error("no combat is in progress")]
    NoActiveCombat,

    #[error("tried to end a combat that was never started")]
    CombatNotStarted,

    #[error("no player on tile {0}")]
    EmptyTile(TileId),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Door(#[from] DoorError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("failed to initialize match state")]
    InitialState(#[from] InitializationError),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        use RuntimeError::*;
        match self {
            CommandChannelClosed | ReplyChannelClosed(_) | WorkerJoin(_) => ErrorSeverity::Fatal,
            CombatNotStarted => ErrorSeverity::Internal,
            AlreadyStarted | MatchFinished | CombatInProgress | NoActiveCombat => {
                ErrorSeverity::Recoverable
            }
            UnknownMatch(_) | DuplicateMatch(_) | EmptyTile(_) => ErrorSeverity::Validation,
            Turn(inner) => inner.severity(),
            Move(inner) => inner.severity(),
            Door(inner) => inner.severity(),
            Combat(inner) => inner.severity(),
            Path(inner) => inner.severity(),
            InitialState(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use RuntimeError::*;
        match self {
            CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            UnknownMatch(_) => "RUNTIME_UNKNOWN_MATCH",
            DuplicateMatch(_) => "RUNTIME_DUPLICATE_MATCH",
            AlreadyStarted => "RUNTIME_ALREADY_STARTED",
            MatchFinished => "RUNTIME_MATCH_FINISHED",
            CombatInProgress => "RUNTIME_COMBAT_IN_PROGRESS",
            NoActiveCombat => "RUNTIME_NO_ACTIVE_COMBAT",
            CombatNotStarted => "RUNTIME_COMBAT_NOT_STARTED",
            EmptyTile(_) => "RUNTIME_EMPTY_TILE",
            Turn(inner) => inner.error_code(),
            Move(inner) => inner.error_code(),
            Door(inner) => inner.error_code(),
            Combat(inner) => inner.error_code(),
            Path(inner) => inner.error_code(),
            InitialState(inner) => inner.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_classification() {
        let err = RuntimeError::from(TurnError::NoActiveTurn);
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "TURN_NO_ACTIVE_TURN");

        assert_eq!(RuntimeError::CombatNotStarted.severity(), ErrorSeverity::Internal);
    }
}
