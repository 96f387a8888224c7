//! Melee combat between two adjacent players.
//!
//! A [`CombatSession`] tracks whose turn it is and how many escape attempts
//! each side has left. The resolver functions take the session together with
//! the match state and apply one action atomically:
//!
//! - [`perform_attack`]: attack score against defense score, damage, defeat
//! - [`attempt_escape`]: spend an escape attempt and roll for it
//! - [`abandon`]: end the fight because one side left the match
//!
//! Phases run `NotStarted → AttackerTurn/DefenderTurn (alternating) → Resolved`.

mod resolver;
mod session;

pub use resolver::{AttackOutcome, Defeat, EscapeOutcome, abandon, attempt_escape, perform_attack};
pub use session::{CombatPhase, CombatSession};

use crate::error::{ErrorSeverity, GameError};
use crate::grid::GridError;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("unknown player `{0}`")]
    UnknownPlayer(String),

    #[error("a player cannot fight themselves")]
    SelfCombat,

    #[error("`{attacker}` and `{defender}` are not next to each other")]
    NotAdjacent { attacker: String, defender: String },

    #[error("player `{0}` has no action points left")]
    NoActionPoints(String),

    #[error("player `{0}` is not part of this combat")]
    NotACombatant(String),

    #[error("it is `{expected}`'s combat turn, not `{actor}`'s")]
    NotCurrentFighter { actor: String, expected: String },

    #[error("player `{0}` has no escape attempts left")]
    EscapeExhausted(String),

    #[error("combat is already resolved")]
    AlreadyResolved,

    #[error("no free tile to respawn `{0}`")]
    NoFreeTile(String),

    #[error(transparent)]
    Grid(#[from] GridError),
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        use CombatError::*;
        match self {
            NotCurrentFighter { .. } | EscapeExhausted(_) | NoActionPoints(_) => {
                ErrorSeverity::Recoverable
            }
            UnknownPlayer(_) | SelfCombat | NotAdjacent { .. } | NotACombatant(_) => {
                ErrorSeverity::Validation
            }
            AlreadyResolved | NoFreeTile(_) => ErrorSeverity::Internal,
            Grid(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use CombatError::*;
        match self {
            UnknownPlayer(_) => "COMBAT_UNKNOWN_PLAYER",
            SelfCombat => "COMBAT_SELF",
            NotAdjacent { .. } => "COMBAT_NOT_ADJACENT",
            NoActionPoints(_) => "COMBAT_NO_ACTION_POINTS",
            NotACombatant(_) => "COMBAT_NOT_A_COMBATANT",
            NotCurrentFighter { .. } => "COMBAT_NOT_CURRENT_FIGHTER",
            EscapeExhausted(_) => "COMBAT_ESCAPE_EXHAUSTED",
            AlreadyResolved => "COMBAT_ALREADY_RESOLVED",
            NoFreeTile(_) => "COMBAT_NO_FREE_TILE",
            Grid(inner) => inner.error_code(),
        }
    }
}
