//! Time-driven phase machines of a match.
//!
//! Both schedulers are plain structs owned by the match worker. They hold the
//! timer slots for their phase and operate on the worker's [`MatchContext`];
//! neither ever runs concurrently with a command for the same match.

mod combat;
mod context;
mod turn;

pub use combat::{CombatSummary, CombatTurnScheduler};
pub use context::MatchContext;
pub use turn::TurnScheduler;
