//! Worker tasks that back the runtime orchestration.
//!
//! Each match runs in its own [`MatchWorker`]; workers share nothing but the
//! event bus.

mod match_worker;

pub use match_worker::{Command, MatchView, MatchWorker};
