//! Topic-based event bus for runtime events.
//!
//! Match workers publish everything observable (turn changes, ticks, combat
//! results, board changes) to a topic; consumers subscribe only to the topics
//! they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{BoardEvent, CombatEvent, MatchEvent, TurnEvent};
