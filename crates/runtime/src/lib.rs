//! Real-time orchestration of arena matches.
//!
//! This crate wraps the synchronous rules of `game-core` in one tokio task per
//! match, drives turn and combat countdowns with cancellable timers, and
//! publishes everything that happens on a topic-based event bus. Consumers
//! embed [`Runtime`] and talk to matches through [`MatchHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`scheduler`] holds the turn and combat phase machines
//! - [`timer`] provides the cancellable timer tasks they run on
//! - `workers` keeps the per-match task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;
pub mod scheduler;
pub mod timer;

mod workers;

pub use api::{MatchHandle, MatchRegistry, Reply, Request, Result, RuntimeError};
pub use events::{BoardEvent, CombatEvent, Event, EventBus, MatchEvent, Topic, TurnEvent};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use scheduler::CombatSummary;
pub use workers::MatchView;
