//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or timers.

pub mod errors;
pub mod handle;
pub mod messages;
pub mod registry;

pub use errors::{Result, RuntimeError};
pub use handle::MatchHandle;
pub use messages::{Reply, Request};
pub use registry::MatchRegistry;
