//! High-level runtime orchestrator.
//!
//! The runtime owns the event bus and the match registry, and exposes a
//! builder-based API for hosts to register matches up front.

use tokio::sync::broadcast;

use game_core::{GameConfig, GameState};

use crate::api::{MatchHandle, MatchRegistry, Request, Reply, Result};
use crate::events::{Event, EventBus, Topic};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Seed for every match's dice. `None` draws a fresh seed per match.
    pub rng_seed: Option<u64>,
}

impl RuntimeConfig {
    pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;
    pub const DEFAULT_COMMAND_BUFFER_SIZE: usize = 32;
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: Self::DEFAULT_EVENT_BUFFER_SIZE,
            command_buffer_size: Self::DEFAULT_COMMAND_BUFFER_SIZE,
            rng_seed: None,
        }
    }
}

/// Main runtime that hosts every match
///
/// Design: Runtime owns the registry and the bus; [`MatchHandle`] provides a
/// cloneable façade per match.
pub struct Runtime {
    registry: MatchRegistry,
    event_bus: EventBus,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    pub async fn create_match(&self, access_code: &str, state: GameState) -> Result<MatchHandle> {
        self.registry.create_match(access_code, state).await
    }

    pub async fn handle(&self, access_code: &str) -> Result<MatchHandle> {
        self.registry.get(access_code).await
    }

    pub async fn dispatch(&self, request: Request) -> Result<Reply> {
        self.registry.dispatch(request).await
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn subscribe_all(&self) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        self.event_bus.subscribe_all()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        self.registry.shutdown().await
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    matches: Vec<(String, GameState)>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            matches: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.config.game_config = game_config;
        self
    }

    /// Pin the dice seed for reproducible matches.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.config.rng_seed = Some(seed);
        self
    }

    /// Register a match to create when the runtime is built.
    pub fn with_match(mut self, access_code: impl Into<String>, state: GameState) -> Self {
        self.matches.push((access_code.into(), state));
        self
    }

    /// Build the runtime and spawn a worker for every registered match.
    pub async fn build(self) -> Result<Runtime> {
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let registry = MatchRegistry::new(self.config, event_bus.clone());
        for (access_code, state) in self.matches {
            registry.create_match(&access_code, state).await?;
        }
        Ok(Runtime {
            registry,
            event_bus,
        })
    }
}
