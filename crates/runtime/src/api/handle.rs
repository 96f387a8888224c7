//! Cloneable façade for issuing commands to one match.
//!
//! [`MatchHandle`] hides channel plumbing and offers async helpers for every
//! request a player can make, plus event subscription.
use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{AttackOutcome, DoorOutcome, EscapeOutcome, MoveOutcome, TileId};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, MatchView};

/// Client-facing handle to interact with a running match
#[derive(Clone, Debug)]
pub struct MatchHandle {
    match_id: String,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl MatchHandle {
    pub(crate) fn new(match_id: String, command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            match_id,
            command_tx,
            event_bus,
        }
    }

    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    async fn send<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Starts the first turn. Returns who plays it.
    pub async fn start(&self) -> Result<String> {
        self.send(|reply| Command::StartMatch { reply }).await?
    }

    /// Moves the player standing on `from` to `to`.
    pub async fn request_move(&self, from: TileId, to: TileId) -> Result<MoveOutcome> {
        self.send(|reply| Command::Move { from, to, reply }).await?
    }

    /// Starts a fight. `attacker` must be the player whose turn it is.
    pub async fn request_combat(&self, attacker: &str, defender: &str) -> Result<()> {
        let (attacker, defender) = (attacker.to_owned(), defender.to_owned());
        self.send(|reply| Command::Engage {
            attacker,
            defender,
            reply,
        })
        .await?
    }

    pub async fn request_attack(&self, actor: &str) -> Result<AttackOutcome> {
        let actor = actor.to_owned();
        self.send(|reply| Command::Attack { actor, reply }).await?
    }

    pub async fn request_escape(&self, actor: &str) -> Result<EscapeOutcome> {
        let actor = actor.to_owned();
        self.send(|reply| Command::Escape { actor, reply }).await?
    }

    pub async fn toggle_door(&self, actor: &str, tile: TileId) -> Result<DoorOutcome> {
        let actor = actor.to_owned();
        self.send(|reply| Command::ToggleDoor { actor, tile, reply })
            .await?
    }

    /// Ends the running turn early.
    pub async fn end_turn(&self) -> Result<()> {
        self.send(|reply| Command::EndTurn { reply }).await?
    }

    pub async fn abandon(&self, player: &str) -> Result<()> {
        let player = player.to_owned();
        self.send(|reply| Command::Abandon { player, reply }).await?
    }

    /// Makes every later attack roll the die maximum against a fixed defense roll.
    pub async fn set_debug_mode(&self, enabled: bool) -> Result<()> {
        self.send(|reply| Command::SetDebugMode { enabled, reply })
            .await
    }

    /// Query the current match state (read-only snapshot)
    pub async fn query(&self) -> Result<MatchView> {
        self.send(|reply| Command::Query { reply }).await
    }

    /// Asks the worker to stop. Later calls fail with a closed channel.
    pub async fn shutdown(&self) -> Result<()> {
        self.send(|reply| Command::Shutdown { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// The bus is shared by every match; filter on [`Event::match_id`].
    ///
    /// ```rust,ignore
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     if event.match_id() == handle.match_id() {
    ///         // ...
    ///     }
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
