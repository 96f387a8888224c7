//! Keyed registry of running matches.
//!
//! Each entry is an independent worker task; the registry only maps access
//! codes to handles and never touches match state itself.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use game_core::{GameState, PcgRng, RngOracle};

use super::errors::{Result, RuntimeError};
use super::handle::MatchHandle;
use super::messages::{Reply, Request};
use crate::events::EventBus;
use crate::runtime::RuntimeConfig;
use crate::scheduler::MatchContext;
use crate::timer::Scheduler;
use crate::workers::MatchWorker;

struct MatchEntry {
    handle: MatchHandle,
    worker: JoinHandle<()>,
}

/// Access code → running match.
#[derive(Clone)]
pub struct MatchRegistry {
    matches: Arc<RwLock<HashMap<String, MatchEntry>>>,
    config: Arc<RuntimeConfig>,
    event_bus: EventBus,
}

impl MatchRegistry {
    pub fn new(config: RuntimeConfig, event_bus: EventBus) -> Self {
        Self {
            matches: Arc::new(RwLock::new(HashMap::new())),
            config: Arc::new(config),
            event_bus,
        }
    }

    /// Spawns an idle worker for `state` under `access_code`.
    ///
    /// Dice are seeded from the runtime config when it pins a seed, otherwise
    /// from the OS RNG.
    pub async fn create_match(&self, access_code: &str, state: GameState) -> Result<MatchHandle> {
        let seed = self.config.rng_seed.unwrap_or_else(rand::random);
        self.create_match_with_rng(access_code, state, Box::new(PcgRng::new(seed)))
            .await
    }

    /// Like [`create_match`](Self::create_match) with caller-supplied dice.
    pub async fn create_match_with_rng(
        &self,
        access_code: &str,
        state: GameState,
        rng: Box<dyn RngOracle>,
    ) -> Result<MatchHandle> {
        let mut matches = self.matches.write().await;
        if matches.contains_key(access_code) {
            return Err(RuntimeError::DuplicateMatch(access_code.to_owned()));
        }

        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size.max(1));
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let ctx = MatchContext::new(
            access_code.to_owned(),
            self.config.game_config.clone(),
            state,
            rng,
            Scheduler::new(timer_tx),
            self.event_bus.clone(),
        );
        let worker = tokio::spawn(MatchWorker::new(ctx, command_rx, timer_rx).run());
        let handle = MatchHandle::new(access_code.to_owned(), command_tx, self.event_bus.clone());

        info!(match_id = %access_code, "match registered");
        matches.insert(
            access_code.to_owned(),
            MatchEntry {
                handle: handle.clone(),
                worker,
            },
        );
        Ok(handle)
    }

    pub async fn get(&self, access_code: &str) -> Result<MatchHandle> {
        self.matches
            .read()
            .await
            .get(access_code)
            .map(|entry| entry.handle.clone())
            .ok_or_else(|| RuntimeError::UnknownMatch(access_code.to_owned()))
    }

    pub async fn contains(&self, access_code: &str) -> bool {
        self.matches.read().await.contains_key(access_code)
    }

    pub async fn match_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.matches.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Stops the match's worker and forgets it.
    pub async fn remove(&self, access_code: &str) -> Result<()> {
        let entry = self
            .matches
            .write()
            .await
            .remove(access_code)
            .ok_or_else(|| RuntimeError::UnknownMatch(access_code.to_owned()))?;
        Self::stop(entry).await?;
        info!(match_id = %access_code, "match removed");
        Ok(())
    }

    /// Stops every worker.
    pub async fn shutdown(&self) -> Result<()> {
        let entries: Vec<_> = self.matches.write().await.drain().map(|(_, e)| e).collect();
        for entry in entries {
            Self::stop(entry).await?;
        }
        Ok(())
    }

    async fn stop(entry: MatchEntry) -> Result<()> {
        // A worker that already exited has nothing left to stop.
        let _ = entry.handle.shutdown().await;
        drop(entry.handle);
        entry.worker.await.map_err(RuntimeError::WorkerJoin)
    }

    /// Routes a wire request to its match.
    pub async fn dispatch(&self, request: Request) -> Result<Reply> {
        let handle = self.get(request.match_id()).await?;
        let reply = match request {
            Request::StartMatch { .. } => Reply::Started {
                player: handle.start().await?,
            },
            Request::RequestMove {
                from_tile_id,
                to_tile_id,
                ..
            } => Reply::Moved(handle.request_move(from_tile_id, to_tile_id).await?),
            Request::RequestCombat {
                attacker_name,
                defender_name,
                ..
            } => {
                handle.request_combat(&attacker_name, &defender_name).await?;
                Reply::Done
            }
            Request::RequestAttack { actor_name, .. } => {
                Reply::Attacked(handle.request_attack(&actor_name).await?)
            }
            Request::RequestEscape { actor_name, .. } => {
                Reply::Escaped(handle.request_escape(&actor_name).await?)
            }
            Request::ToggleDoor {
                actor_name,
                tile_id,
                ..
            } => Reply::DoorToggled(handle.toggle_door(&actor_name, tile_id).await?),
            Request::EndTurn { .. } => {
                handle.end_turn().await?;
                Reply::Done
            }
            Request::Abandon { player_name, .. } => {
                handle.abandon(&player_name).await?;
                Reply::Done
            }
            Request::SetDebugMode { enabled, .. } => {
                handle.set_debug_mode(enabled).await?;
                Reply::Done
            }
        };
        Ok(reply)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
