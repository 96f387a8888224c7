//! Match worker that owns the authoritative state of one match.
//!
//! Receives commands from [`MatchHandle`](crate::api::MatchHandle) and timer
//! firings from its own schedulers, and processes both strictly one at a
//! time. Nothing else ever touches the match's [`GameState`].

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use game_core::{
    AttackOutcome, CombatSession, DoorOutcome, EscapeOutcome, GameError, GameState, MoveError,
    MoveOutcome, TileId, TurnSession, resolve_move, toggle_door,
};

use crate::api::{Result, RuntimeError};
use crate::events::{BoardEvent, CombatEvent, MatchEvent};
use crate::scheduler::{CombatTurnScheduler, MatchContext, TurnScheduler};
use crate::timer::{TimerFired, TimerKind};

/// Read-only copy of a match, for queries and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchView {
    pub match_id: String,
    pub state: GameState,
    pub turns: TurnSession,
    pub combat: Option<CombatSession>,
    pub finished: bool,
}

/// Commands that can be sent to a match worker
pub enum Command {
    StartMatch {
        reply: oneshot::Sender<Result<String>>,
    },
    /// Move whoever stands on `from` to `to`.
    Move {
        from: TileId,
        to: TileId,
        reply: oneshot::Sender<Result<MoveOutcome>>,
    },
    Engage {
        attacker: String,
        defender: String,
        reply: oneshot::Sender<Result<()>>,
    },
    Attack {
        actor: String,
        reply: oneshot::Sender<Result<AttackOutcome>>,
    },
    Escape {
        actor: String,
        reply: oneshot::Sender<Result<EscapeOutcome>>,
    },
    ToggleDoor {
        actor: String,
        tile: TileId,
        reply: oneshot::Sender<Result<DoorOutcome>>,
    },
    EndTurn {
        reply: oneshot::Sender<Result<()>>,
    },
    Abandon {
        player: String,
        reply: oneshot::Sender<Result<()>>,
    },
    SetDebugMode {
        enabled: bool,
        reply: oneshot::Sender<()>,
    },
    Query {
        reply: oneshot::Sender<MatchView>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::StartMatch { .. } => "StartMatch",
            Command::Move { .. } => "Move",
            Command::Engage { .. } => "Engage",
            Command::Attack { .. } => "Attack",
            Command::Escape { .. } => "Escape",
            Command::ToggleDoor { .. } => "ToggleDoor",
            Command::EndTurn { .. } => "EndTurn",
            Command::Abandon { .. } => "Abandon",
            Command::SetDebugMode { .. } => "SetDebugMode",
            Command::Query { .. } => "Query",
            Command::Shutdown { .. } => "Shutdown",
        }
    }
}

/// Background task that runs one match.
pub struct MatchWorker {
    ctx: MatchContext,
    turn: TurnScheduler,
    combat: CombatTurnScheduler,
    command_rx: mpsc::Receiver<Command>,
    timer_rx: mpsc::UnboundedReceiver<TimerFired>,
}

impl MatchWorker {
    pub fn new(
        ctx: MatchContext,
        command_rx: mpsc::Receiver<Command>,
        timer_rx: mpsc::UnboundedReceiver<TimerFired>,
    ) -> Self {
        info!(
            match_id = %ctx.match_id,
            players = ctx.state.players().len(),
            "match worker initialized"
        );
        Self {
            ctx,
            turn: TurnScheduler::new(),
            combat: CombatTurnScheduler::new(),
            command_rx,
            timer_rx,
        }
    }

    /// Main worker loop. Exits when every handle is gone or on shutdown.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown { reply }) => {
                        self.turn.cancel();
                        self.combat.cancel();
                        if reply.send(()).is_err() {
                            debug!("Shutdown reply channel closed (caller dropped)");
                        }
                        break;
                    }
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Some(fired) = self.timer_rx.recv() => self.handle_timer(fired),
            }
        }
        info!(match_id = %self.ctx.match_id, "match worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        let name = cmd.name();
        match cmd {
            Command::StartMatch { reply } => {
                let result = self.start_match();
                self.reply(name, reply, result);
            }
            Command::Move { from, to, reply } => {
                let result = self.request_move(from, to);
                self.reply(name, reply, result);
            }
            Command::Engage {
                attacker,
                defender,
                reply,
            } => {
                let result = self.request_combat(&attacker, &defender);
                self.reply(name, reply, result);
            }
            Command::Attack { actor, reply } => {
                let result = self.request_attack(&actor);
                self.reply(name, reply, result);
            }
            Command::Escape { actor, reply } => {
                let result = self.request_escape(&actor);
                self.reply(name, reply, result);
            }
            Command::ToggleDoor { actor, tile, reply } => {
                let result = self.request_toggle_door(&actor, tile);
                self.reply(name, reply, result);
            }
            Command::EndTurn { reply } => {
                let result = self.request_end_turn();
                self.reply(name, reply, result);
            }
            Command::Abandon { player, reply } => {
                let result = self.abandon(&player);
                self.reply(name, reply, result);
            }
            Command::SetDebugMode { enabled, reply } => {
                self.set_debug_mode(enabled);
                if reply.send(()).is_err() {
                    debug!("SetDebugMode reply channel closed (caller dropped)");
                }
            }
            Command::Query { reply } => {
                if reply.send(self.view()).is_err() {
                    debug!("Query reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown { reply } => {
                // Handled in the loop; a late duplicate is simply acknowledged.
                let _ = reply.send(());
            }
        }
    }

    /// Logs a rejection and hands the result back to the caller.
    fn reply<T>(&self, name: &str, reply: oneshot::Sender<Result<T>>, result: Result<T>) {
        if let Err(err) = &result {
            let match_id = &self.ctx.match_id;
            if err.severity().is_internal() {
                error!(%match_id, command = name, code = err.error_code(), "{err}");
            } else {
                warn!(%match_id, command = name, code = err.error_code(), "request rejected: {err}");
            }
        }
        if reply.send(result).is_err() {
            debug!("{name} reply channel closed (caller dropped)");
        }
    }

    fn handle_timer(&mut self, fired: TimerFired) {
        if self.ctx.finished {
            tracing::trace!(match_id = %self.ctx.match_id, ?fired, "match over, dropping timer");
            return;
        }
        let result = match fired.kind {
            TimerKind::TurnCountdown | TimerKind::Transition => {
                self.turn.on_timer(&mut self.ctx, fired)
            }
            TimerKind::CombatTick | TimerKind::CombatExpiry => {
                match self.combat.on_timer(&mut self.ctx, fired) {
                    Ok(Some(outcome)) if outcome.ends_combat() => self.finish_combat(),
                    Ok(_) => Ok(()),
                    Err(err) => Err(err),
                }
            }
        };
        if let Err(err) = result {
            error!(match_id = %self.ctx.match_id, ?fired, code = err.error_code(), "timer handling failed: {err}");
        }
    }

    fn view(&self) -> MatchView {
        MatchView {
            match_id: self.ctx.match_id.clone(),
            state: self.ctx.state.clone(),
            turns: self.ctx.turns.clone(),
            combat: self.ctx.combat.clone(),
            finished: self.ctx.finished,
        }
    }

    fn ensure_playing(&self) -> Result<()> {
        if self.ctx.finished {
            return Err(RuntimeError::MatchFinished);
        }
        Ok(())
    }

    fn ensure_no_combat(&self) -> Result<()> {
        if self.ctx.combat.is_some() {
            return Err(RuntimeError::CombatInProgress);
        }
        Ok(())
    }

    fn start_match(&mut self) -> Result<String> {
        self.ensure_playing()?;
        if self.ctx.turns.phase() != game_core::TurnPhase::Idle {
            return Err(RuntimeError::AlreadyStarted);
        }
        info!(match_id = %self.ctx.match_id, "match started");
        self.turn.start_turn(&mut self.ctx)
    }

    fn request_move(&mut self, from: TileId, to: TileId) -> Result<MoveOutcome> {
        self.ensure_playing()?;
        self.ensure_no_combat()?;
        let grid = self.ctx.state.grid();
        if !grid.contains(from) {
            return Err(MoveError::UnknownTile(from).into());
        }
        let actor = grid
            .occupant(from)
            .map(str::to_owned)
            .ok_or(RuntimeError::EmptyTile(from))?;
        self.ctx.turns.ensure_turn(&actor)?;

        let outcome = resolve_move(
            &mut self.ctx.state,
            &actor,
            from,
            to,
            &self.ctx.config.movement_costs,
        )?;
        debug!(
            match_id = %self.ctx.match_id,
            player = %actor,
            %from,
            %to,
            cost = outcome.cost,
            "player moved"
        );
        self.ctx.publish(BoardEvent::PlayerMoved {
            match_id: self.ctx.match_id.clone(),
            player: actor,
            path: outcome.path.clone(),
            movement_points_left: outcome.movement_points_left,
        });
        Ok(outcome)
    }

    fn request_combat(&mut self, attacker: &str, defender: &str) -> Result<()> {
        self.ensure_playing()?;
        self.ensure_no_combat()?;
        self.ctx.turns.ensure_turn(attacker)?;

        let session = CombatSession::engage(&mut self.ctx.state, attacker, defender, &self.ctx.config)?
            .with_debug_mode(self.ctx.debug_mode);
        self.ctx.combat = Some(session);
        self.turn.pause(&mut self.ctx);

        info!(match_id = %self.ctx.match_id, %attacker, %defender, "combat started");
        self.ctx.publish(CombatEvent::CombatStarted {
            match_id: self.ctx.match_id.clone(),
            attacker: attacker.to_owned(),
            defender: defender.to_owned(),
        });
        self.combat.start(&mut self.ctx)
    }

    fn request_attack(&mut self, actor: &str) -> Result<AttackOutcome> {
        self.ensure_playing()?;
        let outcome = self.combat.attack(&mut self.ctx, actor)?;
        if outcome.ends_combat() {
            self.finish_combat()?;
        }
        Ok(outcome)
    }

    fn request_escape(&mut self, actor: &str) -> Result<EscapeOutcome> {
        self.ensure_playing()?;
        let outcome = self.combat.escape(&mut self.ctx, actor)?;
        if outcome.succeeded {
            self.finish_combat()?;
        }
        Ok(outcome)
    }

    fn request_toggle_door(&mut self, actor: &str, tile: TileId) -> Result<DoorOutcome> {
        self.ensure_playing()?;
        self.ensure_no_combat()?;
        self.ctx.turns.ensure_turn(actor)?;

        let outcome = toggle_door(&mut self.ctx.state, actor, tile)?;
        debug!(match_id = %self.ctx.match_id, player = %actor, %tile, is_open = outcome.is_open, "door toggled");
        self.ctx.publish(BoardEvent::DoorToggled {
            match_id: self.ctx.match_id.clone(),
            tile_id: outcome.tile,
            is_open: outcome.is_open,
        });
        Ok(outcome)
    }

    fn request_end_turn(&mut self) -> Result<()> {
        self.ensure_playing()?;
        self.ensure_no_combat()?;
        self.turn.end_turn(&mut self.ctx)
    }

    /// Wraps up a resolved fight and decides how the turn continues.
    fn finish_combat(&mut self) -> Result<()> {
        let summary = self.combat.end(&mut self.ctx)?;

        if let Some(winner) = summary.winner.as_deref() {
            let wins = self.ctx.state.player(winner).map_or(0, |player| player.wins);
            if wins >= self.ctx.config.wins_to_victory {
                self.end_match(Some(winner.to_owned()));
                return Ok(());
            }
        }

        let turn_player_lost = summary.loser.is_some()
            && summary.loser.as_deref() == self.ctx.turns.current_player();
        if turn_player_lost {
            self.turn.end_turn(&mut self.ctx)
        } else {
            self.turn.resume(&mut self.ctx)
        }
    }

    fn abandon(&mut self, player: &str) -> Result<()> {
        self.ensure_playing()?;
        let was_current = self.ctx.turns.abandon(player)?;
        self.ctx.state.remove_from_board(player);
        info!(match_id = %self.ctx.match_id, %player, "player abandoned");
        self.ctx.publish(MatchEvent::PlayerAbandoned {
            match_id: self.ctx.match_id.clone(),
            player: player.to_owned(),
        });

        let mut combat_ended = false;
        if let Some(session) = self.ctx.combat.as_mut()
            && session.involves(player)
        {
            game_core::abandon(&mut self.ctx.state, session, player)?;
            self.combat.end(&mut self.ctx)?;
            combat_ended = true;
        }

        if self.ctx.turns.active_count() < GameState::MIN_PLAYERS {
            let last = self.ctx.turns.active_players().next().map(str::to_owned);
            self.end_match(last);
        } else if was_current {
            self.turn.begin_transition(&mut self.ctx);
        } else if combat_ended {
            self.turn.resume(&mut self.ctx)?;
        }
        Ok(())
    }

    fn set_debug_mode(&mut self, enabled: bool) {
        info!(match_id = %self.ctx.match_id, enabled, "debug mode changed");
        self.ctx.debug_mode = enabled;
        if let Some(session) = self.ctx.combat.as_mut() {
            session.set_debug_mode(enabled);
        }
    }

    /// Stops every timer and announces the result. The worker keeps
    /// answering queries afterwards.
    fn end_match(&mut self, winner: Option<String>) {
        self.ctx.finished = true;
        self.ctx.turns.finish();
        self.ctx.combat = None;
        self.turn.cancel();
        self.combat.cancel();

        info!(match_id = %self.ctx.match_id, ?winner, "match ended");
        self.ctx.publish(MatchEvent::MatchEnded {
            match_id: self.ctx.match_id.clone(),
            winner,
        });
    }
}
