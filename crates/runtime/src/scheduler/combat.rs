use std::time::Duration;

use tracing::{debug, info, trace};

use game_core::{AttackOutcome, EscapeOutcome, attempt_escape, perform_attack};

use super::MatchContext;
use crate::api::{Result, RuntimeError};
use crate::events::{BoardEvent, CombatEvent};
use crate::timer::{TimerFired, TimerKind, TimerSignal, TimerSlot};

/// How a finished fight came out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatSummary {
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub has_evaded: bool,
}

/// Times each fighter's combat turn and attacks for them when they stall.
///
/// Every explicit action clears both timers before it resolves, and the
/// worker drops any firing whose id no longer matches a slot, so a forced
/// attack can never follow an action taken in the same combat turn.
#[derive(Debug, Default)]
pub struct CombatTurnScheduler {
    tick: TimerSlot,
    expiry: TimerSlot,
}

impl CombatTurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the current fighter's combat turn.
    pub fn start(&mut self, ctx: &mut MatchContext) -> Result<()> {
        let session = ctx.combat.as_mut().ok_or(RuntimeError::NoActiveCombat)?;
        session.player_performed_action = false;
        let fighter = session.current_fighter().to_owned();
        let escape_attempts_left = session.escape_attempts_left(&fighter);
        let seconds = ctx.config.combat_turn_secs_for(escape_attempts_left);
        debug!(match_id = %ctx.match_id, %fighter, seconds, "combat turn started");

        ctx.publish(CombatEvent::CombatTurnStarted {
            match_id: ctx.match_id.clone(),
            fighter,
            duration_seconds: seconds,
            escape_attempts_left,
        });
        self.tick
            .replace(ctx.timers.countdown(TimerKind::CombatTick, seconds));
        let deadline = Duration::from_secs(u64::from(seconds)) + ctx.config.auto_attack_delay();
        self.expiry
            .replace(ctx.timers.delay(TimerKind::CombatExpiry, deadline));
        Ok(())
    }

    /// `actor` attacks. Starts the next combat turn unless the fight is over.
    pub fn attack(&mut self, ctx: &mut MatchContext, actor: &str) -> Result<AttackOutcome> {
        let session = ctx.combat.as_mut().ok_or(RuntimeError::NoActiveCombat)?;
        let outcome = perform_attack(
            &mut ctx.state,
            session,
            actor,
            ctx.rng.as_mut(),
            &ctx.config,
        )?;
        session.player_performed_action = true;
        self.cancel();

        ctx.publish(CombatEvent::AttackResult {
            match_id: ctx.match_id.clone(),
            attacker: outcome.attacker.clone(),
            defender: outcome.defender.clone(),
            success: outcome.success,
            attack_score: outcome.attack_score,
            defense_score: outcome.defense_score,
            damage: outcome.damage,
            defender_hp: outcome.defender_hp,
        });
        if let Some(defeat) = &outcome.defeat {
            info!(
                match_id = %ctx.match_id,
                winner = %defeat.winner,
                loser = %defeat.loser,
                "player defeated"
            );
            ctx.publish(BoardEvent::PlayerRespawned {
                match_id: ctx.match_id.clone(),
                player: defeat.loser.clone(),
                tile_id: defeat.respawn,
            });
        } else {
            self.start(ctx)?;
        }
        Ok(outcome)
    }

    /// `actor` tries to flee. Starts the next combat turn if they failed.
    pub fn escape(&mut self, ctx: &mut MatchContext, actor: &str) -> Result<EscapeOutcome> {
        let session = ctx.combat.as_mut().ok_or(RuntimeError::NoActiveCombat)?;
        let outcome = attempt_escape(
            &mut ctx.state,
            session,
            actor,
            ctx.rng.as_mut(),
            &ctx.config,
        )?;
        session.player_performed_action = true;
        self.cancel();

        ctx.publish(CombatEvent::EscapeResult {
            match_id: ctx.match_id.clone(),
            player: outcome.actor.clone(),
            attempts_left: outcome.attempts_left,
            succeeded: outcome.succeeded,
        });
        if outcome.succeeded {
            info!(match_id = %ctx.match_id, player = %outcome.actor, "player escaped");
        } else {
            self.start(ctx)?;
        }
        Ok(outcome)
    }

    /// Tears the fight down and reports how it ended.
    pub fn end(&mut self, ctx: &mut MatchContext) -> Result<CombatSummary> {
        self.cancel();
        let session = ctx.combat.take().ok_or(RuntimeError::CombatNotStarted)?;
        let winner = session.winner().map(str::to_owned);
        let loser = winner
            .as_deref()
            .and_then(|winner| session.opponent_of(winner))
            .map(str::to_owned);
        let has_evaded = session.has_evaded();
        info!(match_id = %ctx.match_id, ?winner, has_evaded, "combat ended");

        ctx.publish(CombatEvent::CombatEnded {
            match_id: ctx.match_id.clone(),
            winner: winner.clone(),
            has_evaded,
        });
        Ok(CombatSummary {
            winner,
            loser,
            has_evaded,
        })
    }

    pub fn cancel(&mut self) {
        self.tick.clear();
        self.expiry.clear();
    }

    /// Returns the outcome of a forced attack when the deadline passed.
    pub fn on_timer(
        &mut self,
        ctx: &mut MatchContext,
        fired: TimerFired,
    ) -> Result<Option<AttackOutcome>> {
        match (fired.kind, fired.signal) {
            (TimerKind::CombatTick, TimerSignal::Tick { seconds_left })
                if self.tick.is_current(fired.id) =>
            {
                ctx.publish(CombatEvent::CombatTimerTick {
                    match_id: ctx.match_id.clone(),
                    seconds_left,
                });
                Ok(None)
            }
            (TimerKind::CombatTick, TimerSignal::Expired) if self.tick.take_if_current(fired.id) => {
                Ok(None)
            }
            (TimerKind::CombatExpiry, TimerSignal::Expired)
                if self.expiry.take_if_current(fired.id) =>
            {
                let Some(session) = ctx.combat.as_ref() else {
                    return Ok(None);
                };
                if session.player_performed_action {
                    return Ok(None);
                }
                let fighter = session.current_fighter().to_owned();
                info!(match_id = %ctx.match_id, %fighter, "combat turn expired, attacking automatically");
                self.attack(ctx, &fighter).map(Some)
            }
            _ => {
                trace!(match_id = %ctx.match_id, ?fired, "dropping stale combat timer");
                Ok(None)
            }
        }
    }
}
