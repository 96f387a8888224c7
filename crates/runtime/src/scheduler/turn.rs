use std::time::Duration;

use tracing::{debug, info, trace};

use game_core::TurnPhase;

use super::MatchContext;
use crate::api::Result;
use crate::events::TurnEvent;
use crate::timer::{TimerFired, TimerKind, TimerSignal, TimerSlot};

/// Drives `Idle → ActiveTurn → Transition → ActiveTurn → …`.
///
/// The countdown and the transition delay never overlap, so they share one
/// slot: entering either phase cancels whatever was running.
#[derive(Debug, Default)]
pub struct TurnScheduler {
    timer: TimerSlot,
}

impl TurnScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands the turn to the next active player and starts their countdown.
    pub fn start_turn(&mut self, ctx: &mut MatchContext) -> Result<String> {
        let player = ctx.turns.begin_turn(&mut ctx.state, &ctx.config)?;
        let seconds = ctx.config.turn_duration_secs;
        info!(match_id = %ctx.match_id, %player, seconds, "turn started");

        ctx.publish(TurnEvent::TurnStarted {
            match_id: ctx.match_id.clone(),
            player: player.clone(),
            turn_duration_seconds: seconds,
        });
        self.timer
            .replace(ctx.timers.countdown(TimerKind::TurnCountdown, seconds));
        Ok(player)
    }

    /// Closes the running turn and schedules the next one.
    pub fn end_turn(&mut self, ctx: &mut MatchContext) -> Result<()> {
        ctx.turns.end_turn()?;
        self.begin_transition(ctx);
        Ok(())
    }

    /// Starts the gap before the next turn. The session must already be in
    /// its transition phase.
    pub fn begin_transition(&mut self, ctx: &mut MatchContext) {
        let seconds = ctx.config.transition_delay_secs;
        let next_player = ctx.turns.peek_next_player().map(str::to_owned);
        debug!(match_id = %ctx.match_id, ?next_player, seconds, "transition started");

        self.timer.replace(
            ctx.timers
                .delay(TimerKind::Transition, Duration::from_secs(u64::from(seconds))),
        );
        ctx.publish(TurnEvent::TransitionStarted {
            match_id: ctx.match_id.clone(),
            next_player,
            seconds_until_start: seconds,
        });
    }

    /// Freezes the countdown, keeping the seconds left.
    pub fn pause(&mut self, ctx: &mut MatchContext) {
        self.timer.clear();
        ctx.turns.pause();
        debug!(
            match_id = %ctx.match_id,
            seconds_left = ctx.turns.time_remaining(),
            "turn countdown paused"
        );
    }

    /// Restarts a paused countdown from where it stopped.
    pub fn resume(&mut self, ctx: &mut MatchContext) -> Result<()> {
        ctx.turns.resume();
        if ctx.turns.phase() != TurnPhase::ActiveTurn {
            return Ok(());
        }
        let seconds = ctx.turns.time_remaining();
        if seconds == 0 {
            return self.end_turn(ctx);
        }
        debug!(match_id = %ctx.match_id, seconds_left = seconds, "turn countdown resumed");
        self.timer
            .replace(ctx.timers.countdown(TimerKind::TurnCountdown, seconds));
        Ok(())
    }

    pub fn cancel(&mut self) {
        self.timer.clear();
    }

    pub fn on_timer(&mut self, ctx: &mut MatchContext, fired: TimerFired) -> Result<()> {
        match (fired.kind, fired.signal) {
            (TimerKind::TurnCountdown, TimerSignal::Tick { seconds_left })
                if self.timer.is_current(fired.id) =>
            {
                ctx.turns.set_time_remaining(seconds_left);
                ctx.publish(TurnEvent::TurnTimerTick {
                    match_id: ctx.match_id.clone(),
                    seconds_left,
                });
                Ok(())
            }
            (TimerKind::TurnCountdown, TimerSignal::Expired)
                if self.timer.take_if_current(fired.id) =>
            {
                ctx.turns.set_time_remaining(0);
                info!(
                    match_id = %ctx.match_id,
                    player = ?ctx.turns.current_player(),
                    "turn timed out"
                );
                self.end_turn(ctx)
            }
            (TimerKind::Transition, TimerSignal::Expired)
                if self.timer.take_if_current(fired.id) =>
            {
                self.start_turn(ctx).map(drop)
            }
            _ => {
                trace!(match_id = %ctx.match_id, ?fired, "dropping stale turn timer");
                Ok(())
            }
        }
    }
}
