use game_core::{CombatSession, GameConfig, GameState, RngOracle, TurnSession};

use crate::events::{Event, EventBus};
use crate::timer::Scheduler;

/// Everything a match worker owns exclusively.
pub struct MatchContext {
    pub match_id: String,
    pub config: GameConfig,
    pub state: GameState,
    pub turns: TurnSession,
    pub combat: Option<CombatSession>,
    pub rng: Box<dyn RngOracle>,
    pub debug_mode: bool,
    pub finished: bool,
    pub timers: Scheduler,
    events: EventBus,
}

impl MatchContext {
    pub fn new(
        match_id: String,
        config: GameConfig,
        state: GameState,
        rng: Box<dyn RngOracle>,
        timers: Scheduler,
        events: EventBus,
    ) -> Self {
        let turns = TurnSession::from_state(&state);
        Self {
            match_id,
            config,
            state,
            turns,
            combat: None,
            rng,
            debug_mode: false,
            finished: false,
            timers,
            events,
        }
    }

    pub fn publish(&self, event: impl Into<Event>) {
        self.events.publish(event);
    }
}
