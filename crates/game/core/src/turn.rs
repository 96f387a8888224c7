//! Round-robin turn bookkeeping.
//!
//! [`TurnSession`] knows the seating order, whose turn it is and which phase
//! the match is in. It holds no timers: the runtime drives the countdown and
//! calls [`TurnSession::begin_turn`] / [`TurnSession::end_turn`] on expiry.

use std::collections::BTreeSet;

use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    Idle,
    ActiveTurn,
    Transition,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("unknown player `{0}`")]
    UnknownPlayer(String),

    #[error("it is not `{actor}`'s turn")]
    NotYourTurn { actor: String, current: Option<String> },

    #[error("no turn is in progress")]
    NoActiveTurn,

    #[error("no players left to take a turn")]
    NoActivePlayers,

    #[error("player `{0}` already left the match")]
    AlreadyAbandoned(String),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TurnError::NotYourTurn { .. } | TurnError::NoActiveTurn => ErrorSeverity::Validation,
            TurnError::UnknownPlayer(_) | TurnError::AlreadyAbandoned(_) => {
                ErrorSeverity::Validation
            }
            TurnError::NoActivePlayers => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TurnError::UnknownPlayer(_) => "TURN_UNKNOWN_PLAYER",
            TurnError::NotYourTurn { .. } => "TURN_NOT_YOUR_TURN",
            TurnError::NoActiveTurn => "TURN_NO_ACTIVE_TURN",
            TurnError::NoActivePlayers => "TURN_NO_ACTIVE_PLAYERS",
            TurnError::AlreadyAbandoned(_) => "TURN_ALREADY_ABANDONED",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnSession {
    ordered_players: Vec<String>,
    current_index: Option<usize>,
    abandoned: BTreeSet<String>,
    phase: TurnPhase,
    time_remaining: u32,
    paused: bool,
}

impl TurnSession {
    /// Players take turns in the given order.
    pub fn new(ordered_players: Vec<String>) -> Self {
        Self {
            ordered_players,
            current_index: None,
            abandoned: BTreeSet::new(),
            phase: TurnPhase::Idle,
            time_remaining: 0,
            paused: false,
        }
    }

    pub fn from_state(state: &GameState) -> Self {
        Self::new(state.players().iter().map(|p| p.name.clone()).collect())
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Player whose turn is running or just ended.
    pub fn current_player(&self) -> Option<&str> {
        let name = self.ordered_players.get(self.current_index?)?;
        (!self.abandoned.contains(name)).then_some(name.as_str())
    }

    pub fn is_current(&self, name: &str) -> bool {
        self.phase == TurnPhase::ActiveTurn && self.current_player() == Some(name)
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn set_time_remaining(&mut self, seconds: u32) {
        self.time_remaining = seconds;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_abandoned(&self, name: &str) -> bool {
        self.abandoned.contains(name)
    }

    pub fn active_players(&self) -> impl Iterator<Item = &str> {
        self.ordered_players
            .iter()
            .filter(|name| !self.abandoned.contains(*name))
            .map(String::as_str)
    }

    pub fn active_count(&self) -> usize {
        self.active_players().count()
    }

    fn next_index(&self) -> Option<usize> {
        let len = self.ordered_players.len();
        let start = self.current_index.map_or(0, |index| index + 1);
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&index| !self.abandoned.contains(&self.ordered_players[index]))
    }

    /// Who would play after the current player, skipping abandoned players.
    pub fn peek_next_player(&self) -> Option<&str> {
        self.next_index()
            .map(|index| self.ordered_players[index].as_str())
    }

    /// Hands the turn to the next active player and refills their budgets.
    pub fn begin_turn(
        &mut self,
        state: &mut GameState,
        config: &GameConfig,
    ) -> Result<String, TurnError> {
        let index = self.next_index().ok_or(TurnError::NoActivePlayers)?;
        let name = self.ordered_players[index].clone();
        state
            .player_mut(&name)
            .ok_or_else(|| TurnError::UnknownPlayer(name.clone()))?
            .refresh_turn(config.default_action_points);

        self.current_index = Some(index);
        self.phase = TurnPhase::ActiveTurn;
        self.time_remaining = config.turn_duration_secs;
        self.paused = false;
        Ok(name)
    }

    /// Closes the running turn and enters the transition phase.
    pub fn end_turn(&mut self) -> Result<(), TurnError> {
        if self.phase != TurnPhase::ActiveTurn {
            return Err(TurnError::NoActiveTurn);
        }
        self.phase = TurnPhase::Transition;
        self.time_remaining = 0;
        self.paused = false;
        Ok(())
    }

    /// Rejects requests from anyone but the player whose turn is running.
    pub fn ensure_turn(&self, actor: &str) -> Result<(), TurnError> {
        if self.phase != TurnPhase::ActiveTurn {
            return Err(TurnError::NoActiveTurn);
        }
        if self.current_player() != Some(actor) {
            return Err(TurnError::NotYourTurn {
                actor: actor.to_owned(),
                current: self.current_player().map(str::to_owned),
            });
        }
        Ok(())
    }

    /// Marks `name` as gone. They keep their seat but are skipped from now on.
    /// Returns whether it was their turn.
    pub fn abandon(&mut self, name: &str) -> Result<bool, TurnError> {
        if !self.ordered_players.iter().any(|p| p == name) {
            return Err(TurnError::UnknownPlayer(name.to_owned()));
        }
        let was_current = self.is_current(name);
        if !self.abandoned.insert(name.to_owned()) {
            return Err(TurnError::AlreadyAbandoned(name.to_owned()));
        }
        if was_current {
            self.phase = TurnPhase::Transition;
            self.time_remaining = 0;
            self.paused = false;
        }
        Ok(was_current)
    }

    /// Stops the rotation for good.
    pub fn finish(&mut self) {
        self.phase = TurnPhase::Idle;
        self.current_index = None;
        self.time_remaining = 0;
        self.paused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Grid, TerrainKind, TileId};
    use crate::player::Player;

    fn state() -> GameState {
        let mut grid = Grid::from_terrain(vec![vec![TerrainKind::Default; 3]]).unwrap();
        for (col, name) in ["alice", "bob", "carol"].into_iter().enumerate() {
            grid.place_occupant(TileId::new(0, col), name).unwrap();
        }
        let players = ["alice", "bob", "carol"]
            .into_iter()
            .enumerate()
            .map(|(col, name)| Player::new(name, TileId::new(0, col)).with_speed(col as u32 + 2))
            .collect();
        GameState::new(grid, players).unwrap()
    }

    #[test]
    fn rotates_round_robin() {
        let config = GameConfig::default();
        let mut state = state();
        let mut turns = TurnSession::from_state(&state);
        assert_eq!(turns.phase(), TurnPhase::Idle);
        assert_eq!(turns.peek_next_player(), Some("alice"));

        let mut order = Vec::new();
        for _ in 0..4 {
            order.push(turns.begin_turn(&mut state, &config).unwrap());
            turns.end_turn().unwrap();
        }
        assert_eq!(order, ["alice", "bob", "carol", "alice"]);
    }

    #[test]
    fn begin_turn_refreshes_budgets() {
        let config = GameConfig::default();
        let mut state = state();
        state.player_mut("alice").unwrap().movement_points = 0;
        state.player_mut("alice").unwrap().action_points = 0;

        let mut turns = TurnSession::from_state(&state);
        turns.begin_turn(&mut state, &config).unwrap();
        let alice = state.player("alice").unwrap();
        assert_eq!(alice.movement_points, alice.speed);
        assert_eq!(alice.action_points, 1);
        assert_eq!(turns.time_remaining(), 30);
    }

    #[test]
    fn requests_outside_the_active_turn_are_rejected() {
        let config = GameConfig::default();
        let mut state = state();
        let mut turns = TurnSession::from_state(&state);
        assert_eq!(turns.ensure_turn("alice"), Err(TurnError::NoActiveTurn));

        turns.begin_turn(&mut state, &config).unwrap();
        assert!(turns.ensure_turn("alice").is_ok());
        assert!(matches!(
            turns.ensure_turn("bob"),
            Err(TurnError::NotYourTurn { .. })
        ));

        turns.end_turn().unwrap();
        assert_eq!(turns.ensure_turn("alice"), Err(TurnError::NoActiveTurn));
        assert_eq!(turns.end_turn(), Err(TurnError::NoActiveTurn));
    }

    #[test]
    fn abandoned_players_are_skipped_but_keep_their_seat() {
        let config = GameConfig::default();
        let mut state = state();
        let mut turns = TurnSession::from_state(&state);

        turns.begin_turn(&mut state, &config).unwrap();
        assert!(!turns.abandon("bob").unwrap());
        assert_eq!(turns.peek_next_player(), Some("carol"));
        assert_eq!(turns.active_count(), 2);

        turns.end_turn().unwrap();
        assert_eq!(turns.begin_turn(&mut state, &config).unwrap(), "carol");
        assert!(turns.abandon("carol").unwrap());
        assert_eq!(turns.phase(), TurnPhase::Transition);
        assert_eq!(turns.current_player(), None);
        assert_eq!(turns.begin_turn(&mut state, &config).unwrap(), "alice");

        assert_eq!(
            turns.abandon("carol"),
            Err(TurnError::AlreadyAbandoned("carol".into()))
        );
        assert_eq!(turns.abandon("dave"), Err(TurnError::UnknownPlayer("dave".into())));
    }
}
