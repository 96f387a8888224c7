use std::collections::BTreeMap;

use super::CombatError;
use crate::config::GameConfig;
use crate::state::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatPhase {
    NotStarted,
    AttackerTurn,
    DefenderTurn,
    Resolved,
}

/// State of one fight. Timers live in the runtime; this only tracks turns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatSession {
    attacker: String,
    defender: String,
    current_fighter: String,
    remaining_escape_attempts: BTreeMap<String, u32>,
    phase: CombatPhase,
    winner: Option<String>,
    has_evaded: bool,
    is_debug_mode: bool,
    /// Set by any explicit action during the current combat turn.
    pub player_performed_action: bool,
}

impl CombatSession {
    /// A session that has not picked its opener yet.
    pub fn new(attacker: &str, defender: &str, max_escape_attempts: u32) -> Self {
        Self {
            attacker: attacker.to_owned(),
            defender: defender.to_owned(),
            current_fighter: attacker.to_owned(),
            remaining_escape_attempts: BTreeMap::from([
                (attacker.to_owned(), max_escape_attempts),
                (defender.to_owned(), max_escape_attempts),
            ]),
            phase: CombatPhase::NotStarted,
            winner: None,
            has_evaded: false,
            is_debug_mode: false,
            player_performed_action: false,
        }
    }

    /// Starts a fight initiated by `attacker`.
    ///
    /// The two must be orthogonally adjacent and the attacker pays one action
    /// point. The faster player opens; ties favour the attacker. Both players'
    /// combat counters go up.
    pub fn engage(
        state: &mut GameState,
        attacker: &str,
        defender: &str,
        config: &GameConfig,
    ) -> Result<Self, CombatError> {
        if attacker == defender {
            return Err(CombatError::SelfCombat);
        }
        let (Some(a), Some(d)) = (state.player(attacker), state.player(defender)) else {
            let missing = if state.player(attacker).is_none() {
                attacker
            } else {
                defender
            };
            return Err(CombatError::UnknownPlayer(missing.to_owned()));
        };
        let (attacker_speed, defender_speed) = (a.speed, d.speed);
        if a.action_points == 0 {
            return Err(CombatError::NoActionPoints(attacker.to_owned()));
        }

        let adjacent = match (state.position_of(attacker), state.position_of(defender)) {
            (Some(from), Some(to)) => from.is_adjacent(to),
            _ => false,
        };
        if !adjacent {
            return Err(CombatError::NotAdjacent {
                attacker: attacker.to_owned(),
                defender: defender.to_owned(),
            });
        }

        let (a, d) = state
            .pair_mut(attacker, defender)
            .ok_or_else(|| CombatError::UnknownPlayer(defender.to_owned()))?;
        a.spend_action();
        a.combats += 1;
        d.combats += 1;

        let mut session = Self::new(attacker, defender, config.max_escape_attempts);
        let opener = if defender_speed > attacker_speed {
            defender
        } else {
            attacker
        };
        session.begin(opener);
        Ok(session)
    }

    pub fn with_debug_mode(mut self, enabled: bool) -> Self {
        self.is_debug_mode = enabled;
        self
    }

    /// Toggles debug rolls on a fight already in progress.
    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.is_debug_mode = enabled;
    }

    fn begin(&mut self, opener: &str) {
        self.current_fighter = opener.to_owned();
        self.phase = self.phase_for(opener);
    }

    fn phase_for(&self, fighter: &str) -> CombatPhase {
        if fighter == self.attacker {
            CombatPhase::AttackerTurn
        } else {
            CombatPhase::DefenderTurn
        }
    }

    pub fn attacker(&self) -> &str {
        &self.attacker
    }

    pub fn defender(&self) -> &str {
        &self.defender
    }

    pub fn current_fighter(&self) -> &str {
        &self.current_fighter
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    pub fn has_evaded(&self) -> bool {
        self.has_evaded
    }

    pub fn is_debug_mode(&self) -> bool {
        self.is_debug_mode
    }

    pub fn is_resolved(&self) -> bool {
        self.phase == CombatPhase::Resolved
    }

    pub fn involves(&self, name: &str) -> bool {
        self.attacker == name || self.defender == name
    }

    /// The other side of the fight, if `name` is a combatant.
    pub fn opponent_of(&self, name: &str) -> Option<&str> {
        if name == self.attacker {
            Some(&self.defender)
        } else if name == self.defender {
            Some(&self.attacker)
        } else {
            None
        }
    }

    pub fn escape_attempts_left(&self, name: &str) -> u32 {
        self.remaining_escape_attempts.get(name).copied().unwrap_or(0)
    }

    /// Hands the combat turn to the other fighter.
    pub fn pass_turn(&mut self) {
        if self.is_resolved() {
            return;
        }
        let next = if self.current_fighter == self.attacker {
            self.defender.clone()
        } else {
            self.attacker.clone()
        };
        self.begin(&next);
    }

    /// Rejects actions from anyone but the current fighter of a live fight.
    pub(super) fn ensure_turn(&self, actor: &str) -> Result<(), CombatError> {
        if self.is_resolved() {
            return Err(CombatError::AlreadyResolved);
        }
        if !self.involves(actor) {
            return Err(CombatError::NotACombatant(actor.to_owned()));
        }
        if actor != self.current_fighter {
            return Err(CombatError::NotCurrentFighter {
                actor: actor.to_owned(),
                expected: self.current_fighter.clone(),
            });
        }
        Ok(())
    }

    /// Spends one escape attempt. Returns what is left.
    pub(super) fn consume_escape(&mut self, actor: &str) -> Result<u32, CombatError> {
        let left = self
            .remaining_escape_attempts
            .get_mut(actor)
            .ok_or_else(|| CombatError::NotACombatant(actor.to_owned()))?;
        if *left == 0 {
            return Err(CombatError::EscapeExhausted(actor.to_owned()));
        }
        *left -= 1;
        Ok(*left)
    }

    pub(super) fn resolve(&mut self, winner: Option<&str>, evaded: bool) {
        self.phase = CombatPhase::Resolved;
        self.winner = winner.map(str::to_owned);
        self.has_evaded = evaded;
    }
}
