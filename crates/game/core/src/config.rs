use core::time::Duration;

use crate::grid::MovementCostTable;

/// Tunable rules of a match.
///
/// Every field has a default, so a partial TOML file only overrides what it
/// names.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Length of a regular turn.
    pub turn_duration_secs: u32,
    /// Pause between one player's turn and the next.
    pub transition_delay_secs: u32,
    /// Combat turn length while the fighter can still escape.
    pub combat_turn_secs: u32,
    /// Combat turn length once the fighter is out of escape attempts.
    pub combat_turn_no_escape_secs: u32,
    /// Extra grace before a forced attack fires.
    pub auto_attack_delay_ms: u64,
    /// Percent chance, `0..=100`, that an escape attempt succeeds.
    pub escape_chance_percent: u32,
    pub max_escape_attempts: u32,
    pub default_action_points: u32,
    /// Subtracted from attack and defense rolls made while standing on ice.
    pub ice_penalty: i32,
    pub wins_to_victory: u32,
    /// Defender's die result when debug mode is on.
    pub debug_defense_roll: u32,
    pub movement_costs: MovementCostTable,
}

impl GameConfig {
    pub const DEFAULT_TURN_DURATION_SECS: u32 = 30;
    pub const DEFAULT_TRANSITION_DELAY_SECS: u32 = 3;
    pub const DEFAULT_COMBAT_TURN_SECS: u32 = 5;
    pub const DEFAULT_COMBAT_TURN_NO_ESCAPE_SECS: u32 = 3;
    pub const DEFAULT_AUTO_ATTACK_DELAY_MS: u64 = 0;
    pub const DEFAULT_ESCAPE_CHANCE_PERCENT: u32 = 30;
    pub const DEFAULT_MAX_ESCAPE_ATTEMPTS: u32 = 2;
    pub const DEFAULT_ACTION_POINTS: u32 = 1;
    pub const DEFAULT_ICE_PENALTY: i32 = 2;
    pub const DEFAULT_WINS_TO_VICTORY: u32 = 3;
    pub const DEFAULT_DEBUG_DEFENSE_ROLL: u32 = 1;

    pub fn new() -> Self {
        Self {
            turn_duration_secs: Self::DEFAULT_TURN_DURATION_SECS,
            transition_delay_secs: Self::DEFAULT_TRANSITION_DELAY_SECS,
            combat_turn_secs: Self::DEFAULT_COMBAT_TURN_SECS,
            combat_turn_no_escape_secs: Self::DEFAULT_COMBAT_TURN_NO_ESCAPE_SECS,
            auto_attack_delay_ms: Self::DEFAULT_AUTO_ATTACK_DELAY_MS,
            escape_chance_percent: Self::DEFAULT_ESCAPE_CHANCE_PERCENT,
            max_escape_attempts: Self::DEFAULT_MAX_ESCAPE_ATTEMPTS,
            default_action_points: Self::DEFAULT_ACTION_POINTS,
            ice_penalty: Self::DEFAULT_ICE_PENALTY,
            wins_to_victory: Self::DEFAULT_WINS_TO_VICTORY,
            debug_defense_roll: Self::DEFAULT_DEBUG_DEFENSE_ROLL,
            movement_costs: MovementCostTable::default(),
        }
    }

    /// Combat turn length for a fighter with `escapes_left` attempts.
    pub fn combat_turn_secs_for(&self, escapes_left: u32) -> u32 {
        if escapes_left > 0 {
            self.combat_turn_secs
        } else {
            self.combat_turn_no_escape_secs
        }
    }

    pub fn auto_attack_delay(&self) -> Duration {
        Duration::from_millis(self.auto_attack_delay_ms)
    }

    pub fn with_escape_chance(mut self, percent: u32) -> Self {
        self.escape_chance_percent = percent.min(100);
        self
    }

    pub fn with_max_escape_attempts(mut self, attempts: u32) -> Self {
        self.max_escape_attempts = attempts;
        self
    }

    pub fn with_turn_duration(mut self, secs: u32) -> Self {
        self.turn_duration_secs = secs;
        self
    }

    pub fn with_movement_costs(mut self, costs: MovementCostTable) -> Self {
        self.movement_costs = costs;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combat_turn_shortens_without_escapes() {
        let config = GameConfig::default();
        assert_eq!(config.combat_turn_secs_for(2), 5);
        assert_eq!(config.combat_turn_secs_for(0), 3);
    }

    #[test]
    fn escape_chance_is_clamped() {
        assert_eq!(GameConfig::new().with_escape_chance(250).escape_chance_percent, 100);
    }
}
