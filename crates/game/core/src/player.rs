//! Player statistics and per-turn budgets.

use crate::grid::TileId;

/// Bonus die added to attack and defense rolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Die {
    D4,
    D6,
}

impl Die {
    pub const fn sides(self) -> u32 {
        match self {
            Die::D4 => 4,
            Die::D6 => 6,
        }
    }
}

/// Hit points, kept within `0..=max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Clamps `current` to `max`.
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    pub const fn current(&self) -> u32 {
        self.current
    }

    pub const fn max(&self) -> u32 {
        self.max
    }

    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }

    pub const fn is_valid(&self) -> bool {
        self.current <= self.max
    }

    /// Applies damage, flooring at zero. Returns the remaining hit points.
    pub fn damage(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_sub(amount);
        self.current
    }

    pub fn restore(&mut self) {
        self.current = self.max;
    }
}

/// Flat value plus a bonus die.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CombatStat {
    pub value: i32,
    pub bonus_die: Die,
}

impl CombatStat {
    pub const fn new(value: i32, bonus_die: Die) -> Self {
        Self { value, bonus_die }
    }
}

/// A participant of a match.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Player {
    /// Unique within a match.
    pub name: String,
    pub hp: Health,
    pub speed: u32,
    pub attack: CombatStat,
    pub defense: CombatStat,
    #[cfg_attr(feature = "serde", serde(default))]
    pub movement_points: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub action_points: u32,
    /// Tile the player returns to after losing a fight.
    pub spawn: TileId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub wins: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub combats: u32,
}

impl Player {
    pub const DEFAULT_HP: u32 = 4;
    pub const DEFAULT_SPEED: u32 = 4;

    pub fn new(name: impl Into<String>, spawn: TileId) -> Self {
        Self {
            name: name.into(),
            hp: Health::full(Self::DEFAULT_HP),
            speed: Self::DEFAULT_SPEED,
            attack: CombatStat::new(4, Die::D4),
            defense: CombatStat::new(4, Die::D6),
            movement_points: Self::DEFAULT_SPEED,
            action_points: 1,
            spawn,
            wins: 0,
            combats: 0,
        }
    }

    pub fn with_hp(mut self, max: u32) -> Self {
        self.hp = Health::full(max);
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self.movement_points = speed;
        self
    }

    pub fn with_attack(mut self, value: i32, bonus_die: Die) -> Self {
        self.attack = CombatStat::new(value, bonus_die);
        self
    }

    pub fn with_defense(mut self, value: i32, bonus_die: Die) -> Self {
        self.defense = CombatStat::new(value, bonus_die);
        self
    }

    /// Refills the per-turn budgets at the start of this player's turn.
    pub fn refresh_turn(&mut self, action_points: u32) {
        self.movement_points = self.speed;
        self.action_points = action_points;
    }

    /// Spends movement points; fails without change when the budget is short.
    pub fn spend_movement(&mut self, cost: u32) -> bool {
        match self.movement_points.checked_sub(cost) {
            Some(left) => {
                self.movement_points = left;
                true
            }
            None => false,
        }
    }

    pub fn spend_action(&mut self) -> bool {
        match self.action_points.checked_sub(1) {
            Some(left) => {
                self.action_points = left;
                true
            }
            None => false,
        }
    }
}
