//! Event payloads, one enum per topic.
//!
//! Every payload carries the match access code so a single subscriber can
//! follow many matches. On the wire each event is a flat JSON object whose
//! `type` field names the variant.

use game_core::TileId;
use serde::{Deserialize, Serialize};

/// Turn rotation: who plays and how long they have left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum TurnEvent {
    TurnStarted {
        match_id: String,
        player: String,
        turn_duration_seconds: u32,
    },
    TurnTimerTick {
        match_id: String,
        seconds_left: u32,
    },
    TransitionStarted {
        match_id: String,
        next_player: Option<String>,
        seconds_until_start: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum CombatEvent {
    CombatStarted {
        match_id: String,
        attacker: String,
        defender: String,
    },
    CombatTurnStarted {
        match_id: String,
        fighter: String,
        duration_seconds: u32,
        escape_attempts_left: u32,
    },
    CombatTimerTick {
        match_id: String,
        seconds_left: u32,
    },
    AttackResult {
        match_id: String,
        attacker: String,
        defender: String,
        success: bool,
        attack_score: i32,
        defense_score: i32,
        damage: u32,
        defender_hp: u32,
    },
    EscapeResult {
        match_id: String,
        player: String,
        attempts_left: u32,
        succeeded: bool,
    },
    CombatEnded {
        match_id: String,
        winner: Option<String>,
        has_evaded: bool,
    },
}

/// Changes to the board itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum BoardEvent {
    PlayerMoved {
        match_id: String,
        player: String,
        path: Vec<TileId>,
        movement_points_left: u32,
    },
    DoorToggled {
        match_id: String,
        tile_id: TileId,
        is_open: bool,
    },
    PlayerRespawned {
        match_id: String,
        player: String,
        tile_id: TileId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum MatchEvent {
    PlayerAbandoned {
        match_id: String,
        player: String,
    },
    MatchEnded {
        match_id: String,
        winner: Option<String>,
    },
}

macro_rules! match_id_of {
    ($event:expr, $enum:ident { $($variant:ident),+ $(,)? }) => {
        match $event {
            $($enum::$variant { match_id, .. })|+ => match_id.as_str(),
        }
    };
}

impl TurnEvent {
    pub fn match_id(&self) -> &str {
        match_id_of!(self, TurnEvent { TurnStarted, TurnTimerTick, TransitionStarted })
    }
}

impl CombatEvent {
    pub fn match_id(&self) -> &str {
        match_id_of!(
            self,
            CombatEvent {
                CombatStarted,
                CombatTurnStarted,
                CombatTimerTick,
                AttackResult,
                EscapeResult,
                CombatEnded,
            }
        )
    }
}

impl BoardEvent {
    pub fn match_id(&self) -> &str {
        match_id_of!(self, BoardEvent { PlayerMoved, DoorToggled, PlayerRespawned })
    }
}

impl MatchEvent {
    pub fn match_id(&self) -> &str {
        match_id_of!(self, MatchEvent { PlayerAbandoned, MatchEnded })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_flat_with_camel_case_fields() {
        let event = TurnEvent::TransitionStarted {
            match_id: "DUEL".into(),
            next_player: Some("bob".into()),
            seconds_until_start: 3,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "TransitionStarted",
                "matchId": "DUEL",
                "nextPlayer": "bob",
                "secondsUntilStart": 3,
            })
        );
    }

    #[test]
    fn tile_ids_use_their_text_form() {
        let event = BoardEvent::DoorToggled {
            match_id: "DUEL".into(),
            tile_id: TileId::new(1, 2),
            is_open: true,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["tileId"], "tile-1-2");
        assert_eq!(event.match_id(), "DUEL");
    }
}
