//! Inbound wire messages.
//!
//! Each request names the match it targets by access code. The registry
//! routes it to that match's worker; see [`MatchRegistry::dispatch`].
//!
//! [`MatchRegistry::dispatch`]: crate::MatchRegistry::dispatch

use serde::{Deserialize, Serialize};

use game_core::{AttackOutcome, DoorOutcome, EscapeOutcome, MoveOutcome, TileId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Request {
    StartMatch {
        match_id: String,
    },
    RequestMove {
        match_id: String,
        from_tile_id: TileId,
        to_tile_id: TileId,
    },
    RequestCombat {
        match_id: String,
        attacker_name: String,
        defender_name: String,
    },
    RequestAttack {
        match_id: String,
        actor_name: String,
    },
    RequestEscape {
        match_id: String,
        actor_name: String,
    },
    ToggleDoor {
        match_id: String,
        actor_name: String,
        tile_id: TileId,
    },
    EndTurn {
        match_id: String,
    },
    Abandon {
        match_id: String,
        player_name: String,
    },
    SetDebugMode {
        match_id: String,
        enabled: bool,
    },
}

impl Request {
    pub fn match_id(&self) -> &str {
        match self {
            Request::StartMatch { match_id }
            | Request::RequestMove { match_id, .. }
            | Request::RequestCombat { match_id, .. }
            | Request::RequestAttack { match_id, .. }
            | Request::RequestEscape { match_id, .. }
            | Request::ToggleDoor { match_id, .. }
            | Request::EndTurn { match_id }
            | Request::Abandon { match_id, .. }
            | Request::SetDebugMode { match_id, .. } => match_id,
        }
    }
}

/// What an accepted request produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Started { player: String },
    Moved(MoveOutcome),
    Attacked(AttackOutcome),
    Escaped(EscapeOutcome),
    DoorToggled(DoorOutcome),
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_move_requests_with_tile_ids() {
        let json = r#"{"type":"RequestMove","matchId":"DUEL","fromTileId":"tile-0-0","toTileId":"tile-2-1"}"#;
        let request: Request = serde_json::from_str(json).unwrap();
        assert_eq!(
            request,
            Request::RequestMove {
                match_id: "DUEL".into(),
                from_tile_id: TileId::new(0, 0),
                to_tile_id: TileId::new(2, 1),
            }
        );
        assert_eq!(request.match_id(), "DUEL");
    }

    #[test]
    fn rejects_malformed_tile_ids() {
        let json = r#"{"type":"RequestMove","matchId":"DUEL","fromTileId":"0-0","toTileId":"tile-2-1"}"#;
        assert!(serde_json::from_str::<Request>(json).is_err());
    }

    #[test]
    fn actor_names_are_camel_case() {
        let request = Request::RequestAttack {
            match_id: "DUEL".into(),
            actor_name: "alice".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "RequestAttack");
        assert_eq!(json["actorName"], "alice");
    }
}
