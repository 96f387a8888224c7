#![allow(dead_code)]

use std::time::Duration;

use game_core::{GameState, Grid, Player, TerrainKind, TileId};
use runtime::{CombatEvent, Event, TurnEvent};
use tokio::sync::broadcast;
use tokio::time::timeout;

pub const MATCH: &str = "DUEL";

pub fn t(row: usize, col: usize) -> TileId {
    TileId::new(row, col)
}

/// One row of four plain tiles. Alice stands on (0,0); bob stands on
/// `bob_col` and respawns on (0,3).
pub fn duel(bob_col: usize) -> GameState {
    duel_with(bob_col, Player::new("alice", t(0, 0)), Player::new("bob", t(0, 3)))
}

pub fn duel_with(bob_col: usize, alice: Player, bob: Player) -> GameState {
    board(vec![(alice, t(0, 0)), (bob, t(0, bob_col))])
}

/// The same four-tile row with players placed where given.
pub fn board(placed: Vec<(Player, TileId)>) -> GameState {
    let mut grid = Grid::from_terrain(vec![vec![TerrainKind::Default; 4]]).unwrap();
    for (player, tile) in &placed {
        grid.place_occupant(*tile, &player.name).unwrap();
    }
    let players = placed.into_iter().map(|(player, _)| player).collect();
    GameState::new(grid, players).unwrap()
}

/// Next event, failing the test if nothing arrives within two minutes of
/// (paused) time.
pub async fn next(rx: &mut broadcast::Receiver<Event>) -> Event {
    timeout(Duration::from_secs(120), rx.recv())
        .await
        .expect("no event in time")
        .expect("event bus closed")
}

/// Next event that is not a once-per-second countdown tick.
pub async fn next_non_tick(rx: &mut broadcast::Receiver<Event>) -> Event {
    loop {
        match next(rx).await {
            Event::Turn(TurnEvent::TurnTimerTick { .. })
            | Event::Combat(CombatEvent::CombatTimerTick { .. }) => continue,
            event => return event,
        }
    }
}

pub fn turn_tick(seconds_left: u32) -> Event {
    Event::Turn(TurnEvent::TurnTimerTick {
        match_id: MATCH.into(),
        seconds_left,
    })
}
