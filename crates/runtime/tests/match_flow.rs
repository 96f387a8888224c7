//! Turn rotation, movement and multi-match behaviour, driven on paused time.

mod common;

use std::time::Duration;

use common::{MATCH, duel, next, next_non_tick, t, turn_tick};
use game_core::{GameConfig, MoveError, TurnError, TurnPhase};
use runtime::{
    BoardEvent, Event, MatchEvent, Reply, Request, Runtime, RuntimeError, Topic, TurnEvent,
};
use tokio::time::Instant;

fn turn_started(player: &str, seconds: u32) -> Event {
    Event::Turn(TurnEvent::TurnStarted {
        match_id: MATCH.into(),
        player: player.into(),
        turn_duration_seconds: seconds,
    })
}

#[tokio::test(start_paused = true)]
async fn turns_count_down_and_rotate() {
    let runtime = Runtime::builder()
        .game_config(GameConfig::new().with_turn_duration(3))
        .with_match(MATCH, duel(3))
        .build()
        .await
        .unwrap();
    let mut turns = runtime.subscribe(Topic::Turn);
    let handle = runtime.handle(MATCH).await.unwrap();

    let started = Instant::now();
    assert_eq!(handle.start().await.unwrap(), "alice");
    assert_eq!(next(&mut turns).await, turn_started("alice", 3));
    assert_eq!(next(&mut turns).await, turn_tick(2));
    assert_eq!(next(&mut turns).await, turn_tick(1));
    assert_eq!(
        next(&mut turns).await,
        Event::Turn(TurnEvent::TransitionStarted {
            match_id: MATCH.into(),
            next_player: Some("bob".into()),
            seconds_until_start: 3,
        })
    );
    assert_eq!(started.elapsed(), Duration::from_secs(3));

    assert_eq!(next(&mut turns).await, turn_started("bob", 3));
    assert_eq!(started.elapsed(), Duration::from_secs(6));

    let view = handle.query().await.unwrap();
    assert_eq!(view.turns.phase(), TurnPhase::ActiveTurn);
    assert_eq!(view.turns.current_player(), Some("bob"));
}

#[tokio::test(start_paused = true)]
async fn ending_a_turn_early_starts_the_transition() {
    let runtime = Runtime::builder()
        .with_match(MATCH, duel(3))
        .build()
        .await
        .unwrap();
    let mut turns = runtime.subscribe(Topic::Turn);
    let handle = runtime.handle(MATCH).await.unwrap();

    handle.start().await.unwrap();
    handle.end_turn().await.unwrap();
    assert_eq!(next_non_tick(&mut turns).await, turn_started("alice", 30));
    assert!(matches!(
        next_non_tick(&mut turns).await,
        Event::Turn(TurnEvent::TransitionStarted { .. })
    ));

    let err = handle.end_turn().await.unwrap_err();
    assert!(matches!(err, RuntimeError::Turn(TurnError::NoActiveTurn)));
    assert_eq!(next_non_tick(&mut turns).await, turn_started("bob", 30));
}

#[tokio::test(start_paused = true)]
async fn out_of_turn_requests_are_rejected_without_side_effects() {
    let runtime = Runtime::builder()
        .with_match(MATCH, duel(3))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle(MATCH).await.unwrap();

    let err = handle.request_move(t(0, 0), t(0, 1)).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Turn(TurnError::NoActiveTurn)));

    handle.start().await.unwrap();
    let before = handle.query().await.unwrap().state;

    let err = handle.request_move(t(0, 3), t(0, 2)).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Turn(TurnError::NotYourTurn { ref actor, .. }) if actor == "bob"
    ));
    let err = handle.request_move(t(0, 1), t(0, 2)).await.unwrap_err();
    assert!(matches!(err, RuntimeError::EmptyTile(tile) if tile == t(0, 1)));
    let err = handle.request_move(t(5, 5), t(0, 2)).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Move(MoveError::UnknownTile(_))));
    let err = handle.request_combat("bob", "alice").await.unwrap_err();
    assert!(matches!(err, RuntimeError::Turn(TurnError::NotYourTurn { .. })));

    assert_eq!(handle.query().await.unwrap().state, before);
}

#[tokio::test(start_paused = true)]
async fn moves_spend_movement_points_and_are_published() {
    let runtime = Runtime::builder()
        .with_match(MATCH, duel(3))
        .build()
        .await
        .unwrap();
    let mut board = runtime.subscribe(Topic::Board);
    let handle = runtime.handle(MATCH).await.unwrap();
    handle.start().await.unwrap();

    let outcome = handle.request_move(t(0, 0), t(0, 2)).await.unwrap();
    assert_eq!(outcome.cost, 2);
    assert_eq!(outcome.movement_points_left, 2);
    assert_eq!(
        next(&mut board).await,
        Event::Board(BoardEvent::PlayerMoved {
            match_id: MATCH.into(),
            player: "alice".into(),
            path: vec![t(0, 0), t(0, 1), t(0, 2)],
            movement_points_left: 2,
        })
    );

    let err = handle.request_move(t(0, 2), t(0, 3)).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Move(MoveError::Blocked(_))));

    let view = handle.query().await.unwrap();
    assert_eq!(view.state.position_of("alice"), Some(t(0, 2)));
    assert_eq!(view.state.player("alice").unwrap().movement_points, 2);
}

#[tokio::test(start_paused = true)]
async fn last_player_standing_wins_by_abandonment() {
    let runtime = Runtime::builder()
        .with_match(MATCH, duel(3))
        .build()
        .await
        .unwrap();
    let mut matches = runtime.subscribe(Topic::Match);
    let handle = runtime.handle(MATCH).await.unwrap();
    handle.start().await.unwrap();

    handle.abandon("alice").await.unwrap();
    assert_eq!(
        next(&mut matches).await,
        Event::Match(MatchEvent::PlayerAbandoned {
            match_id: MATCH.into(),
            player: "alice".into(),
        })
    );
    assert_eq!(
        next(&mut matches).await,
        Event::Match(MatchEvent::MatchEnded {
            match_id: MATCH.into(),
            winner: Some("bob".into()),
        })
    );

    let view = handle.query().await.unwrap();
    assert!(view.finished);
    assert_eq!(view.turns.phase(), TurnPhase::Idle);
    assert_eq!(view.state.position_of("alice"), None);

    let err = handle.end_turn().await.unwrap_err();
    assert!(matches!(err, RuntimeError::MatchFinished));
}

#[tokio::test(start_paused = true)]
async fn matches_run_independently() {
    let runtime = Runtime::builder()
        .game_config(GameConfig::new().with_turn_duration(2))
        .with_match(MATCH, duel(3))
        .with_match("ARENA", duel(3))
        .build()
        .await
        .unwrap();
    let mut turns = runtime.subscribe(Topic::Turn);
    assert_eq!(runtime.registry().match_ids().await, ["ARENA", MATCH]);

    let reply = runtime
        .dispatch(Request::StartMatch {
            match_id: MATCH.into(),
        })
        .await
        .unwrap();
    assert_eq!(
        reply,
        Reply::Started {
            player: "alice".into()
        }
    );

    for _ in 0..4 {
        assert_eq!(next(&mut turns).await.match_id(), MATCH);
    }

    let arena = runtime.handle("ARENA").await.unwrap();
    let view = arena.query().await.unwrap();
    assert_eq!(view.turns.phase(), TurnPhase::Idle);
    let err = arena.request_move(t(0, 0), t(0, 1)).await.unwrap_err();
    assert!(matches!(err, RuntimeError::Turn(TurnError::NoActiveTurn)));

    let err = runtime
        .dispatch(Request::EndTurn {
            match_id: "NOPE".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownMatch(_)));

    let err = runtime.create_match(MATCH, duel(3)).await.unwrap_err();
    assert!(matches!(err, RuntimeError::DuplicateMatch(_)));

    runtime.registry().remove("ARENA").await.unwrap();
    assert!(arena.query().await.is_err());
    runtime.shutdown().await.unwrap();
}
