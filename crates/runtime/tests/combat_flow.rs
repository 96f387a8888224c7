//! Combat timers, forced attacks, escapes and their effect on the turn.

mod common;

use std::time::Duration;

use common::{MATCH, board, duel, duel_with, next, next_non_tick, t, turn_tick};
use game_core::{CombatError, GameConfig, Player, ScriptedRng};
use runtime::{
    BoardEvent, CombatEvent, Event, MatchEvent, Runtime, RuntimeError, Topic, TurnEvent,
};
use tokio::time::{self, Instant};

fn combat_turn(fighter: &str, seconds: u32, escapes: u32) -> Event {
    Event::Combat(CombatEvent::CombatTurnStarted {
        match_id: MATCH.into(),
        fighter: fighter.into(),
        duration_seconds: seconds,
        escape_attempts_left: escapes,
    })
}

fn combat_tick(seconds_left: u32) -> Event {
    Event::Combat(CombatEvent::CombatTimerTick {
        match_id: MATCH.into(),
        seconds_left,
    })
}

#[tokio::test(start_paused = true)]
async fn combat_pauses_the_turn_countdown_until_it_ends() {
    let runtime = Runtime::builder()
        .game_config(GameConfig::new().with_escape_chance(100))
        .with_match(MATCH, duel(1))
        .build()
        .await
        .unwrap();
    let mut turns = runtime.subscribe(Topic::Turn);
    let mut combat = runtime.subscribe(Topic::Combat);
    let handle = runtime.handle(MATCH).await.unwrap();

    handle.start().await.unwrap();
    next(&mut turns).await;
    time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(next(&mut turns).await, turn_tick(29));
    assert_eq!(next(&mut turns).await, turn_tick(28));

    handle.request_combat("alice", "bob").await.unwrap();
    let view = handle.query().await.unwrap();
    assert!(view.turns.is_paused());
    assert_eq!(view.turns.time_remaining(), 28);
    assert!(view.combat.is_some());

    time::sleep(Duration::from_secs(4)).await;
    assert!(turns.try_recv().is_err());

    let outcome = handle.request_escape("alice").await.unwrap();
    assert!(outcome.succeeded);
    assert_eq!(outcome.attempts_left, 1);

    assert_eq!(
        next_non_tick(&mut combat).await,
        Event::Combat(CombatEvent::CombatStarted {
            match_id: MATCH.into(),
            attacker: "alice".into(),
            defender: "bob".into(),
        })
    );
    assert_eq!(next_non_tick(&mut combat).await, combat_turn("alice", 5, 2));
    assert!(matches!(
        next_non_tick(&mut combat).await,
        Event::Combat(CombatEvent::EscapeResult { succeeded: true, .. })
    ));
    assert_eq!(
        next_non_tick(&mut combat).await,
        Event::Combat(CombatEvent::CombatEnded {
            match_id: MATCH.into(),
            winner: None,
            has_evaded: true,
        })
    );

    assert_eq!(next(&mut turns).await, turn_tick(27));
    let view = handle.query().await.unwrap();
    assert!(!view.turns.is_paused());
    assert!(view.combat.is_none());
}

#[tokio::test(start_paused = true)]
async fn an_idle_fighter_attacks_when_the_combat_turn_expires() {
    let runtime = Runtime::builder().build().await.unwrap();
    let handle = runtime
        .registry()
        .create_match_with_rng(MATCH, duel(1), Box::new(ScriptedRng::new([4, 1])))
        .await
        .unwrap();
    let mut combat = runtime.subscribe(Topic::Combat);

    handle.start().await.unwrap();
    handle.request_combat("alice", "bob").await.unwrap();
    let engaged = Instant::now();

    next(&mut combat).await;
    assert_eq!(next(&mut combat).await, combat_turn("alice", 5, 2));
    for seconds_left in (1..5).rev() {
        assert_eq!(next(&mut combat).await, combat_tick(seconds_left));
    }
    assert_eq!(
        next(&mut combat).await,
        Event::Combat(CombatEvent::AttackResult {
            match_id: MATCH.into(),
            attacker: "alice".into(),
            defender: "bob".into(),
            success: true,
            attack_score: 8,
            defense_score: 5,
            damage: 3,
            defender_hp: 1,
        })
    );
    assert_eq!(engaged.elapsed(), Duration::from_secs(5));
    assert_eq!(next(&mut combat).await, combat_turn("bob", 5, 2));
}

#[tokio::test(start_paused = true)]
async fn an_explicit_action_cancels_the_pending_forced_attack() {
    let runtime = Runtime::builder()
        .game_config(GameConfig::new().with_escape_chance(0))
        .with_match(MATCH, duel(1))
        .build()
        .await
        .unwrap();
    let mut combat = runtime.subscribe(Topic::Combat);
    let handle = runtime.handle(MATCH).await.unwrap();

    handle.start().await.unwrap();
    handle.request_combat("alice", "bob").await.unwrap();
    let engaged = Instant::now();
    time::sleep(Duration::from_secs(4)).await;
    assert!(!handle.request_escape("alice").await.unwrap().succeeded);

    let forced = loop {
        if let Event::Combat(CombatEvent::AttackResult { attacker, .. }) =
            next_non_tick(&mut combat).await
        {
            break attacker;
        }
    };
    assert_eq!(forced, "bob");
    assert_eq!(engaged.elapsed(), Duration::from_secs(9));
}

#[tokio::test(start_paused = true)]
async fn combat_turn_shortens_once_escapes_run_out() {
    let runtime = Runtime::builder()
        .game_config(
            GameConfig::new()
                .with_escape_chance(0)
                .with_max_escape_attempts(1),
        )
        .with_match(MATCH, duel(1))
        .build()
        .await
        .unwrap();
    let mut combat = runtime.subscribe(Topic::Combat);
    let handle = runtime.handle(MATCH).await.unwrap();

    handle.start().await.unwrap();
    handle.request_combat("alice", "bob").await.unwrap();
    next_non_tick(&mut combat).await;
    assert_eq!(next_non_tick(&mut combat).await, combat_turn("alice", 5, 1));

    let outcome = handle.request_escape("alice").await.unwrap();
    assert_eq!((outcome.succeeded, outcome.attempts_left), (false, 0));
    next_non_tick(&mut combat).await;
    assert_eq!(next_non_tick(&mut combat).await, combat_turn("bob", 5, 1));

    handle.request_escape("bob").await.unwrap();
    next_non_tick(&mut combat).await;
    assert_eq!(next_non_tick(&mut combat).await, combat_turn("alice", 3, 0));

    let err = handle.request_escape("alice").await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Combat(CombatError::EscapeExhausted(_))
    ));
    let err = handle.request_attack("bob").await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Combat(CombatError::NotCurrentFighter { .. })
    ));
    handle.request_attack("alice").await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn defeated_player_respawns_and_the_turn_resumes() {
    let state = duel_with(
        1,
        Player::new("alice", t(0, 0)),
        Player::new("bob", t(0, 3)).with_hp(1),
    );
    let runtime = Runtime::builder()
        .with_match(MATCH, state)
        .build()
        .await
        .unwrap();
    let mut board = runtime.subscribe(Topic::Board);
    let mut combat = runtime.subscribe(Topic::Combat);
    let handle = runtime.handle(MATCH).await.unwrap();

    handle.start().await.unwrap();
    handle.set_debug_mode(true).await.unwrap();
    handle.request_combat("alice", "bob").await.unwrap();
    let outcome = handle.request_attack("alice").await.unwrap();
    assert_eq!((outcome.attack_score, outcome.defense_score), (8, 5));
    assert!(outcome.ends_combat());

    assert_eq!(
        next(&mut board).await,
        Event::Board(BoardEvent::PlayerRespawned {
            match_id: MATCH.into(),
            player: "bob".into(),
            tile_id: t(0, 3),
        })
    );
    let ended = loop {
        if let Event::Combat(event @ CombatEvent::CombatEnded { .. }) =
            next_non_tick(&mut combat).await
        {
            break event;
        }
    };
    assert_eq!(
        ended,
        CombatEvent::CombatEnded {
            match_id: MATCH.into(),
            winner: Some("alice".into()),
            has_evaded: false,
        }
    );

    let view = handle.query().await.unwrap();
    let bob = view.state.player("bob").unwrap();
    assert_eq!(bob.hp.current(), bob.hp.max());
    assert_eq!(view.state.position_of("bob"), Some(t(0, 3)));
    assert_eq!(view.state.player("alice").unwrap().wins, 1);
    assert_eq!(view.turns.current_player(), Some("alice"));
    assert!(!view.turns.is_paused());
    assert!(view.combat.is_none());
}

#[tokio::test(start_paused = true)]
async fn losing_on_your_own_turn_ends_it() {
    let state = duel_with(
        1,
        Player::new("alice", t(0, 0)).with_hp(1),
        Player::new("bob", t(0, 3)).with_speed(6),
    );
    let runtime = Runtime::builder()
        .with_match(MATCH, state)
        .build()
        .await
        .unwrap();
    let mut turns = runtime.subscribe(Topic::Turn);
    let handle = runtime.handle(MATCH).await.unwrap();

    handle.start().await.unwrap();
    handle.set_debug_mode(true).await.unwrap();
    handle.request_combat("alice", "bob").await.unwrap();
    let err = handle.request_attack("alice").await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Combat(CombatError::NotCurrentFighter { .. })
    ));
    handle.request_attack("bob").await.unwrap();

    next_non_tick(&mut turns).await;
    assert_eq!(
        next_non_tick(&mut turns).await,
        Event::Turn(TurnEvent::TransitionStarted {
            match_id: MATCH.into(),
            next_player: Some("bob".into()),
            seconds_until_start: 3,
        })
    );
}

#[tokio::test(start_paused = true)]
async fn reaching_the_win_target_ends_the_match() {
    let mut config = GameConfig::new();
    config.wins_to_victory = 1;
    let state = duel_with(
        1,
        Player::new("alice", t(0, 0)),
        Player::new("bob", t(0, 3)).with_hp(1),
    );
    let runtime = Runtime::builder()
        .game_config(config)
        .with_match(MATCH, state)
        .build()
        .await
        .unwrap();
    let mut matches = runtime.subscribe(Topic::Match);
    let handle = runtime.handle(MATCH).await.unwrap();

    handle.start().await.unwrap();
    handle.set_debug_mode(true).await.unwrap();
    handle.request_combat("alice", "bob").await.unwrap();
    handle.request_attack("alice").await.unwrap();

    assert_eq!(
        next(&mut matches).await,
        Event::Match(MatchEvent::MatchEnded {
            match_id: MATCH.into(),
            winner: Some("alice".into()),
        })
    );
    let view = handle.query().await.unwrap();
    assert!(view.finished);
    let err = handle.start().await.unwrap_err();
    assert!(matches!(err, RuntimeError::MatchFinished));
}

#[tokio::test(start_paused = true)]
async fn abandoning_mid_combat_hands_the_fight_to_the_opponent() {
    let state = board(vec![
        (Player::new("alice", t(0, 0)), t(0, 0)),
        (Player::new("bob", t(0, 3)), t(0, 1)),
        (Player::new("carol", t(0, 3)), t(0, 3)),
    ]);

    let runtime = Runtime::builder()
        .with_match(MATCH, state)
        .build()
        .await
        .unwrap();
    let mut combat = runtime.subscribe(Topic::Combat);
    let mut turns = runtime.subscribe(Topic::Turn);
    let handle = runtime.handle(MATCH).await.unwrap();

    handle.start().await.unwrap();
    next(&mut turns).await;
    handle.request_combat("alice", "bob").await.unwrap();
    handle.abandon("bob").await.unwrap();

    let ended = loop {
        if let Event::Combat(event @ CombatEvent::CombatEnded { .. }) =
            next_non_tick(&mut combat).await
        {
            break event;
        }
    };
    assert_eq!(
        ended,
        CombatEvent::CombatEnded {
            match_id: MATCH.into(),
            winner: Some("alice".into()),
            has_evaded: false,
        }
    );

    let view = handle.query().await.unwrap();
    assert!(!view.finished);
    assert!(view.combat.is_none());
    assert_eq!(view.state.player("alice").unwrap().wins, 0);
    assert_eq!(view.turns.peek_next_player(), Some("carol"));
    assert_eq!(next(&mut turns).await, turn_tick(29));
}
