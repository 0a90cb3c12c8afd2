//! Whole-game scenarios: real player, dealer and board tasks.

mod common;
mod support;

use std::sync::Arc;
use std::time::Duration;

use set_game::domain::{CardId, FeatureValidator, Position, SetValidator};
use set_game::players::PlayerPhase;
use set_game::table::Board;
use set_game::{Game, GameConfig};
use support::{eventually, DisplayEvent, RecordingDisplay, ScriptedValidator};

const PATIENCE: Duration = Duration::from_secs(5);

fn humans(count: usize) -> GameConfig {
    GameConfig {
        human_players: count,
        computer_players: 0,
        rows: 3,
        columns: 3,
        table_delay_ms: 0,
        point_freeze_ms: 200,
        penalty_freeze_ms: 300,
        seed: Some(2024),
        ..GameConfig::default()
    }
}

async fn wait_until_dealt(game: &Game) {
    let board = Arc::clone(game.board());
    let player = game.players()[0].clone();
    let dealt = eventually(PATIENCE, || {
        player.accepts_intents() && board.peek_cards().iter().all(Option::is_some)
    })
    .await;
    assert!(dealt, "board was never dealt");
}

async fn find_set(board: &Board) -> Vec<Position> {
    let validator = FeatureValidator::new(3, 4);
    let on_board = board.cards().await;
    let cards: Vec<CardId> = on_board.iter().map(|&(_, card)| card).collect();
    let sets = validator.find_sets(&cards, 1);
    let set = sets.first().expect("board holds a set");
    set.iter()
        .map(|&card| board.position_of(card).expect("card is on the board"))
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn valid_claim_scores_and_the_board_is_refilled() {
    let display = Arc::new(RecordingDisplay::default());
    let config = GameConfig {
        deck_size: Some(12),
        ..humans(1)
    };
    let game = Game::builder(config)
        .with_display(display.clone())
        .start()
        .unwrap();
    wait_until_dealt(&game).await;

    let player = game.players()[0].clone();
    let set = find_set(game.board()).await;
    for &position in &set {
        assert!(player.submit_intent(position));
    }

    assert!(eventually(PATIENCE, || player.score() == 1).await);
    for &position in &set {
        assert!(display.any(|e| *e == DisplayEvent::CardRemoved(position)));
    }
    let board = Arc::clone(game.board());
    assert!(
        eventually(PATIENCE, || board.peek_cards().iter().all(Option::is_some)).await,
        "emptied positions were not refilled"
    );
    assert!(display.any(|e| *e == DisplayEvent::Score(0, 1)));
    // the full countdown is published again when a point is scored
    let full_resets = display.count(|e| *e == DisplayEvent::Countdown(Duration::from_secs(60), false));
    assert!(full_resets >= 2);

    game.terminate();
    let outcome = game.wait().await.unwrap();
    assert_eq!(outcome.scores, vec![1]);
    assert_eq!(outcome.winners, vec![0]);
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_claim_is_penalised_and_the_board_is_untouched() {
    let display = Arc::new(RecordingDisplay::default());
    let game = Game::builder(humans(1))
        .with_display(display.clone())
        .with_validator(Arc::new(ScriptedValidator::rejecting()))
        .start()
        .unwrap();
    wait_until_dealt(&game).await;

    let before = game.board().cards().await;
    let player = game.players()[0].clone();
    for position in [0, 4, 8] {
        assert!(player.submit_intent(position));
    }

    assert!(eventually(PATIENCE, || player.phase() == PlayerPhase::Frozen).await);
    assert!(!player.submit_intent(1), "frozen players drop intents");
    assert!(eventually(PATIENCE, || player.phase() == PlayerPhase::Idle).await);

    assert_eq!(player.score(), 0);
    assert_eq!(game.board().cards().await, before);

    let freezes: Vec<Duration> = display
        .events()
        .into_iter()
        .filter_map(|e| match e {
            DisplayEvent::Freeze(0, remaining) => Some(remaining),
            _ => None,
        })
        .collect();
    let first = freezes.first().copied().expect("freeze published");
    assert_eq!(first, Duration::from_millis(300));
    assert_eq!(freezes.last().copied(), Some(Duration::ZERO));

    game.terminate();
    game.wait().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn overlapping_claims_score_exactly_once() {
    let display = Arc::new(RecordingDisplay::default());
    // nine cards only: emptied positions stay empty, so late presses cannot
    // start a fresh claim
    let config = GameConfig {
        deck_size: Some(9),
        ..humans(2)
    };
    let game = Game::builder(config)
        .with_display(display.clone())
        .start()
        .unwrap();
    wait_until_dealt(&game).await;

    let set = find_set(game.board()).await;
    let (first, second) = (game.players()[0].clone(), game.players()[1].clone());
    for &position in &set {
        first.submit_intent(position);
        second.submit_intent(position);
    }

    assert!(eventually(PATIENCE, || first.score() + second.score() == 1).await);
    assert!(
        eventually(PATIENCE, || {
            first.phase() == PlayerPhase::Idle && second.phase() == PlayerPhase::Idle
        })
        .await
    );
    assert_eq!(first.score() + second.score(), 1);

    let loser = if first.score() == 1 { 1 } else { 0 };
    assert!(!display.any(|e| matches!(e, DisplayEvent::Freeze(p, _) if *p == loser)));

    game.terminate();
    let outcome = game.wait().await.unwrap();
    assert_eq!(outcome.winners, vec![1 - loser]);
}

#[tokio::test(flavor = "multi_thread")]
async fn no_set_in_the_deck_ends_the_game_with_a_tie() {
    let display = Arc::new(RecordingDisplay::default());
    let config = GameConfig {
        computer_players: 2,
        ..humans(1)
    };
    let game = Game::builder(config)
        .with_display(display.clone())
        .with_validator(Arc::new(ScriptedValidator::barren()))
        .start()
        .unwrap();
    let players = game.players().to_vec();

    let outcome = tokio::time::timeout(PATIENCE, game.wait())
        .await
        .expect("game ends on its own")
        .unwrap();

    assert_eq!(outcome.rounds, 0);
    assert_eq!(outcome.winners, vec![0, 1, 2]);
    assert_eq!(display.events().last(), Some(&DisplayEvent::GameOver(vec![0, 1, 2])));
    for player in players {
        assert_eq!(player.phase(), PlayerPhase::Terminated);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn seekers_clear_a_small_deck() {
    let config = GameConfig {
        human_players: 0,
        computer_players: 2,
        computer_strategy: "seeker".into(),
        deck_size: Some(9),
        point_freeze_ms: 10,
        turn_timeout_ms: 2_000,
        turn_timeout_warning_ms: 500,
        ..humans(0)
    };
    let game = Game::builder(config)
        .with_display(Arc::new(RecordingDisplay::default()))
        .start()
        .unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(30), game.wait())
        .await
        .expect("seekers finish the deck")
        .unwrap();

    // nine cards on a plane make exactly three disjoint sets in any order
    assert_eq!(outcome.scores.iter().sum::<u32>(), 3);
    assert!(outcome.rounds >= 1);
    assert!(!outcome.winners.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn terminate_stops_a_running_game() {
    let config = GameConfig {
        computer_players: 3,
        ..humans(0)
    };
    let game = Game::builder(config)
        .with_display(Arc::new(RecordingDisplay::default()))
        .start()
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let cancel = game.cancellation();
    game.terminate();
    let outcome = tokio::time::timeout(PATIENCE, game.wait())
        .await
        .expect("game stops after terminate")
        .unwrap();

    assert!(cancel.is_cancelled());
    assert_eq!(outcome.scores.len(), 3);
}

#[tokio::test]
async fn start_rejects_an_invalid_config() {
    let err = Game::builder(humans(0)).start().err().expect("no players");
    assert_eq!(err.code(), "CONFIG_ERROR");
}

#[tokio::test]
async fn start_rejects_a_validator_of_the_wrong_shape() {
    let err = Game::builder(humans(1))
        .with_validator(Arc::new(FeatureValidator::new(4, 3)))
        .start()
        .err()
        .expect("set size mismatch");
    assert!(err.to_string().contains("validator"));
}
