#![allow(missing_docs)]
#![allow(clippy::indexing_slicing, reason = "test assertions")]
//! Host-level scenarios for the speed-push game on a simulated board.

mod common;

use common::{Player, Sim, armed_keys, idle_player, key, scripted};
use embassy_futures::block_on;
use embassy_time::Duration;
use keypad_game::Error;
use keypad_game::config::GameConfig;
use keypad_game::display::format_elapsed;
use keypad_game::game::{Outcome, Phase, PressResult, SpeedPushGame, SpeedPushRound};
use keypad_game::keymap::{KeySet, KeySlot};
use keypad_game::led_strip::KeyColor;
use rand::SeedableRng;
use rand::rngs::SmallRng;

// Longer than the 100 ms lockout, so every press lands after scanning resumes.
const REACTION: Duration = Duration::from_millis(150);
const HOLD: Duration = Duration::from_millis(6);

/// Presses each armed key in slot order, one per frame.
fn clear_in_order() -> Player {
    Box::new(|frame| armed_keys(frame).iter().next())
}

#[test]
fn pressing_every_armed_key_clears_the_round() {
    let armed = KeySet::from_keys(&[key(0), key(2), key(3), key(5), key(6), key(10)]);
    assert_eq!(
        armed.complement(),
        KeySet::from_keys(&[key(1), key(4), key(7), key(8), key(9), key(11)])
    );

    let mut round = SpeedPushRound::new(armed);
    for slot in [0, 2, 3, 5, 6] {
        assert_eq!(round.press(key(slot)), PressResult::Hit(key(slot)));
    }
    assert_eq!(round.press(key(10)), PressResult::Cleared(key(10)));
    assert!(round.frame().is_all_idle());
}

#[test]
fn engine_clears_a_fixed_board_in_any_order() {
    let armed = KeySet::from_keys(&[key(0), key(2), key(3), key(5), key(6), key(10)]);
    let idle = KeySet::from_keys(&[key(1), key(4), key(7), key(8), key(9), key(11)]);
    let order = [10, 3, 0, 6, 2, 5].map(key);

    let sim = Sim::new(REACTION, HOLD, scripted(order.to_vec()));
    let config = GameConfig::new();
    let mut game = SpeedPushGame::new(sim.board(&config), config, SmallRng::seed_from_u64(0));
    let result = block_on(game.play_round(armed));

    assert_eq!(result.outcome, Outcome::Cleared);
    assert!(result.remaining.is_empty());
    assert!(result.elapsed >= Duration::from_millis(6 * 150));

    let frames = sim.armed_frames();
    assert_eq!(frames.len(), order.len());
    let mut expected = armed;
    for (frame, &pressed) in frames.iter().zip(order.iter()) {
        assert_eq!(armed_keys(frame), expected);
        for key in idle.iter() {
            assert_eq!(frame.key(key), KeyColor::Idle);
        }
        expected.remove(pressed);
    }
    let (_, last) = sim.frames().last().copied().expect("frames");
    assert!(last.is_all_idle());
    assert_eq!(sim.headlines().last().map(String::as_str), Some("GameClear!!"));
}

#[test]
fn engine_stops_on_an_idle_key_of_a_fixed_board() {
    let armed = KeySet::from_keys(&[key(0), key(2), key(3), key(5), key(6), key(10)]);
    let sim = Sim::new(REACTION, HOLD, scripted(vec![key(3), key(8)]));
    let config = GameConfig::new();
    let mut game = SpeedPushGame::new(sim.board(&config), config, SmallRng::seed_from_u64(0));
    let result = block_on(game.play_round(armed));

    assert_eq!(result.outcome, Outcome::GameOver);
    assert_eq!(
        result.remaining,
        KeySet::from_keys(&[key(0), key(2), key(5), key(6), key(10)])
    );
    assert_eq!(game.state().phase(), Phase::GameOver);
}

#[test]
fn engine_clears_and_reports_time() {
    let sim = Sim::new(REACTION, HOLD, clear_in_order());
    let config = GameConfig::new();
    let mut game = SpeedPushGame::new(sim.board(&config), config, SmallRng::seed_from_u64(42));
    let result = block_on(game.run()).expect("six keys fit");

    assert_eq!(result.outcome, Outcome::Cleared);
    assert!(result.remaining.is_empty());
    assert_eq!(game.state().phase(), Phase::Cleared);

    let frames = sim.armed_frames();
    assert_eq!(armed_keys(&frames[0]).len(), 6);
    for pair in frames.windows(2) {
        assert_eq!(armed_keys(&pair[1]).len() + 1, armed_keys(&pair[0]).len());
    }
    let (_, last) = sim.frames().last().copied().expect("frames");
    assert!(last.is_all_idle());

    // The lockout runs inside each reaction, so six reactions bound the time from below.
    assert!(result.elapsed >= Duration::from_millis(6 * 150));
    assert_eq!(result.elapsed.as_ticks() % 1_000, 0, "whole milliseconds");

    let mut expected_time: heapless::String<24> = heapless::String::new();
    format_elapsed(&mut expected_time, result.elapsed).expect("fits");
    let screens = sim.screens();
    assert_eq!(
        screens.last().expect("screens"),
        &vec!["GameClear!!".to_owned(), expected_time.to_string()]
    );
}

#[test]
fn countdown_precedes_go() {
    let sim = Sim::new(REACTION, HOLD, clear_in_order());
    let config = GameConfig::new();
    let mut game = SpeedPushGame::new(sim.board(&config), config, SmallRng::seed_from_u64(1));
    block_on(game.run()).expect("six keys fit");

    assert_eq!(
        sim.headlines()[..5],
        ["ABCEF", "3", "2", "1", "Go!!!"].map(str::to_owned)
    );

    // Intro 2 s, three 1 s countdown ticks, then one 4 ms priming sweep before the armed frame.
    let (armed_at, _) = sim
        .frames()
        .into_iter()
        .find(|(_, frame)| !frame.is_all_idle())
        .expect("armed frame");
    assert_eq!(armed_at.as_millis(), 5_004);
}

#[test]
fn pressing_a_cleared_key_again_ends_the_game() {
    let mut first: Option<KeySlot> = None;
    let player: Player = Box::new(move |frame| {
        let armed = armed_keys(frame);
        if armed.is_empty() {
            return None;
        }
        Some(*first.get_or_insert_with(|| armed.iter().next().expect("armed")))
    });
    let sim = Sim::new(REACTION, HOLD, player);
    let config = GameConfig::new();
    let mut game = SpeedPushGame::new(sim.board(&config), config, SmallRng::seed_from_u64(7));
    let result = block_on(game.run()).expect("six keys fit");

    assert_eq!(result.outcome, Outcome::GameOver);
    assert_eq!(result.remaining.len(), 5);
    assert_eq!(game.state().phase(), Phase::GameOver);
    assert_eq!(sim.headlines().last().map(String::as_str), Some("GameOver..."));
}

#[test]
fn pressing_an_idle_key_ends_the_game() {
    let mut rng = SmallRng::seed_from_u64(9);
    let armed = keypad_game::game::draw_armed(&mut rng, 6).expect("fits");
    let idle = armed.complement().iter().next().expect("six idle keys");

    let sim = Sim::new(REACTION, HOLD, scripted(vec![idle]));
    let config = GameConfig::new();
    let mut game = SpeedPushGame::new(sim.board(&config), config, SmallRng::seed_from_u64(9));
    let result = block_on(game.run()).expect("six keys fit");

    assert_eq!(result.outcome, Outcome::GameOver);
    assert_eq!(result.remaining, armed);
}

#[test]
fn zero_armed_keys_clear_immediately() {
    let sim = Sim::new(REACTION, HOLD, idle_player());
    let config = GameConfig::new().with_armed_count(0);
    let mut game = SpeedPushGame::new(sim.board(&config), config, SmallRng::seed_from_u64(0));
    let result = block_on(game.run()).expect("zero keys fit");

    assert_eq!(result.outcome, Outcome::Cleared);
    assert_eq!(result.elapsed, Duration::from_ticks(0));
    assert_eq!(sim.screens().last().expect("screens")[1], "0.000s");
}

#[test]
fn too_many_armed_keys_is_an_error() {
    let sim = Sim::new(REACTION, HOLD, idle_player());
    let config = GameConfig::new().with_armed_count(13);
    let mut game = SpeedPushGame::new(sim.board(&config), config, SmallRng::seed_from_u64(0));
    let err = block_on(game.run()).expect_err("13 keys do not fit");

    assert!(matches!(
        err,
        Error::SampleTooLarge {
            requested: 13,
            available: 12
        }
    ));
    assert!(sim.frames().is_empty());
    assert!(sim.screens().is_empty());
}
