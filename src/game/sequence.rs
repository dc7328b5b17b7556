//! Sequence recall: press the one red key before its step runs out.
//!
//! Each level walks [`VISIT_ORDER`] once. At every step a single key turns red and the player
//! has [`GameConfig::step_duration`] to press it. Pressing it moves the red light on; any
//! other key ends the game. A full lap clears the level. Clearing
//! [`GameConfig::final_level`] wins.
//!
//! [`SequenceRound`] holds the rules and does no I/O. [`SequenceGame`] runs them against a
//! [`Board`].

use derive_more::Display as DisplayText;
use embassy_time::{Duration, Instant};
use embedded_hal_async::delay::DelayNs;

use super::{Board, GameState, KeySource, Outcome, Phase, play_intro};
use crate::clock::{Clock, sleep};
use crate::config::{GameConfig, MissPolicy};
use crate::display::Display;
use crate::fmt::{debug, info};
use crate::keymap::{KeySlot, VISIT_ORDER};
use crate::led_strip::{KeyColor, LedTransport};

// ============================================================================
// Rules
// ============================================================================

/// What a press or a timeout did to the round.
#[derive(Clone, Copy, Debug, DisplayText, Eq, PartialEq, defmt::Format)]
pub enum StepResult {
    /// The pointer moved to the next key in the lap.
    #[display("next")]
    Next,
    /// The last key of the lap was handled; the level is cleared.
    #[display("lap complete")]
    LapComplete,
    /// The player pressed a key that was not armed.
    #[display("wrong key {_0}")]
    WrongKey(KeySlot),
    /// The step ran out and [`MissPolicy::GameOver`] is in force.
    #[display("missed")]
    Missed,
}

/// One lap over [`VISIT_ORDER`].
///
/// ```
/// use keypad_game::config::MissPolicy;
/// use keypad_game::game::{SequenceRound, StepResult};
/// use keypad_game::keymap::KeySlot;
///
/// let mut round = SequenceRound::new();
/// let first = round.armed();
/// assert_eq!(first.get(), 0);
/// assert_eq!(round.on_press(first), StepResult::Next);
/// assert_eq!(round.armed().get(), 3);
/// assert_eq!(round.on_timeout(MissPolicy::GameOver), StepResult::Missed);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, defmt::Format)]
pub struct SequenceRound {
    step: usize,
}

impl SequenceRound {
    /// A lap positioned at its first step.
    #[must_use]
    pub const fn new() -> Self {
        Self { step: 0 }
    }

    /// Index of the current step within [`VISIT_ORDER`].
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    /// The key armed at the current step.
    #[must_use]
    #[allow(clippy::indexing_slicing, reason = "advance keeps step below VISIT_ORDER.len()")]
    pub const fn armed(&self) -> KeySlot {
        VISIT_ORDER[self.step]
    }

    /// Applies a press of `key`.
    pub fn on_press(&mut self, key: KeySlot) -> StepResult {
        if key == self.armed() {
            self.advance()
        } else {
            StepResult::WrongKey(key)
        }
    }

    /// Applies a step that ran out with no press.
    pub fn on_timeout(&mut self, policy: MissPolicy) -> StepResult {
        match policy {
            MissPolicy::GameOver => StepResult::Missed,
            MissPolicy::Advance => self.advance(),
        }
    }

    fn advance(&mut self) -> StepResult {
        match self.step.checked_add(1) {
            Some(next) if next < VISIT_ORDER.len() => {
                self.step = next;
                StepResult::Next
            }
            _ => StepResult::LapComplete,
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// How a sequence-recall game ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct SequenceResult {
    /// Won or lost.
    pub outcome: Outcome,
    /// The level the game stopped at. After a win this is one past the final level.
    pub level: u8,
}

/// Runs the sequence-recall game on a [`Board`].
///
/// # Example
///
/// ```
/// use embedded_hal_async::delay::DelayNs;
/// use keypad_game::clock::Clock;
/// use keypad_game::config::GameConfig;
/// use keypad_game::display::Display;
/// use keypad_game::game::{Board, KeySource, Outcome, SequenceGame};
/// use keypad_game::led_strip::LedTransport;
///
/// async fn play<K, T, S, D, C>(board: Board<K, T, S, D, C>) -> bool
/// where
///     K: KeySource,
///     T: LedTransport,
///     S: Display,
///     D: DelayNs,
///     C: Clock,
/// {
///     let mut game = SequenceGame::new(board, GameConfig::new());
///     game.run().await.outcome == Outcome::Cleared
/// }
/// ```
pub struct SequenceGame<K, T, S, D, C> {
    board: Board<K, T, S, D, C>,
    config: GameConfig,
    state: GameState,
}

impl<K, T, S, D, C> SequenceGame<K, T, S, D, C>
where
    K: KeySource,
    T: LedTransport,
    S: Display,
    D: DelayNs,
    C: Clock,
{
    /// Creates a game that has not started yet.
    #[must_use]
    pub const fn new(board: Board<K, T, S, D, C>, config: GameConfig) -> Self {
        Self {
            board,
            config,
            state: GameState::new(),
        }
    }

    /// Level, step speed, and phase.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// The board the game drives.
    #[must_use]
    pub const fn board(&self) -> &Board<K, T, S, D, C> {
        &self.board
    }

    /// Consumes the game and returns its board.
    pub fn into_board(self) -> Board<K, T, S, D, C> {
        self.board
    }

    /// Plays from the intro banner to a win or a loss.
    pub async fn run(&mut self) -> SequenceResult {
        self.state = GameState::new();
        play_intro(&mut self.board, &self.config).await;

        loop {
            let level = self.state.level();
            let step_duration = self.config.step_duration(level);
            self.state.set_speed(step_duration);
            self.state.enter(Phase::Countdown);
            self.board.presenter.level(level).await;
            sleep(&mut self.board.delay, self.config.level_banner_hold).await;

            self.state.enter(Phase::Playing);
            self.board.keys.prime_edges().await;
            if self.play_level(level, step_duration).await == Outcome::GameOver {
                self.state.enter(Phase::GameOver);
                self.board.presenter.game_over().await;
                return SequenceResult {
                    outcome: Outcome::GameOver,
                    level,
                };
            }

            self.state.enter(Phase::Cleared);
            self.state.next_level();
            if level >= self.config.final_level {
                info!("sequence: all {} levels cleared", level);
                self.board.presenter.game_clear().await;
                return SequenceResult {
                    outcome: Outcome::Cleared,
                    level: self.state.level(),
                };
            }
        }
    }

    async fn play_level(&mut self, level: u8, step_duration: Duration) -> Outcome {
        info!("sequence: level {} step {} ms", level, step_duration.as_millis());
        let mut round = SequenceRound::new();

        loop {
            let step = round.step();
            let armed = round.armed();
            self.board.frame_buffer.fill(KeyColor::Idle);
            self.board.frame_buffer.set_key(armed, KeyColor::Armed);
            self.board.frame_buffer.flush().await;

            let deadline = self
                .board
                .clock
                .now()
                .checked_add(step_duration)
                .unwrap_or(Instant::MAX);
            let result = self.await_step(&mut round, deadline).await;
            debug!("sequence: step {} on {}: {}", step, armed, result);

            match result {
                StepResult::Next => {}
                StepResult::LapComplete => return Outcome::Cleared,
                StepResult::WrongKey(key) => {
                    info!("sequence: wrong key {} (armed {})", key, armed);
                    return Outcome::GameOver;
                }
                StepResult::Missed => {
                    info!("sequence: missed {}", armed);
                    return Outcome::GameOver;
                }
            }
        }
    }

    async fn await_step(&mut self, round: &mut SequenceRound, deadline: Instant) -> StepResult {
        loop {
            if let Some(key) = self.board.keys.poll_press().await {
                return round.on_press(key);
            }
            if self.board.clock.now() >= deadline {
                return round.on_timeout(self.config.miss_policy);
            }
        }
    }
}
