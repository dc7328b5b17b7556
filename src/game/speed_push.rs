//! Speed push: clear every red key as fast as possible.
//!
//! A round starts with [`GameConfig::armed_count`] keys drawn at random and lit red; the rest
//! are white. Pressing a red key turns it white. Pressing a white key ends the game. When the
//! whole board is white the round is cleared and the time since `Go!!!` is shown.

use derive_more::Display as DisplayText;
use embedded_hal_async::delay::DelayNs;
use rand::{Rng, RngCore};

use super::{Board, GameState, KeySource, Outcome, Phase, play_intro};
use crate::clock::{Clock, Stopwatch, sleep};
use crate::config::GameConfig;
use crate::display::Display;
use crate::fmt::{debug, info};
use crate::keymap::{KEY_COUNT, KeySet, KeySlot};
use crate::led_strip::{Frame, KeyColor, LedTransport};
use crate::{Error, Result};

// ============================================================================
// Random draw
// ============================================================================

/// Draws `count` distinct keys uniformly at random.
///
/// Uses a partial Fisher-Yates shuffle, so every `count`-subset is equally likely and exactly
/// `count` random numbers are consumed.
///
/// # Errors
///
/// Returns [`Error::SampleTooLarge`] if `count > 12`.
///
/// # Example
///
/// ```
/// use keypad_game::game::draw_armed;
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let armed = draw_armed(&mut rng, 6).unwrap();
/// assert_eq!(armed.len(), 6);
/// ```
pub fn draw_armed<R: RngCore + ?Sized>(rng: &mut R, count: u8) -> Result<KeySet> {
    let count_index = usize::from(count);
    if count_index > KEY_COUNT {
        return Err(Error::SampleTooLarge {
            requested: count,
            available: KEY_COUNT as u8,
        });
    }

    let mut pool = KeySlot::ALL;
    for index in 0..count_index {
        let pick = rng.gen_range(index..KEY_COUNT);
        pool.swap(index, pick);
    }
    Ok(pool.into_iter().take(count_index).collect())
}

// ============================================================================
// Rules
// ============================================================================

/// What one press did to the round.
#[derive(Clone, Copy, Debug, DisplayText, Eq, PartialEq, defmt::Format)]
pub enum PressResult {
    /// An armed key went idle; others remain armed.
    #[display("hit {_0}")]
    Hit(KeySlot),
    /// The last armed key went idle.
    #[display("cleared by {_0}")]
    Cleared(KeySlot),
    /// An idle key was pressed.
    #[display("idle key {_0}")]
    IdleKey(KeySlot),
}

/// Armed keys of one speed-push round.
///
/// ```
/// use keypad_game::game::{PressResult, SpeedPushRound};
/// use keypad_game::keymap::{KeySet, KeySlot};
///
/// let a = KeySlot::new(2).unwrap();
/// let b = KeySlot::new(9).unwrap();
/// let mut round = SpeedPushRound::new(KeySet::from_keys(&[a, b]));
///
/// assert_eq!(round.press(a), PressResult::Hit(a));
/// assert_eq!(round.press(a), PressResult::IdleKey(a));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct SpeedPushRound {
    armed: KeySet,
}

impl SpeedPushRound {
    /// A round with `armed` lit red.
    #[must_use]
    pub const fn new(armed: KeySet) -> Self {
        Self { armed }
    }

    /// Keys still armed.
    #[must_use]
    pub const fn armed(&self) -> KeySet {
        self.armed
    }

    /// Whether every key is idle.
    #[must_use]
    pub const fn is_cleared(&self) -> bool {
        self.armed.is_empty()
    }

    /// The LED frame for the current state: armed keys red, the rest white.
    #[must_use]
    pub fn frame(&self) -> Frame {
        let mut frame = Frame::filled(KeyColor::Idle);
        for key in self.armed.iter() {
            frame.set_key(key, KeyColor::Armed);
        }
        frame
    }

    /// Applies a press of `key`.
    pub const fn press(&mut self, key: KeySlot) -> PressResult {
        if !self.armed.remove(key) {
            PressResult::IdleKey(key)
        } else if self.armed.is_empty() {
            PressResult::Cleared(key)
        } else {
            PressResult::Hit(key)
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

/// How a speed-push game ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct SpeedPushResult {
    /// Won or lost.
    pub outcome: Outcome,
    /// Time from `Go!!!` to the clearing press, or to the losing press.
    pub elapsed: embassy_time::Duration,
    /// Keys that were still armed when the game ended.
    pub remaining: KeySet,
}

/// Runs the speed-push game on a [`Board`].
pub struct SpeedPushGame<K, T, S, D, C, R> {
    board: Board<K, T, S, D, C>,
    config: GameConfig,
    rng: R,
    state: GameState,
}

impl<K, T, S, D, C, R> SpeedPushGame<K, T, S, D, C, R>
where
    K: KeySource,
    T: LedTransport,
    S: Display,
    D: DelayNs,
    C: Clock,
    R: RngCore,
{
    /// Creates a game that has not started yet. `rng` chooses the armed keys.
    #[must_use]
    pub const fn new(board: Board<K, T, S, D, C>, config: GameConfig, rng: R) -> Self {
        Self {
            board,
            config,
            rng,
            state: GameState::new(),
        }
    }

    /// Level and phase.
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

    /// Plays one round: intro, countdown, then presses until the board is white or a white key
    /// is hit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SampleTooLarge`] if [`GameConfig::armed_count`] exceeds 12. Nothing is
    /// shown in that case.
    pub async fn run(&mut self) -> Result<SpeedPushResult> {
        let armed = draw_armed(&mut self.rng, self.config.armed_count)?;
        Ok(self.play_round(armed).await)
    }

    /// Plays one round with `armed` lit red instead of a random draw.
    pub async fn play_round(&mut self, armed: KeySet) -> SpeedPushResult {
        info!("speed push: {} keys armed", armed.len());
        let mut round = SpeedPushRound::new(armed);

        self.state = GameState::new();
        play_intro(&mut self.board, &self.config).await;

        self.state.enter(Phase::Countdown);
        for digit in (1..=self.config.countdown_from).rev() {
            self.board.presenter.countdown_digit(digit).await;
            sleep(&mut self.board.delay, self.config.countdown_tick).await;
        }

        self.state.enter(Phase::Playing);
        self.board.keys.prime_edges().await;
        self.board.presenter.go().await;
        let stopwatch = Stopwatch::start(&self.board.clock);
        self.board.frame_buffer.set_all(round.frame().0);
        self.board.frame_buffer.flush().await;

        if round.is_cleared() {
            return self.finish_cleared(&round, &stopwatch).await;
        }

        loop {
            let Some(key) = self.board.keys.poll_press().await else {
                continue;
            };

            let result = round.press(key);
            debug!("speed push: {}", result);
            match result {
                PressResult::Hit(key) => {
                    self.show_idle(key).await;
                    sleep(&mut self.board.delay, self.config.press_lockout).await;
                }
                PressResult::Cleared(key) => {
                    self.show_idle(key).await;
                    return self.finish_cleared(&round, &stopwatch).await;
                }
                PressResult::IdleKey(key) => {
                    info!("speed push: idle key {} pressed", key);
                    self.state.enter(Phase::GameOver);
                    self.board.presenter.game_over().await;
                    return SpeedPushResult {
                        outcome: Outcome::GameOver,
                        elapsed: stopwatch.elapsed(&self.board.clock),
                        remaining: round.armed(),
                    };
                }
            }
        }
    }

    async fn show_idle(&mut self, key: KeySlot) {
        self.board.frame_buffer.set_key(key, KeyColor::Idle);
        self.board.frame_buffer.flush().await;
    }

    async fn finish_cleared(
        &mut self,
        round: &SpeedPushRound,
        stopwatch: &Stopwatch,
    ) -> SpeedPushResult {
        let elapsed = stopwatch.elapsed(&self.board.clock);
        debug_assert!(self.board.frame_buffer.frame().is_all_idle());
        self.state.enter(Phase::Cleared);
        info!("speed push: cleared in {} ms", elapsed.as_millis());
        self.board.presenter.game_clear_with_time(elapsed).await;
        SpeedPushResult {
            outcome: Outcome::Cleared,
            elapsed,
            remaining: round.armed(),
        }
    }
}
