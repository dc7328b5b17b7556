//! Game state machines.
//!
//! Two rule sets share one board and one phase model:
//!
//! - [`sequence`]: sequence recall. A single armed key walks a fixed path; press it before the
//!   step ends. Ten levels, each faster than the last.
//! - [`speed_push`]: speed push. Six random keys start armed; clear them all as fast as you can
//!   without touching an idle key.
//!
//! Both move through `Intro → Countdown → Playing → {Cleared | GameOver}`. The sequence game
//! returns from `Cleared` to `Countdown` for the next level until the final level is cleared.

pub mod sequence;
pub mod speed_push;

use derive_more::Display;
use embassy_time::Duration;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::clock::Clock;
use crate::config::GameConfig;
use crate::display::{Display as Screen, Presenter};
use crate::fmt::info;
use crate::keymap::KeySlot;
use crate::led_strip::{FrameBuffer, LedTransport};
use crate::matrix::MatrixScanner;

pub use sequence::{SequenceGame, SequenceResult, SequenceRound, StepResult};
pub use speed_push::{PressResult, SpeedPushGame, SpeedPushResult, SpeedPushRound, draw_armed};

// ============================================================================
// Phase and state
// ============================================================================

/// Where a game is in its life cycle.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, defmt::Format)]
pub enum Phase {
    /// Title banner.
    Intro,
    /// Level banner or 3-2-1 countdown.
    Countdown,
    /// Keys are live.
    Playing,
    /// The round (or, on the last level, the game) was won.
    Cleared,
    /// The round was lost. Terminal.
    GameOver,
}

impl Phase {
    /// Whether a game in this phase may move to `next`.
    #[must_use]
    pub const fn can_enter(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Intro, Self::Countdown)
                | (Self::Countdown, Self::Playing)
                | (Self::Playing, Self::Cleared | Self::GameOver)
                | (Self::Cleared, Self::Countdown)
        )
    }

    /// Whether nothing follows this phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver)
    }
}

/// Level, step speed, and phase of a running game.
///
/// The keys still to be pressed belong to the round: see [`SequenceRound::armed`] and
/// [`SpeedPushRound::armed`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub struct GameState {
    level: u8,
    speed: Option<Duration>,
    phase: Phase,
}

impl GameState {
    /// A new game: level 1, intro, no step deadline yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            level: 1,
            speed: None,
            phase: Phase::Intro,
        }
    }

    /// Current level, starting at 1.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    /// Time allowed per step at the current level. `None` for games without step deadlines.
    #[must_use]
    pub const fn speed(&self) -> Option<Duration> {
        self.speed
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Moves to `next`.
    ///
    /// Panics in debug builds on a move [`Phase::can_enter`] forbids.
    pub fn enter(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_enter(next),
            "illegal phase transition {:?} -> {:?}",
            self.phase,
            next
        );
        info!("game: {} -> {} (level {})", self.phase, next, self.level);
        self.phase = next;
    }

    pub(crate) const fn set_speed(&mut self, speed: Duration) {
        self.speed = Some(speed);
    }

    pub(crate) const fn next_level(&mut self) {
        self.level = self.level.saturating_add(1);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// How a game ended.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, defmt::Format)]
pub enum Outcome {
    /// Every target was hit.
    Cleared,
    /// A wrong key or a missed step.
    GameOver,
}

// ============================================================================
// Board
// ============================================================================

/// Source of key presses, one poll at a time.
///
/// [`MatrixScanner`] is the hardware implementation.
pub trait KeySource {
    /// Scans once and returns a key that went down since the previous poll.
    async fn poll_press(&mut self) -> Option<KeySlot>;

    /// Scans once and records what is down now as already seen.
    ///
    /// Engines call this as play starts, so keys moved while nothing was polling (banners,
    /// countdowns, the gap between games) are judged against the board as it is now.
    async fn prime_edges(&mut self);
}

impl<C, R, D> KeySource for MatrixScanner<C, R, D>
where
    C: OutputPin,
    R: InputPin,
    D: DelayNs,
{
    async fn poll_press(&mut self) -> Option<KeySlot> {
        Self::poll_press(self).await
    }

    async fn prime_edges(&mut self) {
        Self::prime_edges(self).await;
    }
}

/// Everything a game drives: keys in, LEDs and screen out, plus time.
pub struct Board<K, T, S, D, C> {
    /// Key presses.
    pub keys: K,
    /// The LED strip and its frame.
    pub frame_buffer: FrameBuffer<T>,
    /// The screen.
    pub presenter: Presenter<S>,
    /// Sleeps between phases and steps.
    pub delay: D,
    /// Deadlines and the stopwatch.
    pub clock: C,
}

impl<K, T, S, D, C> Board<K, T, S, D, C>
where
    K: KeySource,
    T: LedTransport,
    S: Screen,
    D: DelayNs,
    C: Clock,
{
    /// Bundles the hardware for a game.
    #[must_use]
    pub const fn new(keys: K, transport: T, display: S, delay: D, clock: C) -> Self {
        Self {
            keys,
            frame_buffer: FrameBuffer::new(transport),
            presenter: Presenter::new(display),
            delay,
            clock,
        }
    }
}

/// Shared intro: blank the strip to idle, show the banner, hold it.
async fn play_intro<K, T, S, D, C>(board: &mut Board<K, T, S, D, C>, config: &GameConfig)
where
    K: KeySource,
    T: LedTransport,
    S: Screen,
    D: DelayNs,
    C: Clock,
{
    board.frame_buffer.fill(crate::led_strip::KeyColor::Idle);
    board.frame_buffer.flush().await;
    board.presenter.intro(config.intro_text).await;
    crate::clock::sleep(&mut board.delay, config.intro_hold).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_transitions_follow_the_life_cycle() {
        assert!(Phase::Intro.can_enter(Phase::Countdown));
        assert!(Phase::Countdown.can_enter(Phase::Playing));
        assert!(Phase::Playing.can_enter(Phase::Cleared));
        assert!(Phase::Playing.can_enter(Phase::GameOver));
        assert!(Phase::Cleared.can_enter(Phase::Countdown));
        assert!(!Phase::GameOver.can_enter(Phase::Countdown));
        assert!(!Phase::Intro.can_enter(Phase::Playing));
        assert!(Phase::GameOver.is_terminal());
    }

    #[test]
    fn game_state_starts_at_level_one() {
        let mut state = GameState::new();
        assert_eq!((state.level(), state.phase()), (1, Phase::Intro));
        state.enter(Phase::Countdown);
        state.next_level();
        assert_eq!((state.level(), state.phase()), (2, Phase::Countdown));
    }

    #[test]
    fn game_state_records_step_speed() {
        let mut state = GameState::new();
        assert_eq!(state.speed(), None);
        state.set_speed(Duration::from_millis(80));
        assert_eq!(state.speed(), Some(Duration::from_millis(80)));
    }
}
