//! Timing and rule constants for both game variants.
//!
//! Every field has a default taken from the shipped games; use the `with_*` builders to
//! change one.
//!
//! ```
//! use embassy_time::Duration;
//! use keypad_game::config::{GameConfig, MissPolicy};
//!
//! const CONFIG: GameConfig = GameConfig::new()
//!     .with_miss_policy(MissPolicy::Advance)
//!     .with_min_step(Duration::from_millis(20));
//!
//! assert_eq!(CONFIG.step_duration(10), Duration::from_millis(20));
//! ```

use embassy_time::Duration;

/// What happens when a sequence step's time runs out with no key pressed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, defmt::Format)]
pub enum MissPolicy {
    /// A missed step ends the game, the same as a wrong key.
    #[default]
    GameOver,
    /// A missed step is empty: the pointer moves on and the lap continues.
    Advance,
}

/// Settings shared by the sequence-recall and speed-push games.
#[derive(Clone, Copy, Debug, defmt::Format)]
pub struct GameConfig {
    /// Wait between driving a column and sampling its rows.
    pub settle_delay: Duration,
    /// How long the intro banner stays up.
    pub intro_hold: Duration,
    /// How long the `Level: N` banner stays up before each level.
    pub level_banner_hold: Duration,
    /// Step length at level 1. From level 2 on, each level takes
    /// [`step_decrement`](Self::step_decrement) off this.
    pub base_step: Duration,
    /// Step length removed per level.
    pub step_decrement: Duration,
    /// Shortest step the engine will run.
    pub min_step: Duration,
    /// Last playable level. Clearing it wins the game.
    pub final_level: u8,
    /// Sequence-recall handling of a step with no press.
    pub miss_policy: MissPolicy,
    /// First number shown by the speed-push countdown.
    pub countdown_from: u8,
    /// Time each countdown number stays up.
    pub countdown_tick: Duration,
    /// Pause after each accepted speed-push press before scanning resumes.
    pub press_lockout: Duration,
    /// Keys armed at the start of a speed-push round.
    pub armed_count: u8,
    /// Text on the intro banner.
    pub intro_text: &'static str,
}

impl GameConfig {
    /// The settings of the shipped games.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            settle_delay: Duration::from_millis(1),
            intro_hold: Duration::from_secs(2),
            level_banner_hold: Duration::from_secs(2),
            base_step: Duration::from_millis(100),
            step_decrement: Duration::from_millis(10),
            min_step: Duration::from_millis(10),
            final_level: 10,
            miss_policy: MissPolicy::GameOver,
            countdown_from: 3,
            countdown_tick: Duration::from_secs(1),
            press_lockout: Duration::from_millis(100),
            armed_count: 6,
            intro_text: "ABCEF",
        }
    }

    /// Per-step time budget at `level`.
    ///
    /// Level 1 gets the whole [`base_step`](Self::base_step). Later levels get
    /// `base_step - level * step_decrement`, so level 2 drops straight to 80 ms with the
    /// defaults. Never below [`min_step`](Self::min_step).
    #[must_use]
    pub const fn step_duration(&self, level: u8) -> Duration {
        if level <= 1 {
            return self.base_step;
        }
        let decrement = self.step_decrement.as_ticks().saturating_mul(level as u64);
        let ticks = self.base_step.as_ticks().saturating_sub(decrement);
        if ticks < self.min_step.as_ticks() {
            self.min_step
        } else {
            Duration::from_ticks(ticks)
        }
    }

    /// Sets [`settle_delay`](Self::settle_delay).
    #[must_use]
    pub const fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// Sets [`intro_hold`](Self::intro_hold).
    #[must_use]
    pub const fn with_intro_hold(mut self, intro_hold: Duration) -> Self {
        self.intro_hold = intro_hold;
        self
    }

    /// Sets [`level_banner_hold`](Self::level_banner_hold).
    #[must_use]
    pub const fn with_level_banner_hold(mut self, level_banner_hold: Duration) -> Self {
        self.level_banner_hold = level_banner_hold;
        self
    }

    /// Sets [`min_step`](Self::min_step).
    #[must_use]
    pub const fn with_min_step(mut self, min_step: Duration) -> Self {
        self.min_step = min_step;
        self
    }

    /// Sets [`final_level`](Self::final_level).
    #[must_use]
    pub const fn with_final_level(mut self, final_level: u8) -> Self {
        self.final_level = final_level;
        self
    }

    /// Sets [`miss_policy`](Self::miss_policy).
    #[must_use]
    pub const fn with_miss_policy(mut self, miss_policy: MissPolicy) -> Self {
        self.miss_policy = miss_policy;
        self
    }

    /// Sets [`countdown_from`](Self::countdown_from).
    #[must_use]
    pub const fn with_countdown_from(mut self, countdown_from: u8) -> Self {
        self.countdown_from = countdown_from;
        self
    }

    /// Sets [`countdown_tick`](Self::countdown_tick).
    #[must_use]
    pub const fn with_countdown_tick(mut self, countdown_tick: Duration) -> Self {
        self.countdown_tick = countdown_tick;
        self
    }

    /// Sets [`press_lockout`](Self::press_lockout).
    #[must_use]
    pub const fn with_press_lockout(mut self, press_lockout: Duration) -> Self {
        self.press_lockout = press_lockout;
        self
    }

    /// Sets [`armed_count`](Self::armed_count).
    #[must_use]
    pub const fn with_armed_count(mut self, armed_count: u8) -> Self {
        self.armed_count = armed_count;
        self
    }

    /// Sets [`intro_text`](Self::intro_text).
    #[must_use]
    pub const fn with_intro_text(mut self, intro_text: &'static str) -> Self {
        self.intro_text = intro_text;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn first_level_gets_the_full_step() {
        let config = GameConfig::new();
        assert_eq!(config.step_duration(1), Duration::from_millis(100));
        assert_eq!(config.step_duration(2), Duration::from_millis(80));
    }

    #[test]
    fn step_duration_drops_ten_ms_per_level() {
        let config = GameConfig::new();
        for level in 2..10_u8 {
            let expected = 100 - u64::from(level) * 10;
            assert_eq!(config.step_duration(level), Duration::from_millis(expected));
        }
    }

    #[test]
    fn step_duration_clamps_at_final_level() {
        let config = GameConfig::new();
        assert_eq!(config.step_duration(10), Duration::from_millis(10));
        assert_eq!(config.step_duration(200), Duration::from_millis(10));
    }
}
