//! Time source used for round deadlines and the speed-push stopwatch.

use embassy_time::{Duration, Instant};
use embedded_hal_async::delay::DelayNs;

/// A monotonic time source.
///
/// On the device this is `EmbassyClock`. Tests supply a virtual clock that advances
/// whenever the game sleeps.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// [`Clock`] backed by the embassy time driver.
#[cfg(not(feature = "host"))]
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

#[cfg(not(feature = "host"))]
impl Clock for EmbassyClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Measures time since it was started.
#[derive(Clone, Copy, Debug, defmt::Format)]
pub struct Stopwatch {
    started_at: Instant,
}

impl Stopwatch {
    /// Starts timing now.
    #[must_use]
    pub fn start(clock: &impl Clock) -> Self {
        Self {
            started_at: clock.now(),
        }
    }

    /// Time since [`start`](Self::start), truncated to whole milliseconds.
    #[must_use]
    pub fn elapsed(&self, clock: &impl Clock) -> Duration {
        let elapsed = clock
            .now()
            .checked_duration_since(self.started_at)
            .unwrap_or(Duration::from_ticks(0));
        Duration::from_millis(elapsed.as_millis())
    }
}

/// Sleeps for `duration` on any [`DelayNs`] implementation.
///
/// Durations longer than `u32::MAX` microseconds (about 71 minutes) are clamped.
pub async fn sleep<D: DelayNs>(delay: &mut D, duration: Duration) {
    let micros = u32::try_from(duration.as_micros()).unwrap_or(u32::MAX);
    delay.delay_us(micros).await;
}
