//! # Publish Timer
//!
//! Periodic tick source with an explicit start/stop lifecycle.
//!
//! The first tick arrives one full period after [`PublishTimer::start`].
//! While stopped, [`PublishTimer::tick`] never completes, so the timer can
//! sit in a `tokio::select!` loop unconditionally.

use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Default publish rate in Hz.
pub const DEFAULT_RATE_HZ: f64 = 20.0;

/// Converts a rate to a tick period.
///
/// Returns `None` for zero, negative or non-finite rates, and for rates so
/// low that the period does not fit in a [`Duration`]. Those stop the timer.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use virtual_joy::publisher::timer::period_for_rate;
///
/// assert_eq!(period_for_rate(20.0), Some(Duration::from_millis(50)));
/// assert_eq!(period_for_rate(0.0), None);
/// ```
#[must_use]
pub fn period_for_rate(rate_hz: f64) -> Option<Duration> {
    if rate_hz.is_finite() && rate_hz > 0.0 {
        Duration::try_from_secs_f64(1.0 / rate_hz).ok()
    } else {
        None
    }
}

/// Timer driving the publish loop.
#[derive(Debug, Default)]
pub struct PublishTimer {
    period: Option<Duration>,
    /// Created lazily on the first tick so `start` works outside a runtime.
    interval: Option<Interval>,
}

impl PublishTimer {
    /// Creates a stopped timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)starts the timer at `rate_hz`.
    ///
    /// A non-positive rate stops the timer instead. Returns whether the
    /// timer is running afterwards.
    pub fn start(&mut self, rate_hz: f64) -> bool {
        self.interval = None;
        self.period = period_for_rate(rate_hz);

        match self.period {
            Some(period) => debug!("Publish timer started ({:?} period)", period),
            None => debug!("Publish timer stopped (rate {} Hz)", rate_hz),
        }

        self.period.is_some()
    }

    /// Stops the timer. Pending ticks are discarded.
    pub fn stop(&mut self) {
        if self.period.is_some() {
            debug!("Publish timer stopped");
        }
        self.period = None;
        self.interval = None;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.period.is_some()
    }

    #[must_use]
    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Waits for the next tick. Cancel-safe.
    pub async fn tick(&mut self) {
        let Some(period) = self.period else {
            return std::future::pending().await;
        };

        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });

        interval.tick().await;
    }
}
