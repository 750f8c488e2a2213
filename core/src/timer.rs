//! Polled interval timers used for cooldowns, wave pacing and periodic skills.

use std::time::Duration;

/// Accumulator that reports when a configured wait time has elapsed.
///
/// Timers never own threads or callbacks. Callers advance them with
/// [`IntervalTimer::on_update`] and react to the returned flag. A single update
/// reports at most one expiry no matter how many periods the delta spans; the
/// accumulator keeps the overshoot by subtracting exactly one wait time. A
/// one-shot timer reports its first expiry only, until [`IntervalTimer::restart`]
/// re-arms it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntervalTimer {
    wait_time: Duration,
    elapsed: Duration,
    one_shot: bool,
    fired: bool,
    paused: bool,
}

impl IntervalTimer {
    /// Creates a timer that reports every time the wait time elapses.
    #[must_use]
    pub const fn repeating(wait_time: Duration) -> Self {
        Self {
            wait_time,
            elapsed: Duration::ZERO,
            one_shot: false,
            fired: false,
            paused: false,
        }
    }

    /// Creates a timer that reports a single expiry until restarted.
    #[must_use]
    pub const fn one_shot(wait_time: Duration) -> Self {
        Self {
            wait_time,
            elapsed: Duration::ZERO,
            one_shot: true,
            fired: false,
            paused: false,
        }
    }

    /// Replaces the wait time without touching the accumulator.
    pub fn set_wait_time(&mut self, wait_time: Duration) {
        self.wait_time = wait_time;
    }

    /// Switches between one-shot and repeating behaviour.
    pub fn set_one_shot(&mut self, one_shot: bool) {
        self.one_shot = one_shot;
    }

    /// Clears the accumulator and re-arms a one-shot timer.
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
        self.fired = false;
    }

    /// Stops accumulating time until [`IntervalTimer::resume`] is called.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes accumulation after a pause.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Advances the timer and reports whether it expired during this update.
    #[must_use]
    pub fn on_update(&mut self, delta: Duration) -> bool {
        if self.paused {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(delta);
        if self.elapsed < self.wait_time {
            return false;
        }

        let report = !self.one_shot || !self.fired;
        self.fired = true;
        self.elapsed = self.elapsed.saturating_sub(self.wait_time);
        report
    }

    /// Configured wait time between expiries.
    #[must_use]
    pub const fn wait_time(&self) -> Duration {
        self.wait_time
    }

    /// Time accumulated toward the next expiry.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Time still required before the accumulator reaches the wait time.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.wait_time.saturating_sub(self.elapsed)
    }

    /// Reports whether the timer only fires once per restart.
    #[must_use]
    pub const fn is_one_shot(&self) -> bool {
        self.one_shot
    }

    /// Reports whether accumulation is suspended.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Converts a configured number of seconds into a [`Duration`].
///
/// Negative and NaN inputs collapse to zero, values too large to represent
/// saturate at [`Duration::MAX`].
#[must_use]
pub fn duration_from_secs(seconds: f32) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(seconds).unwrap_or(Duration::MAX)
}
