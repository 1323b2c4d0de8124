//! Time sources and the session safety bound.
//!
//! The mood loop reads time through [`Clock`] so tests can drive it with a
//! [`ManualClock`] that advances only when the loop sleeps.  [`SessionDeadline`]
//! holds the monotonic start of a session and its maximum length.

use std::time::{Duration, Instant};

/// Monotonic time plus the loop's only suspension point.
pub trait Clock {
    fn now(&self) -> Instant;

    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock implementation backed by [`Instant`] and `thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Simulated clock: time moves only through [`Clock::sleep`] and
/// [`ManualClock::advance`].
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Duration,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Duration::ZERO,
            sleeps: Vec::new(),
        }
    }

    /// Move time forward without recording a sleep, e.g. to model a slow
    /// network call.
    pub fn advance(&mut self, by: Duration) {
        self.offset += by;
    }

    /// Simulated time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        self.offset
    }

    /// Every sleep requested so far, in order.
    pub fn sleeps(&self) -> &[Duration] {
        &self.sleeps
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        self.offset += duration;
    }
}

/// Start instant and maximum length of one session.
#[derive(Debug, Clone, Copy)]
pub struct SessionDeadline {
    started: Instant,
    limit: Duration,
}

impl SessionDeadline {
    pub fn start(clock: &dyn Clock, limit: Duration) -> Self {
        Self {
            started: clock.now(),
            limit,
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn elapsed(&self, clock: &dyn Clock) -> Duration {
        clock.now().saturating_duration_since(self.started)
    }

    /// `true` once strictly more than `limit` has elapsed.
    pub fn expired(&self, clock: &dyn Clock) -> bool {
        self.elapsed(clock) > self.limit
    }
}
