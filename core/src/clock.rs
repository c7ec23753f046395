//! Monotonic time sources consumed by clock-gated timers.
//!
//! The engine keeps two timing domains apart. Ability windows, phase
//! durations and fire-rate gates read [`Clock::now`]; movement and visual
//! effect ageing accumulate the per-frame `dt` handed to `update`.

use std::{cell::Cell, rc::Rc, time::Duration, time::Instant};

/// Source of monotonic timestamps measured from an arbitrary origin.
pub trait Clock {
    /// Returns the time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Clock backed by [`Instant`], suitable for interactive drivers.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose origin is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock for tests and headless replays.
///
/// Clones share the same underlying timestamp, so a driver can keep one
/// handle while the simulation owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Creates a manual clock starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `dt`.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get().saturating_add(dt));
    }

    /// Jumps the clock to an absolute timestamp.
    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
