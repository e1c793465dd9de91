//! Tick-driven countdown records.
//!
//! Every "wait N seconds" behaviour in the engine (repairs, parry windows,
//! cooldowns, grace periods) is a [`Timer`] polled from `advance`. Timers
//! only move when the engine is advanced, so a run is fully reproducible
//! from its sequence of time deltas.

use std::time::Duration;

/// Countdown that expires after a fixed amount of accumulated time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timer {
    remaining: Duration,
}

impl Timer {
    pub const fn new(duration: Duration) -> Self {
        Self { remaining: duration }
    }

    /// An already expired timer.
    pub const fn expired() -> Self {
        Self {
            remaining: Duration::ZERO,
        }
    }

    /// Consumes `dt` and reports whether the timer is now expired.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        self.is_expired()
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.remaining.is_zero()
    }

    #[inline]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Restarts the countdown with a new duration.
    pub fn reset(&mut self, duration: Duration) {
        self.remaining = duration;
    }
}

/// Converts a non-negative number of seconds into a [`Duration`].
///
/// Negative and non-finite inputs collapse to zero.
pub fn secs(value: f32) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f32(value)
    } else {
        Duration::ZERO
    }
}

/// Divides a duration by a speed factor, treating tiny factors as `floor`.
pub fn scaled(duration: Duration, factor: f32, floor: f32) -> Duration {
    duration.div_f32(factor.max(floor))
}
