use std::time::Duration;

/// Fixed-timestep accumulator that decides when a movement tick is due.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TickClock {
    interval: Duration,
    accumulated: Duration,
}

impl TickClock {
    /// Creates an empty clock that ticks every `interval`.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
        }
    }

    /// Adds `delta` and returns true when one tick is due.
    ///
    /// At most one tick is reported per call. The time past the interval is
    /// carried into the next tick, capped below one interval.
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.accumulated = self.accumulated.saturating_add(delta);
        if self.accumulated < self.interval {
            return false;
        }

        let remainder = self.accumulated - self.interval;
        self.accumulated = remainder.min(self.interval.saturating_sub(Duration::from_nanos(1)));
        true
    }

    /// Drops any accumulated time.
    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }

    /// Returns the time carried towards the next tick.
    #[must_use]
    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    /// Returns the time per movement step.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
