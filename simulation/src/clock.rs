use std::time::Duration;

/// Most ticks a single frame may trigger; time beyond that is dropped.
pub const MAX_CATCH_UP_TICKS: u32 = 8;

/// Converts variable frame time into a whole number of fixed ticks.
#[derive(Clone, Debug)]
pub struct FixedStep {
    tick: Duration,
    pending: Duration,
}

impl FixedStep {
    /// Creates a clock producing ticks of length `tick`.
    #[must_use]
    pub fn new(tick: Duration) -> Self {
        Self {
            tick,
            pending: Duration::ZERO,
        }
    }

    /// Length of one tick.
    #[must_use]
    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Frame time not yet converted into ticks.
    #[must_use]
    pub fn pending(&self) -> Duration {
        self.pending
    }

    /// Discards pending frame time.
    pub fn reset(&mut self) {
        self.pending = Duration::ZERO;
    }

    /// Adds `frame_dt` and returns the number of ticks now due.
    ///
    /// At most [`MAX_CATCH_UP_TICKS`] are returned; when more were due the
    /// remainder is discarded together with the leftover fraction.
    pub fn accumulate(&mut self, frame_dt: Duration) -> u32 {
        if self.tick.is_zero() {
            return 0;
        }

        self.pending = self.pending.saturating_add(frame_dt);
        let due = self.pending.as_nanos() / self.tick.as_nanos();
        let due = u32::try_from(due).unwrap_or(u32::MAX);

        if due > MAX_CATCH_UP_TICKS {
            self.pending = Duration::ZERO;
            return MAX_CATCH_UP_TICKS;
        }

        self.pending = self.pending.saturating_sub(self.tick * due);
        due
    }
}
