#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scatter/chase scheduler that emits global phase changes.

use std::time::Duration;

use maze_chase_core::{Command, Event, Phase};

/// Result of advancing the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseUpdate {
    /// Phase after the advance.
    pub phase: Phase,
    /// Whether the advance crossed a phase boundary.
    pub changed: bool,
}

/// Pure system alternating between scatter and chase phases.
#[derive(Clone, Debug)]
pub struct ModeScheduler {
    scatter: Duration,
    chase: Duration,
    elapsed: Duration,
    phase: Phase,
}

impl ModeScheduler {
    /// Creates a scheduler starting at the beginning of a scatter phase.
    #[must_use]
    pub fn new(scatter: Duration, chase: Duration) -> Self {
        Self {
            scatter,
            chase,
            elapsed: Duration::ZERO,
            phase: Phase::Scatter,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time elapsed within the current scatter/chase cycle.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Restarts the cycle at scatter.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.phase = Phase::Scatter;
    }

    /// Advances the cycle by `dt`.
    pub fn tick(&mut self, dt: Duration) -> PhaseUpdate {
        let cycle = self.scatter.saturating_add(self.chase);
        if cycle.is_zero() {
            return PhaseUpdate {
                phase: self.phase,
                changed: false,
            };
        }

        let cycle_nanos = cycle.as_nanos();
        let elapsed_nanos = (self.elapsed.as_nanos() + dt.as_nanos()) % cycle_nanos;
        self.elapsed = Duration::from_nanos(u64::try_from(elapsed_nanos).unwrap_or(u64::MAX));

        let phase = if self.elapsed < self.scatter {
            Phase::Scatter
        } else {
            Phase::Chase
        };
        let changed = phase != self.phase;
        self.phase = phase;
        PhaseUpdate { phase, changed }
    }

    /// Consumes world events and emits a phase command whenever the phase flips.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::LevelStarted { .. } | Event::LifeLost { .. } => self.reset(),
                Event::TimeAdvanced { dt } => {
                    let update = self.tick(*dt);
                    if update.changed {
                        out.push(Command::SetGlobalPhase {
                            phase: update.phase,
                        });
                    }
                }
                _ => {}
            }
        }
    }
}

impl Default for ModeScheduler {
    fn default() -> Self {
        Self::new(Duration::from_secs(7), Duration::from_secs(20))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_scatter_boundary_is_chase() {
        let mut scheduler = ModeScheduler::default();
        let update = scheduler.tick(Duration::from_millis(6_999));
        assert_eq!(
            update,
            PhaseUpdate {
                phase: Phase::Scatter,
                changed: false
            }
        );

        let update = scheduler.tick(Duration::from_millis(1));
        assert_eq!(
            update,
            PhaseUpdate {
                phase: Phase::Chase,
                changed: true
            }
        );
        assert_eq!(scheduler.elapsed(), Duration::from_secs(7));
    }

    #[test]
    fn cycle_wraps_back_to_scatter() {
        let mut scheduler = ModeScheduler::default();
        let _ = scheduler.tick(Duration::from_secs(7));
        let update = scheduler.tick(Duration::from_secs(20));
        assert_eq!(
            update,
            PhaseUpdate {
                phase: Phase::Scatter,
                changed: true
            }
        );
        assert_eq!(scheduler.elapsed(), Duration::ZERO);
    }

    #[test]
    fn reset_restarts_scatter() {
        let mut scheduler = ModeScheduler::default();
        let _ = scheduler.tick(Duration::from_secs(10));
        scheduler.reset();
        assert_eq!(scheduler.phase(), Phase::Scatter);
        assert_eq!(scheduler.elapsed(), Duration::ZERO);
    }
}
