#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Score keeping and the extra-life award.

use maze_chase_core::{Command, Event, Tuning};

/// Point values consulted by the scoring system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    dot_points: u32,
    pellet_points: u32,
    ghost_base_points: u32,
    extra_life_score: u32,
}

impl Config {
    /// Creates a configuration; an `extra_life_score` of zero disables the award.
    #[must_use]
    pub const fn new(
        dot_points: u32,
        pellet_points: u32,
        ghost_base_points: u32,
        extra_life_score: u32,
    ) -> Self {
        Self {
            dot_points,
            pellet_points,
            ghost_base_points,
            extra_life_score,
        }
    }
}

impl From<&Tuning> for Config {
    fn from(tuning: &Tuning) -> Self {
        Self::new(
            tuning.dot_points,
            tuning.pellet_points,
            tuning.ghost_base_points,
            tuning.extra_life_score,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from(&Tuning::default())
    }
}

/// Points for the ghost eaten at one-based `chain_index` within a power mode.
///
/// Each ghost in the chain is worth twice the previous one.
#[must_use]
pub fn ghost_points(base: u32, chain_index: u32) -> u32 {
    let multiplier = 1_u32
        .checked_shl(chain_index.saturating_sub(1))
        .unwrap_or(u32::MAX);
    base.saturating_mul(multiplier)
}

/// System that accumulates the score from world events.
#[derive(Debug, Default)]
pub struct Scoring {
    config: Config,
    score: u32,
    extra_life_awarded: bool,
}

impl Scoring {
    /// Creates a scoring system with a zero score.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            score: 0,
            extra_life_awarded: false,
        }
    }

    /// Score accumulated so far.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Consumes world events, emitting an extra-life command when the score
    /// first reaches the configured threshold.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            let points = match event {
                Event::DotEaten { .. } => self.config.dot_points,
                Event::PelletEaten { .. } => self.config.pellet_points,
                Event::GhostEaten { chain_index, .. } => {
                    ghost_points(self.config.ghost_base_points, *chain_index)
                }
                Event::FruitEaten { points, .. } => *points,
                _ => continue,
            };
            self.score = self.score.saturating_add(points);
        }

        let threshold = self.config.extra_life_score;
        if !self.extra_life_awarded && threshold > 0 && self.score >= threshold {
            self.extra_life_awarded = true;
            out.push(Command::GrantExtraLife);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghost_points_double_along_the_chain() {
        assert_eq!(ghost_points(200, 1), 200);
        assert_eq!(ghost_points(200, 2), 400);
        assert_eq!(ghost_points(200, 3), 800);
        assert_eq!(ghost_points(200, 4), 1_600);
    }

    #[test]
    fn ghost_points_saturate() {
        assert_eq!(ghost_points(200, 40), u32::MAX);
    }
}
