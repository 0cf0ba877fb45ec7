//! Gameplay tuning shared by the world, the systems and the host.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{GhostMode, Personality};

/// Classic fruit values by level; the last entry repeats.
const FRUIT_POINTS: [u32; 13] = [
    100, 300, 500, 500, 700, 700, 1_000, 1_000, 2_000, 2_000, 3_000, 3_000, 5_000,
];

/// Adjustable constants controlling pacing and scoring.
///
/// Durations are stored in milliseconds so the structure maps directly onto
/// configuration files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fixed simulation ticks per second.
    pub tick_rate_hz: u32,
    /// Length of the scatter phase.
    pub scatter_ms: u64,
    /// Length of the chase phase.
    pub chase_ms: u64,
    /// Frightened time granted by a power pellet on level one.
    pub power_ms: u64,
    /// Amount the frightened time shrinks with every level.
    pub power_decay_ms: u64,
    /// Shortest frightened time any level grants.
    pub power_floor_ms: u64,
    /// Time the player needs per cell.
    pub player_step_ms: u64,
    /// Time a scattering or chasing ghost needs per cell.
    pub ghost_step_ms: u64,
    /// Time a frightened ghost needs per cell.
    pub frightened_step_ms: u64,
    /// Time an eaten ghost needs per cell.
    pub eaten_step_ms: u64,
    /// Delay before each ghost leaves the house, in personality order.
    pub house_exit_ms: [u64; 4],
    /// Points for a dot.
    pub dot_points: u32,
    /// Points for a power pellet.
    pub pellet_points: u32,
    /// Points for the first ghost of a power chain; doubles with every ghost.
    pub ghost_base_points: u32,
    /// Dots eaten within a level at which a fruit appears.
    pub fruit_thresholds: Vec<u32>,
    /// Time a fruit stays on the board.
    pub fruit_lifetime_ms: u64,
    /// Lives at the start of a game.
    pub starting_lives: u32,
    /// Score at which one extra life is awarded; zero disables the award.
    pub extra_life_score: u32,
    /// Cells the ambusher looks ahead of the player.
    pub ambusher_lookahead: u32,
    /// Distance, in cells, beyond which the opportunist pursues.
    pub opportunist_radius: u32,
    /// Seed for frightened wandering.
    pub rng_seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            scatter_ms: 7_000,
            chase_ms: 20_000,
            power_ms: 6_000,
            power_decay_ms: 500,
            power_floor_ms: 1_000,
            player_step_ms: 125,
            ghost_step_ms: 135,
            frightened_step_ms: 220,
            eaten_step_ms: 60,
            house_exit_ms: [0, 2_000, 4_000, 6_000],
            dot_points: 10,
            pellet_points: 50,
            ghost_base_points: 200,
            fruit_thresholds: vec![70, 170],
            fruit_lifetime_ms: 9_500,
            starting_lives: 3,
            extra_life_score: 10_000,
            ambusher_lookahead: 4,
            opportunist_radius: 8,
            rng_seed: 0x5eed_c0de_2bad_f00d,
        }
    }
}

impl Tuning {
    /// Checks the values the simulation divides by or loops on.
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.tick_rate_hz == 0 {
            return Err(TuningError::ZeroTickRate);
        }
        if self.scatter_ms == 0 || self.chase_ms == 0 {
            return Err(TuningError::ZeroPhase);
        }
        let steps = [
            ("player_step_ms", self.player_step_ms),
            ("ghost_step_ms", self.ghost_step_ms),
            ("frightened_step_ms", self.frightened_step_ms),
            ("eaten_step_ms", self.eaten_step_ms),
        ];
        if let Some(&(name, _)) = steps.iter().find(|(_, value)| *value == 0) {
            return Err(TuningError::ZeroStep { name });
        }
        Ok(())
    }

    /// Length of one fixed simulation tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.max(1)
    }

    /// Length of the scatter phase.
    #[must_use]
    pub const fn scatter_duration(&self) -> Duration {
        Duration::from_millis(self.scatter_ms)
    }

    /// Length of the chase phase.
    #[must_use]
    pub const fn chase_duration(&self) -> Duration {
        Duration::from_millis(self.chase_ms)
    }

    /// Frightened time granted by a pellet on the one-based `level`.
    #[must_use]
    pub fn power_duration(&self, level: u32) -> Duration {
        let decay = self
            .power_decay_ms
            .saturating_mul(u64::from(level.saturating_sub(1)));
        let floor = self.power_floor_ms.min(self.power_ms);
        Duration::from_millis(self.power_ms.saturating_sub(decay).max(floor))
    }

    /// Time the player needs per cell.
    #[must_use]
    pub const fn player_step(&self) -> Duration {
        Duration::from_millis(self.player_step_ms)
    }

    /// Time a ghost in `mode` needs per cell.
    #[must_use]
    pub const fn ghost_step(&self, mode: GhostMode) -> Duration {
        Duration::from_millis(match mode {
            GhostMode::Scatter | GhostMode::Chase => self.ghost_step_ms,
            GhostMode::Frightened => self.frightened_step_ms,
            GhostMode::Eaten => self.eaten_step_ms,
        })
    }

    /// Delay before the ghost with `personality` leaves the house.
    #[must_use]
    pub const fn house_exit_delay(&self, personality: Personality) -> Duration {
        Duration::from_millis(self.house_exit_ms[personality.index()])
    }

    /// Time a fruit stays on the board.
    #[must_use]
    pub const fn fruit_lifetime(&self) -> Duration {
        Duration::from_millis(self.fruit_lifetime_ms)
    }

    /// Points for the fruit shown on the one-based `level`.
    #[must_use]
    pub fn fruit_points(&self, level: u32) -> u32 {
        let index = usize::try_from(level.saturating_sub(1)).unwrap_or(usize::MAX);
        FRUIT_POINTS[index.min(FRUIT_POINTS.len() - 1)]
    }
}

/// Tuning values the simulation cannot run with.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TuningError {
    /// The tick rate was zero.
    #[error("tick_rate_hz must be positive")]
    ZeroTickRate,
    /// A scatter or chase phase had zero length.
    #[error("scatter_ms and chase_ms must be positive")]
    ZeroPhase,
    /// A step interval was zero.
    #[error("{name} must be positive")]
    ZeroStep {
        /// Name of the offending field.
        name: &'static str,
    },
}
