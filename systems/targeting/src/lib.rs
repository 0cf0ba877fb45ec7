#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Target selection for ghosts, keyed by mode and personality.

use maze_chase_core::{
    CellCoord, ChaseStrategy, GhostMode, GhostSnapshot, GhostTarget, GhostView, Personality,
    PlayerSnapshot, TargetPoint,
};

/// Configuration parameters required to construct the targeting system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    ambusher_lookahead: u32,
    opportunist_radius: u32,
}

impl Config {
    /// Creates a configuration from the ambusher lookahead and opportunist radius, in cells.
    #[must_use]
    pub const fn new(ambusher_lookahead: u32, opportunist_radius: u32) -> Self {
        Self {
            ambusher_lookahead,
            opportunist_radius,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(4, 8)
    }
}

/// Computes the target for `ghost`.
///
/// `chaser` is the cell of the chaser-personality ghost, if one exists; the
/// flanker mirrors it through the player. Frightened ghosts have no target.
#[must_use]
pub fn select_target(
    config: &Config,
    ghost: &GhostSnapshot,
    player: &PlayerSnapshot,
    chaser: Option<CellCoord>,
    house_entrance: CellCoord,
) -> Option<TargetPoint> {
    match ghost.mode {
        GhostMode::Scatter => Some(ghost.scatter_corner),
        GhostMode::Frightened => None,
        GhostMode::Eaten => Some(TargetPoint::from_cell(house_entrance)),
        GhostMode::Chase => Some(chase_target(config, ghost, player, chaser)),
    }
}

fn chase_target(
    config: &Config,
    ghost: &GhostSnapshot,
    player: &PlayerSnapshot,
    chaser: Option<CellCoord>,
) -> TargetPoint {
    let player_cell = TargetPoint::from_cell(player.cell);
    match ghost.personality.profile().strategy {
        ChaseStrategy::Pursue => player_cell,
        ChaseStrategy::Ambush => {
            let lookahead = i32::try_from(config.ambusher_lookahead).unwrap_or(i32::MAX);
            player_cell.offset(player.direction, lookahead)
        }
        ChaseStrategy::Flank => match chaser {
            Some(chaser) => {
                let chaser = TargetPoint::from_cell(chaser);
                TargetPoint::new(
                    2 * player_cell.column() - chaser.column(),
                    2 * player_cell.row() - chaser.row(),
                )
            }
            None => player_cell,
        },
        ChaseStrategy::KeepDistance => {
            let radius = i64::from(config.opportunist_radius);
            if player_cell.distance_squared_to(ghost.cell) > radius * radius {
                player_cell
            } else {
                ghost.scatter_corner
            }
        }
    }
}

/// Pure system that assigns targets to the ghosts about to step.
#[derive(Debug, Default)]
pub struct Targeting {
    config: Config,
}

impl Targeting {
    /// Creates a new targeting system.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Emits a target for every released ghost that is ready to step.
    pub fn handle(
        &self,
        ghost_view: &GhostView,
        player: &PlayerSnapshot,
        house_entrance: CellCoord,
        out: &mut Vec<GhostTarget>,
    ) {
        let chaser = ghost_view
            .by_personality(Personality::Chaser)
            .map(|ghost| ghost.cell);

        for ghost in ghost_view
            .iter()
            .filter(|ghost| ghost.ready_for_step && !ghost.in_house)
        {
            out.push(GhostTarget {
                ghost: ghost.id,
                target: select_target(&self.config, ghost, player, chaser, house_entrance),
            });
        }
    }
}
