#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that resolves player and ghost steps.

use maze_chase_core::{
    CellCoord, Command, Direction, GhostMode, GhostSnapshot, GhostTarget, GhostView,
    PlayerSnapshot, TargetPoint,
};
use maze_chase_world::Maze;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Direction the player steps in this tick, if any.
///
/// A queued direction that opens onto a walkable cell wins; otherwise the
/// player keeps its heading while it remains walkable and stands still once
/// blocked.
#[must_use]
pub fn resolve_player_direction(player: &PlayerSnapshot, maze: &Maze) -> Option<Direction> {
    player
        .next_direction
        .into_iter()
        .chain(std::iter::once(player.direction))
        .find(|direction| maze.walkable_neighbor(player.cell, *direction).is_some())
}

/// Direction the ghost steps in this tick, if any.
///
/// Ghosts never turn back unless a reversal is pending or no other way is
/// open. Frightened ghosts (or ghosts without a target) pick uniformly among
/// the open ways; all others take the way whose next cell lies closest to
/// `target`, preferring [`Direction::PRIORITY`] order on ties.
pub fn choose_ghost_direction<R>(
    ghost: &GhostSnapshot,
    target: Option<TargetPoint>,
    maze: &Maze,
    rng: &mut R,
) -> Option<Direction>
where
    R: Rng + ?Sized,
{
    let back = ghost.direction.opposite();
    let can_reverse = maze.walkable_neighbor(ghost.cell, back).is_some();
    if ghost.reverse_pending && can_reverse {
        return Some(back);
    }

    let candidates: Vec<(Direction, CellCoord)> = Direction::PRIORITY
        .into_iter()
        .filter(|direction| *direction != back)
        .filter_map(|direction| {
            maze.walkable_neighbor(ghost.cell, direction)
                .map(|cell| (direction, cell))
        })
        .collect();

    if candidates.is_empty() {
        return can_reverse.then_some(back);
    }

    match target {
        Some(target) if ghost.mode != GhostMode::Frightened => candidates
            .iter()
            .min_by_key(|(_, cell)| target.distance_squared_to(*cell))
            .map(|(direction, _)| *direction),
        _ => candidates.choose(rng).map(|(direction, _)| *direction),
    }
}

/// Pure system that converts snapshots and targets into step commands.
#[derive(Debug)]
pub struct Movement {
    rng: ChaCha8Rng,
}

impl Movement {
    /// Creates a movement system whose frightened wandering follows `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits a player step when the player is ready and a way is open.
    pub fn handle_player(&mut self, player: &PlayerSnapshot, maze: &Maze, out: &mut Vec<Command>) {
        if !player.ready_for_step {
            return;
        }

        if let Some(direction) = resolve_player_direction(player, maze) {
            out.push(Command::StepPlayer { direction });
        }
    }

    /// Emits a step for every targeted ghost that is ready and has a way open.
    pub fn handle_ghosts(
        &mut self,
        ghost_view: &GhostView,
        targets: &[GhostTarget],
        maze: &Maze,
        out: &mut Vec<Command>,
    ) {
        for assignment in targets {
            let Some(ghost) = ghost_view.iter().find(|ghost| ghost.id == assignment.ghost) else {
                continue;
            };
            if !ghost.ready_for_step || ghost.in_house {
                continue;
            }

            if let Some(direction) =
                choose_ghost_direction(ghost, assignment.target, maze, &mut self.rng)
            {
                out.push(Command::StepGhost {
                    ghost: ghost.id,
                    direction,
                    target: assignment.target,
                });
            }
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{GhostId, LayoutTemplate, Personality};
    use std::time::Duration;

    const CROSS: &str = "\
#####
##P##
#...#
##E##
#####";

    const CORRIDOR: &str = "\
#######
#P...E#
#######";

    fn maze(text: &str) -> Maze {
        Maze::from_layout(&LayoutTemplate::parse(text).expect("layout parses"))
    }

    fn ghost_at(column: u32, row: u32, direction: Direction, mode: GhostMode) -> GhostSnapshot {
        GhostSnapshot {
            id: GhostId::new(0),
            personality: Personality::Chaser,
            cell: CellCoord::new(column, row),
            direction,
            mode,
            target: None,
            scatter_corner: TargetPoint::new(0, 0),
            in_house: false,
            reverse_pending: false,
            ready_for_step: true,
            accumulated: Duration::ZERO,
        }
    }

    fn choose(ghost: &GhostSnapshot, target: Option<TargetPoint>, maze: &Maze) -> Option<Direction> {
        choose_ghost_direction(ghost, target, maze, &mut ChaCha8Rng::seed_from_u64(7))
    }

    #[test]
    fn ties_follow_priority_order() {
        let maze = maze(CROSS);
        let centre = TargetPoint::new(2, 2);

        let heading_right = ghost_at(2, 2, Direction::Right, GhostMode::Chase);
        assert_eq!(choose(&heading_right, Some(centre), &maze), Some(Direction::Up));

        let heading_down = ghost_at(2, 2, Direction::Down, GhostMode::Chase);
        assert_eq!(choose(&heading_down, Some(centre), &maze), Some(Direction::Left));
    }

    #[test]
    fn target_behind_does_not_reverse() {
        let maze = maze(CORRIDOR);
        let ghost = ghost_at(3, 1, Direction::Right, GhostMode::Chase);
        assert_eq!(
            choose(&ghost, Some(TargetPoint::new(0, 1)), &maze),
            Some(Direction::Right)
        );
    }

    #[test]
    fn dead_end_forces_reversal() {
        let maze = maze(CORRIDOR);
        let ghost = ghost_at(5, 1, Direction::Right, GhostMode::Scatter);
        assert_eq!(
            choose(&ghost, Some(TargetPoint::new(9, 1)), &maze),
            Some(Direction::Left)
        );
    }

    #[test]
    fn pending_reversal_overrides_target() {
        let maze = maze(CORRIDOR);
        let mut ghost = ghost_at(3, 1, Direction::Right, GhostMode::Frightened);
        ghost.reverse_pending = true;
        assert_eq!(choose(&ghost, None, &maze), Some(Direction::Left));
    }

    #[test]
    fn enclosed_ghost_stays_put() {
        let maze = maze("#####\n#P#E#\n#####");
        let ghost = ghost_at(1, 1, Direction::Left, GhostMode::Chase);
        assert_eq!(choose(&ghost, Some(TargetPoint::new(3, 1)), &maze), None);
    }

    #[test]
    fn ghosts_wrap_through_tunnels() {
        let maze = maze("#####\nTPE.T\n#####");
        let ghost = ghost_at(4, 1, Direction::Right, GhostMode::Chase);
        assert_eq!(
            choose(&ghost, Some(TargetPoint::new(1, 1)), &maze),
            Some(Direction::Right)
        );
    }

    #[test]
    fn player_prefers_queued_direction() {
        let maze = maze(CROSS);
        let player = PlayerSnapshot {
            cell: CellCoord::new(2, 2),
            direction: Direction::Left,
            next_direction: Some(Direction::Down),
            ready_for_step: true,
            accumulated: Duration::ZERO,
        };
        assert_eq!(resolve_player_direction(&player, &maze), Some(Direction::Down));
    }

    #[test]
    fn blocked_player_stands_still() {
        let maze = maze(CORRIDOR);
        let player = PlayerSnapshot {
            cell: CellCoord::new(1, 1),
            direction: Direction::Left,
            next_direction: Some(Direction::Up),
            ready_for_step: true,
            accumulated: Duration::ZERO,
        };
        assert_eq!(resolve_player_direction(&player, &maze), None);
    }
}
