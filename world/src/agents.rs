use std::time::Duration;

use maze_chase_core::{
    CellCoord, Direction, GhostId, GhostMode, GhostSnapshot, Personality, PlayerSnapshot,
    TargetPoint,
};

const SPAWN_DIRECTION: Direction = Direction::Left;

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) cell: CellCoord,
    pub(crate) direction: Direction,
    pub(crate) next_direction: Option<Direction>,
    pub(crate) accumulator: Duration,
}

impl Player {
    pub(crate) fn spawn(cell: CellCoord) -> Self {
        Self {
            cell,
            direction: SPAWN_DIRECTION,
            next_direction: None,
            accumulator: Duration::ZERO,
        }
    }

    pub(crate) fn snapshot(&self, step: Duration) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: self.cell,
            direction: self.direction,
            next_direction: self.next_direction,
            ready_for_step: self.accumulator >= step,
            accumulated: self.accumulator,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Ghost {
    pub(crate) id: GhostId,
    pub(crate) personality: Personality,
    pub(crate) cell: CellCoord,
    pub(crate) direction: Direction,
    pub(crate) mode: GhostMode,
    pub(crate) target: Option<TargetPoint>,
    pub(crate) scatter_corner: TargetPoint,
    pub(crate) in_house: bool,
    pub(crate) house_exit_timer: Duration,
    pub(crate) accumulator: Duration,
    pub(crate) reverse_pending: bool,
}

impl Ghost {
    pub(crate) fn spawn(
        personality: Personality,
        home: CellCoord,
        scatter_corner: TargetPoint,
        house_exit_timer: Duration,
    ) -> Self {
        Self {
            id: personality.ghost_id(),
            personality,
            cell: home,
            direction: Direction::Up,
            mode: GhostMode::Scatter,
            target: None,
            scatter_corner,
            in_house: true,
            house_exit_timer,
            accumulator: Duration::ZERO,
            reverse_pending: false,
        }
    }

    pub(crate) fn release(&mut self, entrance: CellCoord, mode: GhostMode) {
        self.cell = entrance;
        self.direction = SPAWN_DIRECTION;
        self.in_house = false;
        self.house_exit_timer = Duration::ZERO;
        self.accumulator = Duration::ZERO;
        self.mode = mode;
    }

    pub(crate) fn revive(&mut self, mode: GhostMode) {
        self.mode = mode;
        self.target = None;
    }

    pub(crate) fn snapshot(&self, step: Duration) -> GhostSnapshot {
        GhostSnapshot {
            id: self.id,
            personality: self.personality,
            cell: self.cell,
            direction: self.direction,
            mode: self.mode,
            target: self.target,
            scatter_corner: self.scatter_corner,
            in_house: self.in_house,
            reverse_pending: self.reverse_pending,
            ready_for_step: !self.in_house && self.accumulator >= step,
            accumulated: self.accumulator,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct PowerMode {
    pub(crate) remaining: Duration,
    pub(crate) chain_count: u32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Fruit {
    pub(crate) cell: CellCoord,
    pub(crate) points: u32,
    pub(crate) remaining: Duration,
}

/// Adds `dt` to a move accumulator.
///
/// An agent that is ready but does not move keeps at most one tick of time
/// beyond a full step, so it never bursts several cells after standing still.
pub(crate) fn accumulate(accumulator: Duration, dt: Duration, step: Duration) -> Duration {
    accumulator.saturating_add(dt).min(step.saturating_add(dt))
}
