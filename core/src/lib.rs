#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the message surface that connects the host loop, the
//! authoritative world, and pure systems. The host submits [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! external observers to react to. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.

mod layout;
mod tuning;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use layout::{LayoutError, LayoutProvider, LayoutTemplate};
pub use tuning::{Tuning, TuningError};

/// Describes whether the simulation currently accepts ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    /// Ticks advance every accumulator and timer.
    Running,
    /// Ticks are ignored so no accumulator or timer drifts.
    Paused,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the maze with a freshly built one and recreates every agent.
    LoadLevel {
        /// One-based level number being started.
        level: u32,
        /// Layout template the maze is built from.
        layout: LayoutTemplate,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Records the direction the input source would like the player to take.
    QueuePlayerDirection {
        /// Desired direction, applied as soon as it becomes legal.
        direction: Direction,
    },
    /// Requests that the player advance a single cell.
    StepPlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that a ghost advance a single cell.
    StepGhost {
        /// Identifier of the ghost attempting to move.
        ghost: GhostId,
        /// Direction of travel for the attempted step.
        direction: Direction,
        /// Target the direction was chosen against, recorded for observers.
        target: Option<TargetPoint>,
    },
    /// Announces the scheduler's phase so non-overridden ghosts can adopt it.
    SetGlobalPhase {
        /// Phase that became active.
        phase: Phase,
    },
    /// Requests that a frightened ghost sharing the player's cell be eaten.
    EatGhost {
        /// Identifier of the ghost to eat.
        ghost: GhostId,
    },
    /// Requests that the player lose a life after touching a hostile ghost.
    LoseLife,
    /// Awards the player an additional life.
    GrantExtraLife,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the simulation entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Confirms that a level was loaded and its agents were placed.
    LevelStarted {
        /// One-based level number.
        level: u32,
        /// Consumables the player must collect to clear the level.
        dots_remaining: u32,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
    },
    /// Confirms that a ghost moved between two cells.
    GhostMoved {
        /// Identifier of the ghost that moved.
        ghost: GhostId,
        /// Cell the ghost occupied before moving.
        from: CellCoord,
        /// Cell the ghost occupies after moving.
        to: CellCoord,
    },
    /// Reports that the player ate a dot.
    DotEaten {
        /// Cell the dot occupied.
        cell: CellCoord,
    },
    /// Reports that the player ate a power pellet.
    PelletEaten {
        /// Cell the pellet occupied.
        cell: CellCoord,
    },
    /// Reports that power mode was activated.
    PowerModeStarted {
        /// Time the ghosts remain frightened.
        duration: Duration,
    },
    /// Reports that power mode ran out.
    PowerModeEnded,
    /// Reports that the player ate a frightened ghost.
    GhostEaten {
        /// Identifier of the eaten ghost.
        ghost: GhostId,
        /// One-based position of the ghost within the current power chain.
        chain_index: u32,
    },
    /// Reports that an eaten ghost reached the house entrance and recovered.
    GhostRevived {
        /// Identifier of the recovered ghost.
        ghost: GhostId,
        /// Mode the ghost adopted on recovery.
        mode: GhostMode,
    },
    /// Reports that a ghost left the ghost house.
    GhostReleased {
        /// Identifier of the released ghost.
        ghost: GhostId,
        /// Cell the ghost was placed on.
        cell: CellCoord,
    },
    /// Announces that the global scatter/chase phase changed.
    ModeChanged {
        /// Phase that became active.
        phase: Phase,
    },
    /// Reports that a bonus fruit appeared.
    FruitSpawned {
        /// Cell holding the fruit.
        cell: CellCoord,
        /// Points awarded when the fruit is collected.
        points: u32,
    },
    /// Reports that the player collected the bonus fruit.
    FruitEaten {
        /// Cell the fruit occupied.
        cell: CellCoord,
        /// Points awarded for the fruit.
        points: u32,
    },
    /// Reports that the bonus fruit vanished uncollected.
    FruitExpired,
    /// Reports that the player lost a life; agents were reset.
    LifeLost {
        /// Lives left after the loss.
        lives_remaining: u32,
    },
    /// Reports that the player gained a life.
    ExtraLifeGranted {
        /// Lives available after the award.
        lives: u32,
    },
    /// Reports that the last consumable of the level was eaten.
    LevelComplete {
        /// One-based level number that was cleared.
        level: u32,
    },
    /// Reports that the player ran out of lives.
    GameOver,
}

/// Cardinal movement directions available to every agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Order in which equally good directions are preferred.
    ///
    /// Ghost behaviour in classic maze-chase games depends on this exact
    /// order, so candidate evaluation always walks it front to back.
    pub const PRIORITY: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Returns the direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit offset as `(column, row)`.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Lowercase name of the direction.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parses a direction from its name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::PRIORITY
            .into_iter()
            .find(|direction| direction.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Static kind of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable wall.
    Wall,
    /// Open floor with nothing to collect.
    Empty,
    /// Open floor holding a dot.
    Dot,
    /// Open floor holding a power pellet.
    PowerPellet,
    /// Floor of the ghost house, closed to the player and to ghosts roaming the maze.
    GhostHouse,
}

impl Tile {
    /// Reports whether agents roaming the maze may enter the tile.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Empty | Self::Dot | Self::PowerPellet)
    }

    /// Reports whether the tile holds something the player can eat.
    #[must_use]
    pub const fn is_consumable(self) -> bool {
        matches!(self, Self::Dot | Self::PowerPellet)
    }
}

/// Item removed from the maze when the player enters its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Consumable {
    /// Small dot.
    Dot,
    /// Power pellet that frightens the ghosts.
    PowerPellet,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the squared Euclidean distance between two cells.
    #[must_use]
    pub fn distance_squared(self, other: CellCoord) -> u64 {
        let dx = u64::from(self.column.abs_diff(other.column));
        let dy = u64::from(self.row.abs_diff(other.row));
        dx * dx + dy * dy
    }
}

/// Signed grid point used as a steering target; may lie outside the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetPoint {
    column: i32,
    row: i32,
}

impl TargetPoint {
    /// Creates a new target point.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column of the point, possibly negative.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row of the point, possibly negative.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Converts a grid cell into a target point.
    #[must_use]
    pub fn from_cell(cell: CellCoord) -> Self {
        Self {
            column: i32::try_from(cell.column()).unwrap_or(i32::MAX),
            row: i32::try_from(cell.row()).unwrap_or(i32::MAX),
        }
    }

    /// Moves the point `tiles` cells along `direction`.
    #[must_use]
    pub fn offset(self, direction: Direction, tiles: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            column: self.column.saturating_add(dx.saturating_mul(tiles)),
            row: self.row.saturating_add(dy.saturating_mul(tiles)),
        }
    }

    /// Squared Euclidean distance from the point to a grid cell.
    #[must_use]
    pub fn distance_squared_to(self, cell: CellCoord) -> i64 {
        let dx = i64::from(cell.column()) - i64::from(self.column);
        let dy = i64::from(cell.row()) - i64::from(self.row);
        dx * dx + dy * dy
    }
}

/// Unique identifier assigned to a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GhostId(u32);

impl GhostId {
    /// Creates a new ghost identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Fixed targeting strategy assigned to a ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Personality {
    /// Pursues the player's current cell.
    Chaser,
    /// Aims ahead of the player.
    Ambusher,
    /// Mirrors the chaser around the player.
    Flanker,
    /// Pursues from afar and retreats when close.
    Opportunist,
}

impl Personality {
    /// Every personality in layout index order.
    pub const ALL: [Personality; 4] = [
        Personality::Chaser,
        Personality::Ambusher,
        Personality::Flanker,
        Personality::Opportunist,
    ];

    /// Zero-based index used by layouts and identifiers.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Chaser => 0,
            Self::Ambusher => 1,
            Self::Flanker => 2,
            Self::Opportunist => 3,
        }
    }

    /// Identifier of the ghost that plays this personality.
    #[must_use]
    pub const fn ghost_id(self) -> GhostId {
        GhostId::new(match self {
            Self::Chaser => 0,
            Self::Ambusher => 1,
            Self::Flanker => 2,
            Self::Opportunist => 3,
        })
    }

    /// Resolves a personality from its layout index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Constants that distinguish the personality.
    #[must_use]
    pub const fn profile(self) -> PersonalityProfile {
        match self {
            Self::Chaser => PersonalityProfile {
                corner: Corner::TopRight,
                strategy: ChaseStrategy::Pursue,
            },
            Self::Ambusher => PersonalityProfile {
                corner: Corner::TopLeft,
                strategy: ChaseStrategy::Ambush,
            },
            Self::Flanker => PersonalityProfile {
                corner: Corner::BottomRight,
                strategy: ChaseStrategy::Flank,
            },
            Self::Opportunist => PersonalityProfile {
                corner: Corner::BottomLeft,
                strategy: ChaseStrategy::KeepDistance,
            },
        }
    }
}

/// Per-personality constants consulted by the target selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PersonalityProfile {
    /// Corner the ghost retreats to while scattering.
    pub corner: Corner,
    /// Heuristic used while chasing.
    pub strategy: ChaseStrategy,
}

/// Chase-mode target heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChaseStrategy {
    /// Target the player's cell.
    Pursue,
    /// Target a cell ahead of the player along its direction.
    Ambush,
    /// Target the chaser's position mirrored through the player.
    Flank,
    /// Target the player only while far away, otherwise the scatter corner.
    KeepDistance,
}

/// Maze corner used as a scatter target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    /// Above the upper-left corner.
    TopLeft,
    /// Above the upper-right corner.
    TopRight,
    /// Below the lower-left corner.
    BottomLeft,
    /// Below the lower-right corner.
    BottomRight,
}

impl Corner {
    /// Resolves the corner into a target point for a maze of the given size.
    ///
    /// Upper corners sit three rows above the grid and lower corners one row
    /// below it, so ghosts circle the nearest block instead of parking.
    #[must_use]
    pub fn resolve(self, columns: u32, rows: u32) -> TargetPoint {
        let columns = i32::try_from(columns).unwrap_or(i32::MAX);
        let rows = i32::try_from(rows).unwrap_or(i32::MAX);
        match self {
            Self::TopLeft => TargetPoint::new(2, -3),
            Self::TopRight => TargetPoint::new(columns - 3, -3),
            Self::BottomLeft => TargetPoint::new(0, rows),
            Self::BottomRight => TargetPoint::new(columns - 1, rows),
        }
    }
}

/// Behavioural state of a single ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GhostMode {
    /// Retreating to the scatter corner.
    Scatter,
    /// Hunting the player with the personality heuristic.
    Chase,
    /// Wandering randomly; edible.
    Frightened,
    /// Returning to the ghost house; harmless.
    Eaten,
}

impl GhostMode {
    /// Reports whether the mode ignores scheduler phase changes.
    #[must_use]
    pub const fn is_overridden(self) -> bool {
        matches!(self, Self::Frightened | Self::Eaten)
    }
}

/// Phase of the global scatter/chase cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Ghosts head to their corners.
    Scatter,
    /// Ghosts hunt the player.
    Chase,
}

impl Phase {
    /// Ghost mode corresponding to the phase.
    #[must_use]
    pub const fn as_mode(self) -> GhostMode {
        match self {
            Self::Scatter => GhostMode::Scatter,
            Self::Chase => GhostMode::Chase,
        }
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Grid cell currently occupied by the player.
    pub cell: CellCoord,
    /// Direction of the most recent step, or the spawn heading.
    pub direction: Direction,
    /// Direction queued by the input source, if not yet adopted.
    pub next_direction: Option<Direction>,
    /// Indicates whether the player accrued enough time to advance.
    pub ready_for_step: bool,
    /// Duration accumulated toward the next step.
    pub accumulated: Duration,
}

/// Immutable representation of a single ghost used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostSnapshot {
    /// Unique identifier assigned to the ghost.
    pub id: GhostId,
    /// Targeting personality.
    pub personality: Personality,
    /// Grid cell currently occupied by the ghost.
    pub cell: CellCoord,
    /// Direction of the most recent step.
    pub direction: Direction,
    /// Current behavioural mode.
    pub mode: GhostMode,
    /// Target the last step was chosen against.
    pub target: Option<TargetPoint>,
    /// Fixed scatter target.
    pub scatter_corner: TargetPoint,
    /// Indicates whether the ghost is still waiting inside the house.
    pub in_house: bool,
    /// Indicates that the next step must reverse if possible.
    pub reverse_pending: bool,
    /// Indicates whether the ghost accrued enough time to advance.
    pub ready_for_step: bool,
    /// Duration accumulated toward the next step.
    pub accumulated: Duration,
}

/// Read-only snapshot describing all ghosts within the maze.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GhostView {
    snapshots: Vec<GhostSnapshot>,
}

impl GhostView {
    /// Creates a new ghost view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<GhostSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured ghost snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &GhostSnapshot> {
        self.snapshots.iter()
    }

    /// Finds the first ghost with the given personality.
    #[must_use]
    pub fn by_personality(&self, personality: Personality) -> Option<&GhostSnapshot> {
        self.snapshots
            .iter()
            .find(|snapshot| snapshot.personality == personality)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<GhostSnapshot> {
        self.snapshots
    }
}

/// Target chosen for a ghost during the current tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GhostTarget {
    /// Ghost the target belongs to.
    pub ghost: GhostId,
    /// Target cell; `None` while frightened.
    pub target: Option<TargetPoint>,
}

/// State of an active power mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerModeSnapshot {
    /// Time left before the ghosts recover.
    pub remaining: Duration,
    /// Ghosts eaten since the activation.
    pub chain_count: u32,
}

/// Bonus fruit currently on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FruitSnapshot {
    /// Cell holding the fruit.
    pub cell: CellCoord,
    /// Points awarded on collection.
    pub points: u32,
    /// Time left before the fruit vanishes.
    pub remaining: Duration,
}

/// Everything an observer needs to draw a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSnapshot {
    /// Player state.
    pub player: PlayerSnapshot,
    /// Ghost states in identifier order.
    pub ghosts: Vec<GhostSnapshot>,
    /// Active power mode, if any.
    pub power: Option<PowerModeSnapshot>,
    /// Bonus fruit, if present.
    pub fruit: Option<FruitSnapshot>,
    /// Current global scatter/chase phase.
    pub phase: Phase,
    /// Whether ticks are being accepted.
    pub play_mode: PlayMode,
    /// One-based level number.
    pub level: u32,
    /// Lives left.
    pub lives: u32,
    /// Accumulated score.
    pub score: u32,
    /// Consumables left in the maze.
    pub dots_remaining: u32,
}
