#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Chase adapters.

use std::{fmt, io::Write};

use anyhow::{Context, Result as AnyResult};
use maze_chase_core::{
    CellCoord, GhostMode, GhostSnapshot, Personality, Phase, PlayMode, Tile, WorldSnapshot,
};
use maze_chase_world::Maze;

const PLAYER_GLYPH: char = '@';
const FRUIT_GLYPH: char = '%';
const FRIGHTENED_GLYPH: char = '~';
const EATEN_GLYPH: char = '^';

/// Glyph used for a maze tile.
#[must_use]
pub const fn tile_glyph(tile: Tile) -> char {
    match tile {
        Tile::Wall => '#',
        Tile::Empty => ' ',
        Tile::Dot => '.',
        Tile::PowerPellet => 'o',
        Tile::GhostHouse => '=',
    }
}

/// Glyph used for a ghost, reflecting its mode.
#[must_use]
pub const fn ghost_glyph(ghost: &GhostSnapshot) -> char {
    match ghost.mode {
        GhostMode::Frightened => FRIGHTENED_GLYPH,
        GhostMode::Eaten => EATEN_GLYPH,
        GhostMode::Scatter | GhostMode::Chase => match ghost.personality {
            Personality::Chaser => 'A',
            Personality::Ambusher => 'B',
            Personality::Flanker => 'C',
            Personality::Opportunist => 'D',
        },
    }
}

/// Status line drawn below the maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Accumulated score.
    pub score: u32,
    /// Lives left.
    pub lives: u32,
    /// One-based level number.
    pub level: u32,
    /// Global scatter/chase phase.
    pub phase: Phase,
    /// Frightened time left in milliseconds, if a power mode is active.
    pub power_ms: Option<u128>,
    /// Whether the simulation is paused.
    pub paused: bool,
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self.phase {
            Phase::Scatter => "scatter",
            Phase::Chase => "chase",
        };
        write!(
            f,
            "score {:>6}  lives {}  level {}  {phase}",
            self.score, self.lives, self.level
        )?;
        if let Some(remaining) = self.power_ms {
            write!(f, "  frightened {remaining}ms")?;
        }
        if self.paused {
            write!(f, "  [paused]")?;
        }
        Ok(())
    }
}

/// Character grid composed from the maze and a world snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    columns: usize,
    cells: Vec<char>,
    /// Status line.
    pub hud: Hud,
}

impl Scene {
    /// Composes a scene; the player is drawn above ghosts, ghosts above fruit.
    #[must_use]
    pub fn compose(maze: &Maze, snapshot: &WorldSnapshot) -> Self {
        let columns = usize::try_from(maze.columns()).unwrap_or(0);
        let cells = maze
            .rows_iter()
            .flat_map(|row| row.iter().copied().map(tile_glyph))
            .collect();

        let mut scene = Self {
            columns,
            cells,
            hud: Hud {
                score: snapshot.score,
                lives: snapshot.lives,
                level: snapshot.level,
                phase: snapshot.phase,
                power_ms: snapshot.power.map(|power| power.remaining.as_millis()),
                paused: snapshot.play_mode == PlayMode::Paused,
            },
        };

        if let Some(fruit) = snapshot.fruit {
            scene.put(fruit.cell, FRUIT_GLYPH);
        }
        for ghost in snapshot.ghosts.iter().filter(|ghost| !ghost.in_house) {
            scene.put(ghost.cell, ghost_glyph(ghost));
        }
        scene.put(snapshot.player.cell, PLAYER_GLYPH);
        scene
    }

    /// Glyph drawn at `cell`, if inside the grid.
    #[must_use]
    pub fn glyph_at(&self, cell: CellCoord) -> Option<char> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    fn put(&mut self, cell: CellCoord, glyph: char) {
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            *slot = glyph;
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        (column < self.columns).then(|| row * self.columns + column)
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns > 0 {
            for row in self.cells.chunks(self.columns) {
                let line: String = row.iter().collect();
                writeln!(f, "{}", line.trim_end())?;
            }
        }
        write!(f, "{}", self.hud)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title shown above the frame.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Chase frames.
pub trait RenderingBackend {
    /// Presents one frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Backend writing frames as plain text.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
}

impl<W> TextBackend<W>
where
    W: Write,
{
    /// Creates a backend writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the backend, returning the writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> RenderingBackend for TextBackend<W>
where
    W: Write,
{
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        writeln!(
            self.writer,
            "{}\n{}\n",
            presentation.title, presentation.scene
        )
        .context("failed to write frame")?;
        self.writer.flush().context("failed to flush frame")
    }
}
