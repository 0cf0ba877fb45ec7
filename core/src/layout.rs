//! Level layout templates and their text representation.

use std::str::FromStr;

use thiserror::Error;

use crate::{CellCoord, Personality, Tile};

/// Supplies the layout for each level.
pub trait LayoutProvider {
    /// Returns the layout for the one-based `level`.
    fn layout(&self, level: u32) -> Result<LayoutTemplate, LayoutError>;
}

/// Every level reuses the same template.
impl LayoutProvider for LayoutTemplate {
    fn layout(&self, _level: u32) -> Result<LayoutTemplate, LayoutError> {
        Ok(self.clone())
    }
}

/// Errors reported while parsing a text layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The text contained no rows.
    #[error("layout is empty")]
    Empty,
    /// A row was shorter or longer than the first row.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: u32,
        /// Width of the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// The text contained a character with no meaning.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based column.
        column: u32,
        /// Zero-based row.
        row: u32,
    },
    /// A tunnel mouth was placed away from the grid edge.
    #[error("tunnel mouth at column {column}, row {row} is not on the grid edge")]
    MisplacedTunnel {
        /// Zero-based column.
        column: u32,
        /// Zero-based row.
        row: u32,
    },
    /// No player start cell was marked.
    #[error("layout has no player start")]
    MissingPlayerStart,
    /// More than one player start cell was marked.
    #[error("layout has more than one player start")]
    DuplicatePlayerStart,
    /// No ghost house entrance was marked.
    #[error("layout has no ghost house entrance")]
    MissingHouseEntrance,
    /// More than one ghost house entrance was marked.
    #[error("layout has more than one ghost house entrance")]
    DuplicateHouseEntrance,
    /// The same ghost start digit appeared twice.
    #[error("ghost {index} has more than one start cell")]
    DuplicateGhostStart {
        /// Layout index of the ghost.
        index: usize,
    },
}

/// Static description of a level, produced by a layout provider.
///
/// Glyphs: `#` wall, `.` dot, `o` power pellet, space empty floor, `=` ghost
/// house floor, `0`-`3` ghost start on the house floor, `E` house entrance,
/// `P` player start, `F` fruit cell and `T` tunnel mouth on the grid edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutTemplate {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
    player_start: CellCoord,
    house_entrance: CellCoord,
    fruit_cell: Option<CellCoord>,
    ghost_starts: Vec<(Personality, CellCoord)>,
    tunnel_rows: Vec<u32>,
    tunnel_columns: Vec<u32>,
}

impl LayoutTemplate {
    /// Parses a layout from its text representation.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut lines: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
        while lines.first().is_some_and(|line| line.is_empty()) {
            let _ = lines.remove(0);
        }
        while lines.last().is_some_and(|line| line.is_empty()) {
            let _ = lines.pop();
        }
        if lines.is_empty() {
            return Err(LayoutError::Empty);
        }

        let columns = to_u32(lines[0].chars().count());
        let rows = to_u32(lines.len());
        if columns == 0 {
            return Err(LayoutError::Empty);
        }

        let mut tiles = Vec::with_capacity(lines.len() * lines[0].len());
        let mut player_start = None;
        let mut house_entrance = None;
        let mut fruit_cell = None;
        let mut ghost_starts: Vec<(Personality, CellCoord)> = Vec::new();
        let mut tunnel_rows = Vec::new();
        let mut tunnel_columns = Vec::new();

        for (row_index, line) in lines.iter().enumerate() {
            let row = to_u32(row_index);
            let found = to_u32(line.chars().count());
            if found != columns {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected: columns,
                    found,
                });
            }

            for (column_index, glyph) in line.chars().enumerate() {
                let column = to_u32(column_index);
                let cell = CellCoord::new(column, row);
                let tile = match glyph {
                    '#' => Tile::Wall,
                    '.' => Tile::Dot,
                    'o' => Tile::PowerPellet,
                    ' ' => Tile::Empty,
                    '=' => Tile::GhostHouse,
                    'P' => {
                        if player_start.replace(cell).is_some() {
                            return Err(LayoutError::DuplicatePlayerStart);
                        }
                        Tile::Empty
                    }
                    'E' => {
                        if house_entrance.replace(cell).is_some() {
                            return Err(LayoutError::DuplicateHouseEntrance);
                        }
                        Tile::Empty
                    }
                    'F' => {
                        fruit_cell = Some(cell);
                        Tile::Empty
                    }
                    'T' => {
                        let mut edge = false;
                        if column == 0 || column + 1 == columns {
                            push_unique(&mut tunnel_rows, row);
                            edge = true;
                        }
                        if row == 0 || row + 1 == rows {
                            push_unique(&mut tunnel_columns, column);
                            edge = true;
                        }
                        if !edge {
                            return Err(LayoutError::MisplacedTunnel { column, row });
                        }
                        Tile::Empty
                    }
                    digit @ '0'..='3' => {
                        let index = digit as usize - '0' as usize;
                        let personality = Personality::from_index(index)
                            .ok_or(LayoutError::UnknownGlyph { glyph, column, row })?;
                        if ghost_starts.iter().any(|(existing, _)| *existing == personality) {
                            return Err(LayoutError::DuplicateGhostStart { index });
                        }
                        ghost_starts.push((personality, cell));
                        Tile::GhostHouse
                    }
                    _ => return Err(LayoutError::UnknownGlyph { glyph, column, row }),
                };
                tiles.push(tile);
            }
        }

        ghost_starts.sort_by_key(|(personality, _)| *personality);

        Ok(Self {
            columns,
            rows,
            tiles,
            player_start: player_start.ok_or(LayoutError::MissingPlayerStart)?,
            house_entrance: house_entrance.ok_or(LayoutError::MissingHouseEntrance)?,
            fruit_cell,
            ghost_starts,
            tunnel_rows,
            tunnel_columns,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tiles in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Cell the player spawns on.
    #[must_use]
    pub const fn player_start(&self) -> CellCoord {
        self.player_start
    }

    /// Cell directly outside the ghost house.
    #[must_use]
    pub const fn house_entrance(&self) -> CellCoord {
        self.house_entrance
    }

    /// Cell the bonus fruit appears on, if the layout names one.
    #[must_use]
    pub const fn fruit_cell(&self) -> Option<CellCoord> {
        self.fruit_cell
    }

    /// Ghost start cells ordered by personality.
    #[must_use]
    pub fn ghost_starts(&self) -> &[(Personality, CellCoord)] {
        &self.ghost_starts
    }

    /// Rows whose left and right edges wrap into each other.
    #[must_use]
    pub fn tunnel_rows(&self) -> &[u32] {
        &self.tunnel_rows
    }

    /// Columns whose top and bottom edges wrap into each other.
    #[must_use]
    pub fn tunnel_columns(&self) -> &[u32] {
        &self.tunnel_columns
    }

    /// Number of dots and power pellets in the template.
    #[must_use]
    pub fn consumable_count(&self) -> u32 {
        to_u32(self.tiles.iter().filter(|tile| tile.is_consumable()).count())
    }
}

impl FromStr for LayoutTemplate {
    type Err = LayoutError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

fn push_unique(values: &mut Vec<u32>, value: u32) {
    if !values.contains(&value) {
        values.push(value);
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
