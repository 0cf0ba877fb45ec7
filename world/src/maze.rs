use maze_chase_core::{CellCoord, Consumable, Direction, LayoutTemplate, Tile};

/// Static maze grid plus the consumables still on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
    dots_remaining: u32,
    tunnel_rows: Vec<u32>,
    tunnel_columns: Vec<u32>,
    house_entrance: CellCoord,
}

impl Maze {
    /// Builds a maze from a layout template.
    #[must_use]
    pub fn from_layout(layout: &LayoutTemplate) -> Self {
        Self {
            columns: layout.columns(),
            rows: layout.rows(),
            tiles: layout.tiles().to_vec(),
            dots_remaining: layout.consumable_count(),
            tunnel_rows: layout.tunnel_rows().to_vec(),
            tunnel_columns: layout.tunnel_columns().to_vec(),
            house_entrance: layout.house_entrance(),
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            columns: 0,
            rows: 0,
            tiles: Vec::new(),
            dots_remaining: 0,
            tunnel_rows: Vec::new(),
            tunnel_columns: Vec::new(),
            house_entrance: CellCoord::new(0, 0),
        }
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

    /// Cell directly outside the ghost house.
    #[must_use]
    pub const fn house_entrance(&self) -> CellCoord {
        self.house_entrance
    }

    /// Dots and power pellets still on the grid.
    #[must_use]
    pub const fn dots_remaining(&self) -> u32 {
        self.dots_remaining
    }

    /// Tile at `cell`; anything outside the grid reads as a wall.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> Tile {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
            .unwrap_or(Tile::Wall)
    }

    /// Reports whether agents roaming the maze may stand on `cell`.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.tile_at(cell).is_walkable()
    }

    /// Cell reached by leaving `cell` toward `direction`.
    ///
    /// Leaving the grid along a tunnel row or column wraps to the opposite
    /// edge; leaving it anywhere else yields `None`.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        let (dx, dy) = direction.delta();
        let column = i64::from(cell.column()) + i64::from(dx);
        let row = i64::from(cell.row()) + i64::from(dy);
        let columns = i64::from(self.columns);
        let rows = i64::from(self.rows);

        if (0..columns).contains(&column) && (0..rows).contains(&row) {
            return Some(CellCoord::new(
                u32::try_from(column).ok()?,
                u32::try_from(row).ok()?,
            ));
        }

        if dx != 0 && self.is_tunnel_row(cell.row()) && columns > 0 {
            let wrapped = column.rem_euclid(columns);
            return Some(CellCoord::new(u32::try_from(wrapped).ok()?, cell.row()));
        }

        if dy != 0 && self.is_tunnel_column(cell.column()) && rows > 0 {
            let wrapped = row.rem_euclid(rows);
            return Some(CellCoord::new(cell.column(), u32::try_from(wrapped).ok()?));
        }

        None
    }

    /// Walkable cell reached by leaving `cell` toward `direction`, if any.
    #[must_use]
    pub fn walkable_neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        self.neighbor(cell, direction)
            .filter(|next| self.is_walkable(*next))
    }

    /// Reports whether `row` wraps horizontally.
    #[must_use]
    pub fn is_tunnel_row(&self, row: u32) -> bool {
        self.tunnel_rows.contains(&row)
    }

    /// Reports whether `column` wraps vertically.
    #[must_use]
    pub fn is_tunnel_column(&self, column: u32) -> bool {
        self.tunnel_columns.contains(&column)
    }

    /// Removes the dot or pellet at `cell`, returning what was eaten.
    ///
    /// Consuming a cell without a consumable changes nothing.
    pub fn consume(&mut self, cell: CellCoord) -> Option<Consumable> {
        let index = self.index(cell)?;
        let slot = self.tiles.get_mut(index)?;
        let consumed = match *slot {
            Tile::Dot => Consumable::Dot,
            Tile::PowerPellet => Consumable::PowerPellet,
            _ => return None,
        };
        *slot = Tile::Empty;
        self.dots_remaining = self.dots_remaining.saturating_sub(1);
        Some(consumed)
    }

    /// Iterator over rows of tiles, top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Tile]> {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        self.tiles.chunks(width)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maze(text: &str) -> Maze {
        Maze::from_layout(&LayoutTemplate::parse(text).expect("layout parses"))
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let maze = maze("#E#\n.P.\n###");
        assert_eq!(maze.tile_at(CellCoord::new(3, 1)), Tile::Wall);
        assert_eq!(maze.tile_at(CellCoord::new(0, 9)), Tile::Wall);
        assert_eq!(maze.tile_at(CellCoord::new(0, 1)), Tile::Dot);
    }

    #[test]
    fn edges_block_outside_tunnels() {
        let maze = maze("#E#\n.P.\n###");
        assert_eq!(maze.neighbor(CellCoord::new(2, 1), Direction::Right), None);
        assert_eq!(maze.neighbor(CellCoord::new(0, 1), Direction::Left), None);
    }

    #[test]
    fn tunnel_rows_wrap() {
        let maze = maze("##E##\nT.P.T\n#####");
        assert_eq!(
            maze.neighbor(CellCoord::new(4, 1), Direction::Right),
            Some(CellCoord::new(0, 1))
        );
        assert_eq!(
            maze.neighbor(CellCoord::new(0, 1), Direction::Left),
            Some(CellCoord::new(4, 1))
        );
        assert_eq!(maze.neighbor(CellCoord::new(2, 0), Direction::Up), None);
    }

    #[test]
    fn tunnel_columns_wrap() {
        let maze = maze("#T#\nEP.\n#T#");
        assert_eq!(
            maze.neighbor(CellCoord::new(1, 0), Direction::Up),
            Some(CellCoord::new(1, 2))
        );
    }

    #[test]
    fn consume_is_idempotent() {
        let mut maze = maze("#E#\nP.o\n###");
        assert_eq!(maze.dots_remaining(), 2);
        assert_eq!(maze.consume(CellCoord::new(1, 1)), Some(Consumable::Dot));
        assert_eq!(maze.dots_remaining(), 1);
        assert_eq!(maze.consume(CellCoord::new(1, 1)), None);
        assert_eq!(maze.dots_remaining(), 1);
        assert_eq!(
            maze.consume(CellCoord::new(2, 1)),
            Some(Consumable::PowerPellet)
        );
        assert_eq!(maze.dots_remaining(), 0);
        assert_eq!(maze.consume(CellCoord::new(7, 7)), None);
    }

    #[test]
    fn ghost_house_blocks_walkers() {
        let maze = maze("#E#\nP0.\n###");
        assert!(!maze.is_walkable(CellCoord::new(1, 1)));
        assert_eq!(
            maze.walkable_neighbor(CellCoord::new(0, 1), Direction::Right),
            None
        );
    }
}
