use std::collections::BTreeSet;
use std::fmt;

use super::team::TeamId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Team(TeamId),
}

impl Cell {
    /// Team owning this cell, if any.
    pub fn team(self) -> Option<TeamId> {
        match self {
            Cell::Empty => None,
            Cell::Team(team) => Some(team),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    pub fn manhattan_distance(self, other: Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceError {
    OutOfBounds,
    Occupied,
}

/// Fixed `height x width` grid stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: usize, height: usize) -> Self {
        Board {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at a position, `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Claim an empty cell for `team`.
    pub fn place(&mut self, pos: Position, team: TeamId) -> Result<(), PlaceError> {
        let i = self.index(pos).ok_or(PlaceError::OutOfBounds)?;
        if self.cells[i] != Cell::Empty {
            return Err(PlaceError::Occupied);
        }
        self.cells[i] = Cell::Team(team);
        Ok(())
    }

    /// Set a cell back to Empty. Out-of-bounds positions are ignored.
    pub fn clear(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = Cell::Empty;
        }
    }

    /// Point-in-time copy for display. Not atomic with any later mutation
    /// unless the caller still holds the gate.
    pub fn snapshot(&self) -> Board {
        self.clone()
    }

    /// Offset `pos` by a signed step, returning `None` if it leaves the board.
    pub fn offset(&self, pos: Position, d_row: isize, d_col: isize) -> Option<Position> {
        let row = pos.row.checked_add_signed(d_row)?;
        let col = pos.col.checked_add_signed(d_col)?;
        (row < self.height && col < self.width).then_some(Position { row, col })
    }

    /// Row-major iterator over every position and its cell.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells.iter().enumerate().map(move |(i, &cell)| {
            (
                Position {
                    row: i / self.width,
                    col: i % self.width,
                },
                cell,
            )
        })
    }

    /// First Empty cell in row-major order.
    pub fn first_empty(&self) -> Option<Position> {
        self.cells()
            .find(|(_, cell)| *cell == Cell::Empty)
            .map(|(pos, _)| pos)
    }

    /// Distinct teams currently holding at least one cell.
    pub fn occupying_teams(&self) -> BTreeSet<TeamId> {
        self.cells.iter().filter_map(|cell| cell.team()).collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Cell::Empty)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        (pos.row < self.height && pos.col < self.width).then(|| pos.row * self.width + pos.col)
    }
}

/// One line per row: a team's digit or `.` for Empty.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Empty => ".".to_string(),
                    Cell::Team(team) => team.to_string(),
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
