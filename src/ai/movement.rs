use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::{Board, Cell, Position, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) offset of one step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// How a piece moved on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Stepped toward the nearest opponent.
    Toward(Position),
    /// Preferred step unavailable; took a random free neighbour.
    Random(Position),
    /// Boxed in.
    Stayed,
}

impl Movement {
    pub fn destination(self) -> Option<Position> {
        match self {
            Movement::Toward(pos) | Movement::Random(pos) => Some(pos),
            Movement::Stayed => None,
        }
    }
}

/// Closest cell held by another team. Ties go to the first one in
/// row-major order.
pub fn nearest_opponent(board: &Board, from: Position, team: TeamId) -> Option<Position> {
    let mut best: Option<(usize, Position)> = None;
    for (pos, cell) in board.cells() {
        let Some(owner) = cell.team() else { continue };
        if owner == team {
            continue;
        }
        let distance = from.manhattan_distance(pos);
        if best.map_or(true, |(best_distance, _)| distance < best_distance) {
            best = Some((distance, pos));
        }
    }
    best.map(|(_, pos)| pos)
}

/// One orthogonal step from `from` toward `target`, favouring the row axis
/// when it is at least as far off. `None` when already there.
pub fn step_toward(from: Position, target: Position) -> Option<Direction> {
    let d_row = target.row as isize - from.row as isize;
    let d_col = target.col as isize - from.col as isize;
    if d_row.abs() >= d_col.abs() && d_row != 0 {
        Some(if d_row > 0 { Direction::Down } else { Direction::Up })
    } else if d_col != 0 {
        Some(if d_col > 0 { Direction::Right } else { Direction::Left })
    } else {
        None
    }
}

/// Move `team`'s piece at `from` one step: toward the nearest opponent if
/// that cell is free, otherwise to a random free neighbour.
pub fn advance<R: Rng + ?Sized>(
    board: &mut Board,
    from: Position,
    team: TeamId,
    rng: &mut R,
) -> Movement {
    let preferred = nearest_opponent(board, from, team)
        .and_then(|target| step_toward(from, target))
        .and_then(|direction| neighbour(board, from, direction));
    if let Some(dest) = preferred {
        if relocate(board, from, dest, team) {
            return Movement::Toward(dest);
        }
    }

    let mut directions = Direction::ALL;
    directions.shuffle(rng);
    for direction in directions {
        if let Some(dest) = neighbour(board, from, direction) {
            if relocate(board, from, dest, team) {
                return Movement::Random(dest);
            }
        }
    }
    Movement::Stayed
}

fn neighbour(board: &Board, from: Position, direction: Direction) -> Option<Position> {
    let (d_row, d_col) = direction.delta();
    board.offset(from, d_row, d_col)
}

/// Claim `to` and free `from` together. False if `to` is taken.
fn relocate(board: &mut Board, from: Position, to: Position, team: TeamId) -> bool {
    if board.get(to) != Some(Cell::Empty) {
        return false;
    }
    board.clear(from);
    board.place(to, team).is_ok()
}
