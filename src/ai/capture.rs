use crate::game::{Board, Cell, Position, TeamId};

/// Both directions along the four axes: vertical, horizontal, and the two
/// diagonals.
const FLANK_DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, 1),
    (-1, 1),
    (1, -1),
];

/// An opponent piece removed by flanking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub position: Position,
    pub victim: TeamId,
}

/// Clear every opponent piece sandwiched between `at` and another `team`
/// cell two steps away. Each direction is checked on its own.
pub fn capture_flanked(board: &mut Board, at: Position, team: TeamId) -> Vec<Capture> {
    let mut captures = Vec::new();
    for (d_row, d_col) in FLANK_DIRECTIONS {
        let Some(adjacent) = board.offset(at, d_row, d_col) else {
            continue;
        };
        let Some(outer) = board.offset(at, 2 * d_row, 2 * d_col) else {
            continue;
        };
        let Some(Cell::Team(victim)) = board.get(adjacent) else {
            continue;
        };
        if victim != team && board.get(outer) == Some(Cell::Team(team)) {
            board.clear(adjacent);
            captures.push(Capture {
                position: adjacent,
                victim,
            });
        }
    }
    captures
}

/// True when no cell belongs to any team other than `team`.
pub fn has_won(board: &Board, team: TeamId) -> bool {
    board
        .cells()
        .all(|(_, cell)| cell.team().map_or(true, |owner| owner == team))
}

/// True when the piece recorded at `position` no longer belongs to `team`.
pub fn has_lost(board: &Board, position: Position, team: TeamId) -> bool {
    board.get(position) != Some(Cell::Team(team))
}
