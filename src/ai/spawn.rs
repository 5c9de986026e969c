use rand::Rng;

use crate::error::JoinError;
use crate::game::{Board, Position, TeamId};

/// Put a new piece for `team` on the board.
///
/// Tries `trials` uniformly random cells, then falls back to the first Empty
/// cell in row-major order. Only a completely full board fails.
pub fn spawn<R: Rng + ?Sized>(
    board: &mut Board,
    team: TeamId,
    rng: &mut R,
    trials: usize,
) -> Result<Position, JoinError> {
    if board.is_full() {
        return Err(JoinError::PlacementExhausted);
    }

    for _ in 0..trials {
        let pos = Position::new(
            rng.random_range(0..board.height()),
            rng.random_range(0..board.width()),
        );
        if board.place(pos, team).is_ok() {
            return Ok(pos);
        }
    }

    let pos = board.first_empty().ok_or(JoinError::PlacementExhausted)?;
    board
        .place(pos, team)
        .map_err(|_| JoinError::PlacementExhausted)?;
    Ok(pos)
}
