use super::{Board, TeamId};

/// Shared game flags. `started` only ever goes from false to true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameState {
    started: bool,
    current_turn_team: Option<TeamId>,
}

impl GameState {
    /// Create initial game state
    pub fn initial() -> Self {
        GameState::default()
    }

    /// Rebuild from stored fields.
    pub fn from_parts(started: bool, current_turn_team: Option<TeamId>) -> Self {
        GameState {
            started,
            current_turn_team,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Team that most recently acted. Informational only: nothing waits on it.
    pub fn current_turn_team(&self) -> Option<TeamId> {
        self.current_turn_team
    }

    /// Record that `team` is acting this tick.
    pub fn mark_turn(&mut self, team: TeamId) {
        self.current_turn_team = Some(team);
    }

    /// Flip `started` once the board holds cells of two or more teams.
    /// Returns true only on the call that performs the flip.
    pub fn detect_start(&mut self, board: &Board) -> bool {
        if self.started {
            return false;
        }
        if board.occupying_teams().len() >= 2 {
            self.started = true;
            return true;
        }
        false
    }
}
