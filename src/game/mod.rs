//! Shared game data: the board, team identities, the game flags and the team
//! registry. Nothing here knows how the data is shared between processes.

mod board;
mod registry;
mod state;
mod team;

pub use board::{Board, Cell, PlaceError, Position};
pub use registry::{AgentId, TeamRegistry, MAX_AGENTS_PER_TEAM};
pub use state::GameState;
pub use team::{TeamId, MAX_TEAMS};
