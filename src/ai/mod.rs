//! Agent behaviour: joining the board, chasing the nearest opponent,
//! capturing by flanking, and deciding when the game is over for this agent.

mod agent;
pub mod capture;
pub mod movement;
mod spawn;

pub use agent::{AgentPhase, PlayerAgent, TickEvent};
pub use capture::{capture_flanked, has_lost, has_won, Capture};
pub use movement::{advance, nearest_opponent, step_toward, Direction, Movement};
pub use spawn::spawn;
