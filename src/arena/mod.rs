//! The shared arena and everything that provides it: the byte layout, the
//! gate serializing access to it, the stores it lives in, and the
//! attach/detach bookkeeping across processes.

mod codec;
mod gate;
mod provider;
mod store;

pub use codec::{decode, encode, encoded_len};
pub use gate::{FileGate, Gate, LocalGate};
pub use provider::{Attachment, Detachment, SharedResources};
pub use store::{ArenaStore, FileStore, MemoryStore};

use std::io::ErrorKind;
use std::path::Path;

use crate::game::{AgentId, Board, GameState, TeamRegistry};

/// Delete a shared resource file; already gone counts as success.
fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// All state shared between agent processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arena {
    pub board: Board,
    pub state: GameState,
    pub registry: TeamRegistry,
    attach_count: u32,
    next_agent_id: u64,
}

impl Arena {
    /// A cleared arena, as left by the first process to attach.
    pub fn new(width: usize, height: usize) -> Self {
        Arena {
            board: Board::new(width, height),
            state: GameState::initial(),
            registry: TeamRegistry::new(),
            attach_count: 0,
            next_agent_id: 1,
        }
    }

    pub(crate) fn from_parts(
        board: Board,
        state: GameState,
        registry: TeamRegistry,
        attach_count: u32,
        next_agent_id: u64,
    ) -> Self {
        Arena {
            board,
            state,
            registry,
            attach_count,
            next_agent_id,
        }
    }

    /// Number of processes currently attached.
    pub fn attach_count(&self) -> u32 {
        self.attach_count
    }

    pub(crate) fn next_agent_id(&self) -> u64 {
        self.next_agent_id
    }

    pub(crate) fn increment_attach(&mut self) -> u32 {
        self.attach_count += 1;
        self.attach_count
    }

    pub(crate) fn decrement_attach(&mut self) -> u32 {
        self.attach_count = self.attach_count.saturating_sub(1);
        self.attach_count
    }

    /// Hand out a fresh identity; never reused while the arena lives.
    pub fn issue_agent_id(&mut self) -> AgentId {
        let id = AgentId::new(self.next_agent_id);
        self.next_agent_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_agent_ids_are_unique() {
        let mut arena = Arena::new(3, 3);
        let a = arena.issue_agent_id();
        let b = arena.issue_agent_id();
        assert_ne!(a, b);
        assert_eq!(a, AgentId::new(1));
    }

    #[test]
    fn test_attach_count_saturates() {
        let mut arena = Arena::new(2, 2);
        assert_eq!(arena.increment_attach(), 1);
        assert_eq!(arena.decrement_attach(), 0);
        assert_eq!(arena.decrement_attach(), 0);
    }
}
