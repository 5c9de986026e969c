use std::fmt;

use super::team::{TeamId, MAX_TEAMS};
use crate::error::JoinError;

/// Room reserved per team in the shared registry.
pub const MAX_AGENTS_PER_TEAM: usize = 100;

/// Opaque agent identity issued by the arena at attach time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(u64);

impl AgentId {
    pub fn new(raw: u64) -> Self {
        AgentId(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// Per-team ordered set of known agents. Append-only; stale entries stay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRegistry {
    teams: Vec<Vec<AgentId>>,
}

impl TeamRegistry {
    pub fn new() -> Self {
        TeamRegistry {
            teams: vec![Vec::new(); MAX_TEAMS],
        }
    }

    /// Add `agent` to `team`. Returns false when it was already present.
    pub fn register(&mut self, team: TeamId, agent: AgentId) -> Result<bool, JoinError> {
        let members = &mut self.teams[team.index()];
        if members.contains(&agent) {
            return Ok(false);
        }
        if members.len() >= MAX_AGENTS_PER_TEAM {
            return Err(JoinError::TeamFull { team });
        }
        members.push(agent);
        Ok(true)
    }

    pub fn members(&self, team: TeamId) -> &[AgentId] {
        &self.teams[team.index()]
    }

    pub fn contains(&self, team: TeamId, agent: AgentId) -> bool {
        self.members(team).contains(&agent)
    }
}

impl Default for TeamRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(i: u8) -> TeamId {
        TeamId::new(i).unwrap()
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = TeamRegistry::new();
        assert!(registry.register(team(1), AgentId::new(7)).unwrap());
        assert!(!registry.register(team(1), AgentId::new(7)).unwrap());
        assert_eq!(registry.members(team(1)), &[AgentId::new(7)]);
    }

    #[test]
    fn test_register_keeps_order() {
        let mut registry = TeamRegistry::new();
        registry.register(team(2), AgentId::new(3)).unwrap();
        registry.register(team(2), AgentId::new(1)).unwrap();
        registry.register(team(2), AgentId::new(2)).unwrap();
        assert_eq!(
            registry.members(team(2)),
            &[AgentId::new(3), AgentId::new(1), AgentId::new(2)]
        );
    }

    #[test]
    fn test_same_agent_in_two_teams() {
        let mut registry = TeamRegistry::new();
        registry.register(team(0), AgentId::new(1)).unwrap();
        registry.register(team(9), AgentId::new(1)).unwrap();
        assert!(registry.contains(team(0), AgentId::new(1)));
        assert!(registry.contains(team(9), AgentId::new(1)));
        assert!(registry.members(team(5)).is_empty());
    }

    #[test]
    fn test_team_full() {
        let mut registry = TeamRegistry::new();
        for i in 0..MAX_AGENTS_PER_TEAM as u64 {
            registry.register(team(4), AgentId::new(i)).unwrap();
        }
        let err = registry.register(team(4), AgentId::new(1000)).unwrap_err();
        assert!(matches!(err, JoinError::TeamFull { .. }));
        // Re-registering a known agent still succeeds.
        assert!(!registry.register(team(4), AgentId::new(0)).unwrap());
    }
}
