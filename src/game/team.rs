use std::fmt;
use std::str::FromStr;

use crate::error::TeamParseError;

/// Number of distinct teams the shared arena has room for.
pub const MAX_TEAMS: usize = 10;

/// A faction identifier in `0..MAX_TEAMS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamId(u8);

impl TeamId {
    /// Build a team id, rejecting values outside `0..MAX_TEAMS`.
    pub fn new(index: u8) -> Option<TeamId> {
        if (index as usize) < MAX_TEAMS {
            Some(TeamId(index))
        } else {
            None
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn as_u8(self) -> u8 {
        self.0
    }

    /// All team ids in ascending order.
    pub fn all() -> impl Iterator<Item = TeamId> {
        (0..MAX_TEAMS as u8).map(TeamId)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TeamId {
    type Err = TeamParseError;

    /// Teams are named by a single decimal digit on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let digit = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_digit(10),
            _ => None,
        };
        digit
            .and_then(|d| TeamId::new(d as u8))
            .ok_or_else(|| TeamParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_bounds() {
        assert!(TeamId::new(0).is_some());
        assert!(TeamId::new(9).is_some());
        assert!(TeamId::new(10).is_none());
    }

    #[test]
    fn test_parse_single_digit() {
        assert_eq!("3".parse::<TeamId>().unwrap(), TeamId(3));
        assert!("".parse::<TeamId>().is_err());
        assert!("12".parse::<TeamId>().is_err());
        assert!("a".parse::<TeamId>().is_err());
        assert!("-1".parse::<TeamId>().is_err());
    }

    #[test]
    fn test_parse_error_display() {
        let err = "x".parse::<TeamId>().unwrap_err();
        assert_eq!(err.to_string(), "invalid team 'x' (expected a digit 0-9)");
    }

    #[test]
    fn test_all_teams() {
        assert_eq!(TeamId::all().count(), MAX_TEAMS);
    }
}
