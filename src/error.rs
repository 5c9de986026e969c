use std::path::PathBuf;

use crate::game::TeamId;

/// Errors from the mutual-exclusion gate. Any of these is fatal to the
/// process that sees it.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("gate primitive failed: {0}")]
    Primitive(String),

    #[error("gate acquired twice without release")]
    Reentrant,

    #[error("gate released while not held")]
    NotHeld,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors touching the shared arena or its gate.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("gate error: {0}")]
    Gate(#[from] GateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("shared arena is corrupt: {0}")]
    Corrupt(String),

    #[error("shared arena was destroyed while attached")]
    Destroyed,
}

/// Errors that keep an agent from joining the board.
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    #[error("no empty cell left on the board")]
    PlacementExhausted,

    #[error("team {team} has no room for another agent")]
    TeamFull { team: TeamId },
}

/// Anything that ends an agent's session early.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("join failed: {0}")]
    Join(#[from] JoinError),

    #[error("shared resource failure: {0}")]
    Resource(#[from] ResourceError),
}

/// An out-of-range team identifier from the invoker.
#[derive(Debug, thiserror::Error)]
#[error("invalid team '{0}' (expected a digit 0-9)")]
pub struct TeamParseError(pub String);

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
