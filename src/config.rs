use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Board dimensions used when this process is the first to attach.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            width: 3,
            height: 3,
        }
    }
}

/// Per-agent tick behaviour.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Sleep between ticks, in milliseconds.
    pub tick_interval_ms: u64,
    /// Random placement attempts before the row-major fallback scan.
    pub spawn_trials: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            tick_interval_ms: 1000,
            spawn_trials: 5,
        }
    }
}

impl AgentConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Where the shared arena and its lock file live.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    pub dir: PathBuf,
    pub name: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        ResourceConfig {
            dir: std::env::temp_dir(),
            name: "territory".to_string(),
        }
    }
}

impl ResourceConfig {
    pub fn arena_path(&self) -> PathBuf {
        self.dir.join(format!("{}.arena", self.name))
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dir.join(format!("{}.lock", self.name))
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub board: BoardConfig,
    pub agent: AgentConfig,
    pub resources: ResourceConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board.width == 0 || self.board.height == 0 {
            return Err(ConfigError::Validation(
                "board.width and board.height must be > 0".into(),
            ));
        }
        if self.board.width > u8::MAX as usize || self.board.height > u8::MAX as usize {
            return Err(ConfigError::Validation(
                "board.width and board.height must be <= 255".into(),
            ));
        }
        if self.agent.spawn_trials == 0 {
            return Err(ConfigError::Validation(
                "agent.spawn_trials must be >= 1".into(),
            ));
        }
        if self.resources.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "resources.name must not be empty".into(),
            ));
        }
        if self.resources.name.contains(std::path::MAIN_SEPARATOR) {
            return Err(ConfigError::Validation(
                "resources.name must be a plain file name".into(),
            ));
        }
        Ok(())
    }
}
