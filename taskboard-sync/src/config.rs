//! Configuration loading using Figment
//!
//! Sources are merged in precedence order (later sources override earlier
//! ones):
//! 1. Built-in defaults
//! 2. A TOML file (`taskboard.toml` in the working directory, or an explicit path)
//! 3. Environment variables prefixed with `TASKBOARD_`

use crate::error::{BoardError, Result};
use crate::remote::DEFAULT_BASE_URL;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "taskboard.toml";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "TASKBOARD_";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Engine and client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Base URL of the task store (the `/tasks` resource lives under it)
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Re-fetch the whole board after a successful move instead of trusting
    /// the optimistic placement
    pub resync_after_move: bool,
    /// Publish an error notification when the initial load fails
    pub notify_on_load_failure: bool,
    /// Buffer size of the notification channel
    pub notification_capacity: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            resync_after_move: true,
            notify_on_load_failure: false,
            notification_capacity: 64,
        }
    }
}

impl BoardConfig {
    /// Load from defaults, `./taskboard.toml` if present, and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load with an explicit config file. The file must exist when given.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let figment = match path {
            Some(path) => {
                if !path.is_file() {
                    return Err(BoardError::ConfigNotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::figment(path)
            }
            None => Self::figment(Path::new(CONFIG_FILE_NAME)),
        };

        let config: BoardConfig = figment.extract()?;
        debug!(base_url = %config.base_url, "loaded board configuration");
        Ok(config)
    }

    fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(BoardConfig::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Override the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_resync_after_move(mut self, resync: bool) -> Self {
        self.resync_after_move = resync;
        self
    }

    pub fn with_notify_on_load_failure(mut self, notify: bool) -> Self {
        self.notify_on_load_failure = notify;
        self
    }
}
