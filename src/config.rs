//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/newsgrid/config.json`.
//! Every section is optional: a minimal `{}` file is valid and missing
//! sections or keys fall back to their compiled-in defaults.  Unknown keys
//! are ignored so the file can grow new sections without breaking older
//! builds.
//!
//! # Example
//!
//! ```json
//! {
//!   "storage": { "dir": "/var/lib/newsgrid", "key": "newsgrid-state" },
//!   "limits": { "max_streams": 16 },
//!   "ipc": { "socket_path": "/run/user/1000/newsgrid.sock" }
//! }
//! ```

use crate::persistence::STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the state document is persisted.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Input limits applied by the control layer.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Command socket settings.
    #[serde(default)]
    pub ipc: IpcConfig,
}

/// Persistence location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the state document.  `None` means
    /// `$XDG_DATA_HOME/newsgrid`.
    pub dir: Option<PathBuf>,
    /// Key (file stem) of the state document.
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: STORAGE_KEY.to_string(),
        }
    }
}

/// Limits enforced on user input before it reaches the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum number of streams the add-stream input accepts per
    /// workspace.
    pub max_streams: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_streams: 16 }
    }
}

/// Command socket settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IpcConfig {
    /// Socket path.  `None` means `$XDG_RUNTIME_DIR/newsgrid.sock`.
    pub socket_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
