//! Configuration management for kubesh
//!
//! Settings come from a TOML file (`~/.kubesh/config.toml` unless `--config`
//! names another) and are then overridden by command-line arguments.
//! Every section and field is optional; anything left out takes its default.
//!
//! ```toml
//! [kubectl]
//! binary = "/usr/local/bin/kubectl"
//! lookup_timeout_ms = 1500
//! namespace = "dev"
//!
//! [history]
//! max_size = 5000
//!
//! [logging]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// kubectl invocation settings
    pub kubectl: KubectlConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// History configuration
    pub history: HistoryConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// How kubectl is run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KubectlConfig {
    /// kubectl executable, looked up on PATH unless absolute
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Upper bound for resource lookups during completion and `pin`
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,

    /// Namespace for resource lookups; kubectl's own default when unset
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Display and output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Enable colored output
    #[serde(default = "default_color_output")]
    pub color_output: bool,

    /// Show inline hints from history
    #[serde(default = "default_hints")]
    pub hints: bool,
}

/// Command history configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of history entries
    #[serde(default = "default_max_history_size")]
    pub max_size: usize,

    /// Path to history file
    #[serde(default = "default_history_file")]
    pub file_path: PathBuf,

    /// Enable history persistence
    #[serde(default = "default_persist_history")]
    pub persist: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_binary() -> String {
    "kubectl".to_string()
}

fn default_lookup_timeout_ms() -> u64 {
    2000
}

fn default_color_output() -> bool {
    true
}

fn default_hints() -> bool {
    true
}

fn default_max_history_size() -> usize {
    1000
}

fn default_history_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kubesh_history")
}

fn default_persist_history() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for KubectlConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
            namespace: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_output: default_color_output(),
            hints: default_hints(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_history_size(),
            file_path: default_history_file(),
            persist: default_persist_history(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Load configuration from a file, or the default location
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Arguments
    /// * `path` - Explicit config file, or `None` for [`Config::default_path`]
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".kubesh")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.kubectl.binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "kubectl.binary".into(),
                value: self.kubectl.binary.clone(),
            }
            .into());
        }
        if self.kubectl.lookup_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "kubectl.lookup_timeout_ms".into(),
                value: "0".into(),
            }
            .into());
        }
        if self.history.max_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history.max_size".into(),
                value: "0".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Resource lookup timeout as a Duration
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.kubectl.lookup_timeout_ms)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
