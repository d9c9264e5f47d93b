//! Core configuration types and loading.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use syncable_proto::Spec;
use syncable_proto::log::DiffOps;
use thiserror::Error;

use super::defaults::{default_diff_ops, default_log_level, default_max_entry_len, default_true};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Inspector configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
    /// Log format configuration.
    #[serde(default)]
    pub protocol: ProtocolConfig,
    /// How matched entries are printed.
    #[serde(default)]
    pub output: OutputConfig,
    /// Log files to inspect, in order.
    #[serde(default)]
    pub input: Vec<InputConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "info", "syncable=debug").
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Operation log format configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProtocolConfig {
    /// Operation names that must carry a patch block (default: `["on"]`).
    #[serde(default = "default_diff_ops")]
    pub diff_ops: Vec<String>,
    /// Maximum bytes a single entry may occupy, patch block included.
    #[serde(default = "default_max_entry_len")]
    pub max_entry_len: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            diff_ops: default_diff_ops(),
            max_entry_len: default_max_entry_len(),
        }
    }
}

impl ProtocolConfig {
    /// The patch policy described by `diff_ops`.
    pub fn policy(&self) -> DiffOps {
        DiffOps::new(self.diff_ops.iter().cloned())
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Print matched entries as JSON objects, one per line, instead of log text.
    #[serde(default)]
    pub json: bool,
}

/// One log file to inspect.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Path of the operation log.
    pub path: PathBuf,
    /// Filter specifier; entries are printed only if they fit it.
    #[serde(default)]
    pub filter: Option<String>,
    /// Check that re-serializing the parsed log reproduces it byte for byte.
    #[serde(default = "default_true")]
    pub verify: bool,
}

impl InputConfig {
    /// The parsed filter. A missing filter is the empty spec, which fits everything.
    pub fn filter_spec(&self) -> syncable_proto::Result<Spec> {
        match self.filter {
            Some(ref filter) => Spec::parse(filter),
            None => Ok(Spec::new()),
        }
    }
}
