//! CLI configuration loaded from an optional TOML file.
//!
//! ```toml
//! log_level = "debug"
//! json_logs = true
//! default_threshold = 3
//! default_total = 5
//! shard_file_suffix = "_part_"
//! restored_output = "restored.json"
//! ```
//!
//! Every key is optional. Command-line flags take precedence.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings shared by all subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Emit logs as JSON lines.
    pub json_logs: bool,
    /// Threshold when `-k`/`--threshold` is not given.
    pub default_threshold: usize,
    /// Share count when `-n`/`--total` is not given.
    pub default_total: usize,
    /// Inserted between the input stem and the shard number in output names.
    pub shard_file_suffix: String,
    /// Output path for `combine` when `-o` is not given.
    pub restored_output: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            default_threshold: 2,
            default_total: 3,
            shard_file_suffix: "_shard_".to_string(),
            restored_output: PathBuf::from("restored_aas.json"),
        }
    }
}

impl CliConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid configuration")
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to load config {}", path.display()))
    }

    /// Override the log format.
    #[must_use]
    pub fn with_json_logs(mut self, json_logs: bool) -> Self {
        self.json_logs = json_logs;
        self
    }
}
