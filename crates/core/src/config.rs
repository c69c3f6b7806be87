//! Document configuration via `ctxdoc.toml`
//!
//! Controls history tracking and write limits for documents created with
//! [`Document::with_config`](crate::Document::with_config). A default file is
//! written on first use; edit it to change settings.

use crate::error::{Error, Result};
use crate::history::{HistoryPolicy, DEFAULT_MAX_HISTORY_ENTRIES};
use crate::limits::Limits;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "ctxdoc.toml";

/// `[history]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Record history on new documents
    #[serde(default)]
    pub enabled: bool,
    /// Maximum number of tracked paths (absent = unbounded)
    #[serde(default = "default_max_entries", skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    /// Entry time-to-live in milliseconds (absent = never expires)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_ms: Option<u64>,
}

fn default_max_entries() -> Option<usize> {
    Some(DEFAULT_MAX_HISTORY_ENTRIES)
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            enabled: false,
            max_entries: default_max_entries(),
            ttl_ms: None,
        }
    }
}

impl HistoryConfig {
    /// The policy to track with, or `None` when history is disabled
    pub fn policy(&self) -> Option<HistoryPolicy> {
        self.enabled.then(|| HistoryPolicy {
            max_entries: self.max_entries,
            ttl: self.ttl_ms.map(Duration::from_millis),
        })
    }
}

/// Configuration loaded from `ctxdoc.toml`
///
/// # Example
///
/// ```toml
/// [history]
/// enabled = true
/// max_entries = 1024
///
/// [limits]
/// max_array_index = 1000000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtxConfig {
    /// History tracking
    #[serde(default)]
    pub history: HistoryConfig,
    /// Write limits
    #[serde(default)]
    pub limits: Limits,
}

impl CtxConfig {
    /// Default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# ctxdoc document configuration

[history]
# Record (old, new) transitions for top-level puts (default: false)
enabled = false
# Maximum number of tracked paths; least recently written are evicted first
max_entries = 1024
# Entries older than this are dropped (milliseconds, default: never)
# ttl_ms = 600000

[limits]
# Maximum number of segments in a path expression
max_path_segments = 256
# Maximum array index a write may pad up to
max_array_index = 1000000
# Maximum nesting depth of a written value
max_nesting_depth = 100
"#
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: CtxConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Write the default config file if it does not already exist
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.limits.max_path_segments == 0 {
            return Err(Error::Config(
                "limits.max_path_segments must be at least 1".to_string(),
            ));
        }
        if self.limits.max_nesting_depth == 0 {
            return Err(Error::Config(
                "limits.max_nesting_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
