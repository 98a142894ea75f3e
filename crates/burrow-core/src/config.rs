//! Configuration management for Burrow.
//!
//! This module provides configuration loading, saving, and defaults.
//! Configuration is stored in TOML format in a platform-appropriate location.

use crate::error::{BurrowError, Result};
use crate::spec::SearchSpec;
use crate::types::{EntryKind, ErrorPolicy, SearchOrder};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure for Burrow.
///
/// ## Example Configuration File (burrow.toml)
///
/// ```toml
/// [general]
/// log_level = "info"
///
/// [search]
/// pattern = "*"
/// order = "all-directories"
/// ignore_case = true
/// error_policy = "skip"
///
/// [output]
/// format = "text"
/// limit = 0
/// long = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Defaults for search requests
    pub search: SearchConfig,

    /// Result presentation
    pub output: OutputConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            log_level: "info".to_string(),
        }
    }
}

/// Search defaults, applied where the command line is silent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Glob pattern used when none is given
    pub pattern: String,

    /// Traversal order
    pub order: SearchOrder,

    /// Match names case-insensitively
    pub ignore_case: bool,

    /// What to do when a sub-directory cannot be read
    pub error_policy: ErrorPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            pattern: "*".to_string(),
            order: SearchOrder::AllDirectories,
            ignore_case: cfg!(windows),
            error_policy: ErrorPolicy::Abort,
        }
    }
}

/// Output format for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One path (or long listing line) per result
    #[default]
    Text,
    /// One JSON object per result
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = BurrowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(BurrowError::invalid_argument(format!(
                "unknown output format: {}",
                s
            ))),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Maximum number of results to print (0 = no limit)
    pub limit: usize,

    /// Show size and modification time next to each path
    pub long: bool,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| BurrowError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
        })?;

        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Saving configuration");
        let contents = toml::to_string_pretty(self).map_err(|e| BurrowError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "burrow").ok_or_else(|| BurrowError::ConfigError {
            reason: "Could not determine config directory".to_string(),
        })?;

        Ok(dirs.config_dir().join("burrow.toml"))
    }

    /// Build a glob search rooted at `path` from the configured defaults.
    pub fn search_spec(&self, path: impl Into<PathBuf>, kind: EntryKind) -> Result<SearchSpec> {
        let spec = SearchSpec::for_kind(
            path,
            &self.search.pattern,
            kind,
            self.search.order,
            self.search.ignore_case,
        )?;
        Ok(spec.with_error_policy(self.search.error_policy))
    }
}
