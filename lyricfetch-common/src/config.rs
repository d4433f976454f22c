//! Configuration loading
//!
//! Settings are layered, highest priority first:
//! 1. Command-line arguments (applied by the binary)
//! 2. Environment variables (`LFETCH_<KEY>`)
//! 3. TOML config file
//! 4. Compiled defaults
//!
//! The resulting `Config` is a plain value handed to the resolver and
//! scheduler; nothing reads configuration from global state.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "LFETCH_";

/// Run configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Number of batch workers (must be > 0)
    pub jobcount: usize,

    /// Re-resolve songs that already carry lyrics
    pub overwrite: bool,

    /// Print the statistics report after a batch
    pub print_stats: bool,

    /// Write `found` / `notfound` debug logs
    pub debug: bool,

    /// Directory for the debug logs
    pub debug_dir: PathBuf,

    /// Last.fm API key, used for album lookups
    pub lastfm_key: String,

    /// Provider names to use, in order. Empty means every built-in provider.
    pub sources: Vec<String>,

    /// Provider names to drop from the set
    pub exclude: Vec<String>,

    /// Logging configuration (optional)
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            jobcount: 1,
            overwrite: false,
            print_stats: false,
            debug: false,
            debug_dir: PathBuf::from("."),
            lastfm_key: String::new(),
            sources: Vec::new(),
            exclude: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// # Arguments
    /// * `path` - Explicit config file. When `None`, the platform default
    ///   location is tried and silently skipped if absent.
    ///
    /// # Errors
    /// Returns error if an explicitly named file is missing, any file fails to
    /// parse, or an environment override has an invalid value.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        debug!(file = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply `LFETCH_<KEY>` overrides
    ///
    /// The lookup function is injected so callers (and tests) decide where
    /// variables come from.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(&format!("{}{}", ENV_PREFIX, key.to_uppercase()));

        if let Some(value) = var("jobcount") {
            self.jobcount = value.trim().parse().map_err(|_| {
                Error::Config(format!("{}JOBCOUNT is not a number: '{}'", ENV_PREFIX, value))
            })?;
        }
        if let Some(value) = var("overwrite") {
            self.overwrite = parse_bool("overwrite", &value)?;
        }
        if let Some(value) = var("print_stats") {
            self.print_stats = parse_bool("print_stats", &value)?;
        }
        if let Some(value) = var("debug") {
            self.debug = parse_bool("debug", &value)?;
        }
        if let Some(value) = var("debug_dir") {
            self.debug_dir = PathBuf::from(value);
        }
        if let Some(value) = var("lastfm_key") {
            self.lastfm_key = value;
        }
        if let Some(value) = var("sources") {
            self.sources = split_list(&value);
        }
        if let Some(value) = var("exclude") {
            self.exclude = split_list(&value);
        }
        Ok(())
    }

    /// Reject values no run can start with
    pub fn validate(&self) -> Result<()> {
        if self.jobcount == 0 {
            return Err(Error::Config(
                "job count should have a value greater than zero".to_string(),
            ));
        }
        if self.lastfm_key.is_empty() {
            warn!("No lastfm key configured, album lookups are disabled");
        }
        Ok(())
    }
}

/// Default config file location: `<config_dir>/lyricfetch/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lyricfetch").join("config.toml"))
}

/// Split a comma separated list, dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::Config(format!(
            "{}{} is not a boolean: '{}'",
            ENV_PREFIX,
            key.to_uppercase(),
            other
        ))),
    }
}
