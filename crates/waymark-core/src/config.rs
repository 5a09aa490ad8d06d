//! Configuration loading and typed config structures for the Waymark tracker.
//!
//! The configuration lives in `waymark.yaml` next to the working directory.
//! Every section is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable overriding [`PackConfig::root`].
pub const ENV_PACK_ROOT: &str = "WAYMARK_PACK_ROOT";

/// Environment variable overriding [`StateConfig::save_file`].
pub const ENV_SAVE_FILE: &str = "WAYMARK_SAVE_FILE";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level tracker configuration.
///
/// Mirrors the structure of `waymark.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrackerConfig {
    /// Where the location pack lives.
    #[serde(default)]
    pub pack: PackConfig,

    /// Persistence of clearing state.
    #[serde(default)]
    pub state: StateConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TrackerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `WAYMARK_PACK_ROOT` overrides `pack.root`
    /// - `WAYMARK_SAVE_FILE` overrides `state.save_file`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override paths with values from `lookup` (normally the process
    /// environment) when set.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(ENV_PACK_ROOT) {
            self.pack.root = PathBuf::from(val);
        }
        if let Some(val) = lookup(ENV_SAVE_FILE) {
            self.state.save_file = Some(PathBuf::from(val));
        }
    }
}

/// Location pack settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackConfig {
    /// Directory the location files are relative to.
    #[serde(default = "default_pack_root")]
    pub root: PathBuf,

    /// Location documents, loaded in order as fragments of one tree.
    #[serde(default = "default_locations")]
    pub locations: Vec<PathBuf>,
}

impl PackConfig {
    /// Absolute-or-relative paths of every location document.
    pub fn location_paths(&self) -> Vec<PathBuf> {
        self.locations.iter().map(|file| self.root.join(file)).collect()
    }
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            root: default_pack_root(),
            locations: default_locations(),
        }
    }
}

/// Clearing-state persistence settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StateConfig {
    /// Snapshot file; no persistence when unset.
    #[serde(default)]
    pub save_file: Option<PathBuf>,

    /// Write the snapshot after every command that changes state.
    #[serde(default = "default_true")]
    pub autosave: bool,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            save_file: None,
            autosave: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_pack_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_locations() -> Vec<PathBuf> {
    vec![PathBuf::from("locations.json")]
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}
