//! Interpreter configuration.
//!
//! # Responsibility
//! - Describe where model directories live and which log level to use.
//! - Load overrides from a JSON file, falling back to defaults per key.
//!
//! # Invariants
//! - A validated config has non-blank model directories and a known level.

use crate::logging::{default_log_level, normalize_level, LoggingError};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const DEFAULT_INTENT_DIR: &str = "models/intent";
const DEFAULT_SLOTS_DIR: &str = "models/slots";

/// Configuration for [`crate::service::interpreter::CommandInterpreter`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Intent classifier model directory.
    pub intent_dir: PathBuf,
    /// Slot tagger model directory.
    pub slots_dir: PathBuf,
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            intent_dir: PathBuf::from(DEFAULT_INTENT_DIR),
            slots_dir: PathBuf::from(DEFAULT_SLOTS_DIR),
            log_level: default_log_level().to_string(),
        }
    }
}

impl InterpreterConfig {
    /// Loads and validates a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.intent_dir.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(ConfigError::EmptyField("intent_dir"));
        }
        if self.slots_dir.as_os_str().to_string_lossy().trim().is_empty() {
            return Err(ConfigError::EmptyField("slots_dir"));
        }
        normalize_level(&self.log_level).map_err(ConfigError::InvalidLogLevel)?;
        Ok(())
    }
}

/// Config loading/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    EmptyField(&'static str),
    InvalidLogLevel(LoggingError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "invalid config json: {err}"),
            Self::EmptyField(name) => write!(f, "config field `{name}` must not be empty"),
            Self::InvalidLogLevel(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::InvalidLogLevel(err) => Some(err),
            Self::EmptyField(_) => None,
        }
    }
}
