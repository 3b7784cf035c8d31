use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failures while loading or checking a [`LocomotionConfig`](crate::config::LocomotionConfig)
///
/// The per-frame code never fails; configuration is the only place a caller
/// can hand us something unusable.
#[derive(Debug)]
pub enum ConfigError {
    /// Reading the config file failed
    Io { path: PathBuf, source: io::Error },

    /// The file is not a valid locomotion config document
    Parse { source: serde_json::Error },

    /// A tunable is out of range
    Validation { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "Unable to read config '{}': {}", path.display(), source)
            }
            ConfigError::Parse { source } => write!(f, "Invalid config document: {}", source),
            ConfigError::Validation { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source } => Some(source),
            ConfigError::Validation { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(source: serde_json::Error) -> Self {
        ConfigError::Parse { source }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
