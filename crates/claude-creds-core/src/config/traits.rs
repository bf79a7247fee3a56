//! Configuration errors

use std::path::PathBuf;

/// Errors that can occur while loading resolver configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
