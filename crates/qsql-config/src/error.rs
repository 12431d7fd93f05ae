//! Error types for qsql configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A setting has a value outside its allowed range.
    #[error("invalid setting {key} in {path}: {message}")]
    InvalidSetting {
        /// Path to the file that defines the setting.
        path: PathBuf,
        /// Dotted key of the setting, e.g. `query.max_depth`.
        key: &'static str,
        /// What is wrong with the value.
        message: String,
    },

    /// Failed to serialize the effective settings.
    #[error("failed to serialize settings: {source}")]
    SerializeToml {
        /// Underlying TOML serialization error.
        source: ser::Error,
    },
}
