//! Configuration system for qsql.
//!
//! qsql uses TOML configuration files named `.qsql.toml`. Configuration is resolved by walking
//! up the directory tree from the current working directory, collecting any `.qsql.toml` files
//! found, then loading `~/.qsql.toml` as the global config with lowest precedence.
//!
//! ```toml
//! root = true
//!
//! [query]
//! column = "title"
//! max_depth = 64
//! ```

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{RawConfig, RawQuerySettings, parse_config_file, parse_config_str};
use qsql_query::{CompileOptions, DEFAULT_COLUMN, DEFAULT_MAX_DEPTH};
use serde::{Deserialize, Serialize};

/// Top-level merged configuration for qsql.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Query compilation settings.
    pub query: QuerySettings,
    /// Files the configuration was merged from, highest precedence first.
    pub config_files: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.qsql.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Returns the compiler options these settings describe.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::default()
            .with_column(self.query.column.as_str())
            .with_max_depth(self.query.max_depth)
    }

    /// Serializes the effective settings in `.qsql.toml` format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            query: self.query.clone(),
        };
        toml::to_string_pretty(&serializable)
            .map_err(|source| ConfigError::SerializeToml { source })
    }
}

/// Query compilation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct QuerySettings {
    /// Column every `LIKE` predicate tests.
    pub column: String,
    /// Group nesting limit.
    pub max_depth: usize,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            column: DEFAULT_COLUMN.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// Query compilation settings.
    query: QuerySettings,
}
