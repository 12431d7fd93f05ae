//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single `Config`, applying precedence rules and
//! validating each value against the file that set it.

use std::path::{Path, PathBuf};

use qsql_query::{MAX_DEPTH_LIMIT, is_valid_column};

use crate::{
    Config, ConfigError, QuerySettings,
    parse::{RawConfig, RawQuerySettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config). Each setting takes the first defined value.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    let mut query = QuerySettings::default();

    // Lowest precedence first so closer files overwrite.
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.query {
            apply_raw_query(&mut query, raw, &parsed.path)?;
        }
    }

    Ok(Config {
        query,
        config_files: configs.iter().map(|c| c.path.clone()).collect(),
    })
}

/// Applies raw query settings to result, overwriting any present values.
fn apply_raw_query(
    result: &mut QuerySettings,
    raw: &RawQuerySettings,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(ref column) = raw.column {
        if !is_valid_column(column) {
            return Err(ConfigError::InvalidSetting {
                path: path.to_path_buf(),
                key: "query.column",
                message: format!("{column:?} is not a plain SQL column name"),
            });
        }
        result.column.clone_from(column);
    }
    if let Some(max_depth) = raw.max_depth {
        if !(1..=MAX_DEPTH_LIMIT).contains(&max_depth) {
            return Err(ConfigError::InvalidSetting {
                path: path.to_path_buf(),
                key: "query.max_depth",
                message: format!("must be between 1 and {MAX_DEPTH_LIMIT}"),
            });
        }
        result.max_depth = max_depth;
    }
    Ok(())
}
