//! Configuration file discovery.
//!
//! Discovers `.qsql.toml` files by walking up the directory tree from a starting point,
//! then appending the global `~/.qsql.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".qsql.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global (`~/.qsql.toml`) last.
/// Returns an empty vector if no configuration files are found.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    discover_with_global(cwd, global_config_path().as_deref())
}

/// Collects `.qsql.toml` files from `cwd` and its ancestors, then `global`.
///
/// A file with `root = true` ends the search: nothing above it is read, `global` included.
/// `global` is never listed twice when the walk already passed through the home directory.
fn discover_with_global(cwd: &Path, global: Option<&Path>) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    for candidate in cwd.ancestors().map(|dir| dir.join(CONFIG_FILENAME)) {
        if !candidate.is_file() {
            continue;
        }
        let stop = is_root_config(&candidate);
        configs.push(candidate);
        if stop {
            return configs;
        }
    }

    if let Some(global) = global.filter(|g| g.is_file() && !configs.iter().any(|c| c.as_path() == *g)) {
        configs.push(global.to_path_buf());
    }
    configs
}

/// Returns the path to the global configuration file (`~/.qsql.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}
