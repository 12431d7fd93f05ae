//! Integration tests for qsql-config.
//!
//! Tests the full configuration loading pipeline: discovery -> parse -> merge.
//!
//! Every tree written here carries a `root = true` file at its top so a real
//! `~/.qsql.toml` on the machine running the tests cannot leak in.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use qsql_config::{CONFIG_FILENAME, Config, ConfigError};
use qsql_query::Compiler;

/// Test helper to create a temporary directory structure for tests.
struct TestEnv {
    /// Owned temporary directory.
    root: tempfile::TempDir,
}

impl TestEnv {
    /// Creates an environment whose top directory is a discovery root.
    fn new() -> Self {
        let env = Self {
            root: tempfile::tempdir().unwrap(),
        };
        env.create_file(CONFIG_FILENAME, "root = true\n");
        env
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory and returns its path.
    fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Creates a file with content and returns its path.
    fn create_file(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_load_root_only_returns_defaults() {
    let env = TestEnv::new();
    let config = Config::load(env.path()).unwrap();

    assert_eq!(config.query.column, "column_name");
    assert_eq!(config.query.max_depth, 128);
    assert_eq!(config.config_files, vec![env.path().join(CONFIG_FILENAME)]);
}

#[test]
fn test_load_from_files_empty_list() {
    let config = Config::load_from_files(&[]).unwrap();
    assert_eq!(config.query.column, "column_name");
    assert!(config.config_files.is_empty());
}

#[test]
fn test_load_single_config() {
    let env = TestEnv::new();
    env.create_file(
        CONFIG_FILENAME,
        r#"
root = true

[query]
column = "title"
max_depth = 10
"#,
    );

    let config = Config::load(env.path()).unwrap();

    assert_eq!(config.query.column, "title");
    assert_eq!(config.query.max_depth, 10);
}

#[test]
fn test_load_nested_configs_merging() {
    let env = TestEnv::new();
    env.create_file(
        CONFIG_FILENAME,
        r#"
root = true

[query]
column = "body"
max_depth = 5
"#,
    );
    let project = env.create_dir("project/subdir");
    let project_config = env.create_file(
        "project/.qsql.toml",
        r#"
[query]
column = "docs.title"
"#,
    );

    let config = Config::load(&project).unwrap();

    // column from the closest file, max_depth inherited from the root
    assert_eq!(config.query.column, "docs.title");
    assert_eq!(config.query.max_depth, 5);
    assert_eq!(
        config.config_files,
        vec![project_config, env.path().join(CONFIG_FILENAME)]
    );
}

#[test]
fn test_root_config_hides_parents() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, "root = true\n[query]\ncolumn = \"outer\"\n");
    let inner = env.create_dir("inner/src");
    env.create_file("inner/.qsql.toml", "root = true\n");

    let config = Config::load(&inner).unwrap();

    assert_eq!(config.query.column, "column_name");
    assert_eq!(config.config_files.len(), 1);
}

#[test]
fn test_load_error_invalid_toml() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, "root = true\n[query\n");

    let err = Config::load(env.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
}

#[test]
fn test_load_error_wrong_type() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, "root = true\n[query]\nmax_depth = \"deep\"\n");

    let err = Config::load(env.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
}

#[test]
fn test_load_error_zero_depth() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, "root = true\n[query]\nmax_depth = 0\n");

    let err = Config::load(env.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSetting { key: "query.max_depth", .. }));
}

#[test]
fn test_load_error_missing_file() {
    let env = TestEnv::new();
    let missing = env.path().join("missing.toml");

    let err = Config::load_from_files(&[missing.clone()]).unwrap_err();
    match err {
        ConfigError::ReadFile { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_load_from_files_precedence() {
    let env = TestEnv::new();
    let high = env.create_file("high/.qsql.toml", "[query]\nmax_depth = 100\n");
    let low = env.create_file(
        "low/.qsql.toml",
        "[query]\nmax_depth = 1\ncolumn = \"low_col\"\n",
    );

    let config = Config::load_from_files(&[high, low]).unwrap();

    assert_eq!(config.query.max_depth, 100);
    assert_eq!(config.query.column, "low_col");
}

#[test]
fn test_loaded_options_drive_compiler() {
    let env = TestEnv::new();
    env.create_file(
        CONFIG_FILENAME,
        "root = true\n[query]\ncolumn = \"title\"\nmax_depth = 1\n",
    );
    let config = Config::load(env.path()).unwrap();
    let compiler = Compiler::new(config.compile_options()).unwrap();

    let out = compiler.compile("(a or b) and c").unwrap();
    assert_eq!(out.sql, "(title LIKE ? or title LIKE ?) and title LIKE ?");
    assert!(compiler.compile("((a))").is_err());
}

#[test]
fn test_settings_round_trip_through_file() {
    let env = TestEnv::new();
    env.create_file(CONFIG_FILENAME, "root = true\n[query]\ncolumn = \"t.c\"\n");
    let config = Config::load(env.path()).unwrap();

    let rendered = config.settings_to_toml().unwrap();
    let copy = env.create_file("copy/.qsql.toml", &rendered);
    let reloaded = Config::load_from_files(&[copy]).unwrap();

    assert_eq!(reloaded.query, config.query);
}
