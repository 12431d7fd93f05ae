//! Shared context for running CLI commands.

use std::{env, path::PathBuf, process::ExitCode};

use qsql_config::Config;
use qsql_highlight::Styler;
use qsql_query::Compiler;
use tracing::debug;

use crate::cli::{args::GlobalArgs, output::report_query_error};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Effective configuration: config files merged, then command-line overrides applied.
    pub config: Config,
    /// Output styling.
    pub styler: Styler,
}

impl CommandContext {
    /// Loads the current directory and configuration, then applies the global flags.
    pub fn load(args: &GlobalArgs) -> Result<Self, ExitCode> {
        let styler = Styler::new(args.color.enabled());
        let cwd = env::current_dir().map_err(|e| {
            eprintln!("{} could not determine current directory: {e}", styler.error("error:"));
            ExitCode::FAILURE
        })?;

        let mut config = if args.no_config {
            Config::default()
        } else {
            Config::load(&cwd).map_err(|e| {
                eprintln!("{} failed to load configuration: {e}", styler.error("error:"));
                ExitCode::FAILURE
            })?
        };
        debug!(files = config.config_files.len(), "configuration loaded");

        if let Some(column) = &args.column {
            config.query.column.clone_from(column);
        }
        if let Some(max_depth) = args.max_depth {
            config.query.max_depth = max_depth;
        }

        Ok(Self {
            cwd,
            config,
            styler,
        })
    }

    /// Builds a compiler from the effective settings.
    pub fn compiler(&self) -> Result<Compiler, ExitCode> {
        Compiler::new(self.config.compile_options())
            .map_err(|e| report_query_error(&self.styler, &e))
    }
}
