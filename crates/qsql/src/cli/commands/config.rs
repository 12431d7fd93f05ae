//! Implementation of `qsql config`.

use std::{path::Path, process::ExitCode};

use qsql_config::{CONFIG_FILENAME, is_global_config};

use crate::cli::context::CommandContext;

/// Formats a config path for display: `~/.qsql.toml` for the global file, relative to the
/// working directory when below it, absolute otherwise.
fn display_path(path: &Path, cwd: &Path) -> String {
    if is_global_config(path) {
        return format!("~/{CONFIG_FILENAME}");
    }
    match path.strip_prefix(cwd) {
        Ok(relative) => relative.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

/// Shows effective configuration settings, preceded by the files they came from.
///
/// Sources are TOML comments, so the output is itself a valid `.qsql.toml`.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let styler = &ctx.styler;
    let toml = match ctx.config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("{} {e}", styler.error("error:"));
            return ExitCode::FAILURE;
        }
    };

    if ctx.config.config_files.is_empty() {
        println!("{}", styler.dim("# no configuration files found"));
    } else {
        for path in &ctx.config.config_files {
            let line = format!("# from {}", display_path(path, &ctx.cwd));
            println!("{}", styler.dim(&line));
        }
    }
    print!("{}", styler.toml(&toml));
    ExitCode::SUCCESS
}
