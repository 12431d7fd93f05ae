//! Command-line interface for the `qsql` query compiler.

use std::process::ExitCode;

use qsql::cli::{CommandContext, args::parse_cli, commands, logging};

fn main() -> ExitCode {
    let cli = parse_cli();
    logging::init(cli.global.verbose, cli.global.color.enabled());

    let ctx = match CommandContext::load(&cli.global) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    commands::run(cli.command, &ctx)
}
