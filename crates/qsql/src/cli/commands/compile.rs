//! Implementation of `qsql compile`.

use std::process::ExitCode;

use crate::cli::{
    args::CompileCommand,
    context::CommandContext,
    input::read_query_or_failure,
    output::{print_json, print_rendered, report_query_error},
};

/// Compiles one query and prints the SQL fragment and its parameters.
pub fn run(ctx: &CommandContext, cmd: &CompileCommand) -> ExitCode {
    let compiler = match ctx.compiler() {
        Ok(compiler) => compiler,
        Err(code) => return code,
    };
    let query = match read_query_or_failure(&ctx.styler, cmd.query.as_deref()) {
        Ok(query) => query,
        Err(code) => return code,
    };

    match compiler.compile(&query) {
        Ok(rendered) if cmd.json => print_json(&rendered),
        Ok(rendered) => {
            print_rendered(&ctx.styler, &rendered);
            ExitCode::SUCCESS
        }
        Err(e) => report_query_error(&ctx.styler, &e),
    }
}
