//! Implementation of `qsql explain`.

use std::process::ExitCode;

use qsql_query::{Compiler, Expr, ParseTree, QueryError, Rendered, fold, render, transform};

use crate::cli::{
    args::ExplainCommand,
    context::CommandContext,
    input::read_query_or_failure,
    output::{indent, param_lines, report_query_error},
};

/// Output of every compilation stage for one query.
#[derive(Debug)]
struct Stages {
    /// Generic parse tree from the grammar.
    tree: ParseTree,
    /// Resolved binary expression.
    expr: Expr,
    /// Rendered SQL and parameters.
    rendered: Rendered,
}

/// Runs the pipeline one stage at a time, keeping each intermediate result.
fn stages(compiler: &Compiler, query: &str) -> Result<Stages, QueryError> {
    let tree = compiler.parse_tree(query)?;
    let expr = fold(transform(&tree)?)?;
    let rendered = render(&expr, &compiler.options().column);
    Ok(Stages {
        tree,
        expr,
        rendered,
    })
}

/// Prints the raw input, parse tree, resolved expression, SQL and parameters.
///
/// Nothing is printed to stdout unless every stage succeeds.
pub fn run(ctx: &CommandContext, cmd: &ExplainCommand) -> ExitCode {
    let compiler = match ctx.compiler() {
        Ok(compiler) => compiler,
        Err(code) => return code,
    };
    let query = match read_query_or_failure(&ctx.styler, cmd.query.as_deref()) {
        Ok(query) => query,
        Err(code) => return code,
    };
    let stages = match stages(&compiler, &query) {
        Ok(stages) => stages,
        Err(e) => return report_query_error(&ctx.styler, &e),
    };

    let styler = &ctx.styler;
    println!("{}", styler.header("raw"));
    println!("  {query:?}");
    println!("{}", styler.header("parse tree"));
    println!("{}", indent(&stages.tree.to_string()));
    println!("{}", styler.header("ast"));
    println!("{}", indent(&stages.expr.to_string()));
    println!("{}", styler.header("sql"));
    println!("  {}", styler.sql(&stages.rendered.sql));
    println!("{}", styler.header("params"));
    for line in param_lines(styler, &stages.rendered.params) {
        println!("  {line}");
    }
    ExitCode::SUCCESS
}
