//! Rendering, JSON serialization and error reporting for CLI output.

use std::process::ExitCode;

use qsql_highlight::Styler;
use qsql_query::{QueryError, Rendered};
use tracing::{debug, error};

/// Returns the process exit status for a query error: 1 for bad input, 2 for a defect.
pub fn exit_status(err: &QueryError) -> u8 {
    if err.is_internal() { 2 } else { 1 }
}

/// Prints a query error to stderr and returns the matching exit status.
pub fn report_query_error(styler: &Styler, err: &QueryError) -> ExitCode {
    if err.is_internal() {
        error!(error = %err, "internal consistency failure");
    } else {
        debug!(error = %err, "query rejected");
    }
    for line in error_lines(styler, err) {
        eprintln!("{line}");
    }
    ExitCode::from(exit_status(err))
}

/// Formats a query error for stderr: an `error:` label on the first line and a highlighted
/// label on any `hint:` line.
pub fn error_lines(styler: &Styler, err: &QueryError) -> Vec<String> {
    err.to_string()
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                format!("{} {line}", styler.error("error:"))
            } else if let Some(hint) = line.strip_prefix("hint:") {
                format!("{}{hint}", styler.warning("hint:"))
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Formats the numbered parameter lines, one per placeholder.
pub fn param_lines(styler: &Styler, params: &[String]) -> Vec<String> {
    params
        .iter()
        .enumerate()
        .map(|(i, value)| format!("{} {}", styler.dim(&format!("{}:", i + 1)), styler.param(value)))
        .collect()
}

/// Prints a rendered filter: the SQL line, then the numbered parameters.
pub fn print_rendered(styler: &Styler, rendered: &Rendered) {
    println!("{}", styler.sql(&rendered.sql));
    for line in param_lines(styler, &rendered.params) {
        println!("{line}");
    }
}

/// Prints a rendered filter as JSON.
pub fn print_json(rendered: &Rendered) -> ExitCode {
    match serde_json::to_string_pretty(rendered) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Indents every line of `text` by two spaces.
pub fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
