//! Query input.

use std::{
    io::{self, Read},
    process::ExitCode,
};

use qsql_highlight::Styler;

/// Returns the query text: the argument itself, or all of stdin when the argument is absent
/// or `-`.
pub fn read_query(arg: Option<&str>) -> io::Result<String> {
    match arg {
        Some(query) if query != "-" => Ok(query.to_string()),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Reads the query, printing a consistent error on failure.
pub fn read_query_or_failure(styler: &Styler, arg: Option<&str>) -> Result<String, ExitCode> {
    read_query(arg).map_err(|e| {
        eprintln!("{} failed to read query from stdin: {e}", styler.error("error:"));
        ExitCode::FAILURE
    })
}
