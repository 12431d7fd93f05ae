//! Diagnostic logging to stderr.

use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `QSQL_LOG=qsql_query=trace`.
pub const LOG_ENV: &str = "QSQL_LOG";

/// Returns the default filter directive for a `-v` count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Builds the log filter: `QSQL_LOG` when set and valid, otherwise the `-v` level.
pub fn filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the stderr subscriber. Stdout stays reserved for command output.
pub fn init(verbose: u8, color: bool) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(io::stderr)
        .with_ansi(color)
        .with_target(false)
        .without_time()
        .try_init();
    if let Err(e) = installed {
        eprintln!("warning: logging disabled: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "info");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(3), "trace");
        assert_eq!(default_directive(9), "trace");
    }
}
