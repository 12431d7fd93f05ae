//! Clap argument definitions for the `qsql` CLI.

use std::{
    env,
    io::{self, IsTerminal},
    process::exit,
};

use clap::{Args, Parser, Subcommand, ValueEnum, error::ErrorKind};

/// Query syntax summary shown after subcommand help.
const QUERY_SYNTAX_HELP: &str = "\
QUERY SYNTAX:
  word              One LIKE predicate; the word is bound as-is
  \"two words\"       Quoted word, double or single quotes; \\ escapes the next char
  a b               Either word (whitespace alone means OR)
  a or b            Either word
  a and b           Both words; binds tighter than OR
  (a or b) and c    Grouping

  Keywords are lowercase. Quote a word to use 'or' or 'and' literally.

EXAMPLES:
  qsql compile 'rust async'
  qsql compile '(rust or golang) and \"error handling\"'
  echo 'title and draft' | qsql compile --json
  qsql --column docs.title explain 'a b and c'";

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "qsql", version)]
#[command(about = "Compile boolean search queries into parameterized SQL filters")]
pub struct Cli {
    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// When to emit ANSI colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl ColorMode {
    /// Resolves the mode against the current stdout.
    pub fn enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
        }
    }
}

/// Flags accepted before or after any subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); QSQL_LOG overrides
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    /// Column every LIKE predicate tests [default: column_name]
    #[arg(long, global = true)]
    pub column: Option<String>,

    /// Maximum group nesting depth [default: 128]
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Ignore .qsql.toml files
    #[arg(long, global = true)]
    pub no_config: bool,
}

/// Arguments for `qsql compile`.
#[derive(Args, Debug, Clone)]
pub struct CompileCommand {
    /// Query to compile; read from stdin when absent or '-'
    pub query: Option<String>,

    /// Output {"sql": ..., "params": [...]} as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `qsql explain`.
#[derive(Args, Debug, Clone)]
pub struct ExplainCommand {
    /// Query to explain; read from stdin when absent or '-'
    pub query: Option<String>,
}

/// Supported `qsql` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a query to a SQL fragment and its parameters
    #[command(after_help = QUERY_SYNTAX_HELP)]
    Compile(CompileCommand),

    /// Show every compilation stage for a query
    #[command(after_help = QUERY_SYNTAX_HELP)]
    Explain(ExplainCommand),

    /// Show effective configuration settings
    Config,
}

/// Parses CLI arguments.
///
/// Help and version requests exit 0; usage errors exit 1 like any other user error.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            eprint!("{e}");
            exit(1);
        }
    }
}
