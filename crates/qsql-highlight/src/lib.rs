//! SQL highlighting and terminal styling for qsql.
//!
//! [`Highlighter`] colors SQL fragments and TOML settings with syntect. [`Styler`] applies the
//! ANSI helpers in this crate only when color output is enabled, so callers can format
//! unconditionally and let the terminal decision live in one place.

#![warn(missing_docs)]

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions, including SQL and TOML.
    syntax_set: SyntaxSet,
    /// Embedded color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme to use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a new highlighter with the default theme (Dracula).
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights a SQL fragment.
    pub fn highlight_sql(&self, sql: &str) -> String {
        self.highlight(sql, "sql")
    }

    /// Highlights TOML settings.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights content with the syntax registered for `extension`.
    ///
    /// Falls back to plain text if the syntax is unknown, and to the unstyled line if a line
    /// fails to highlight.
    fn highlight(&self, content: &str, extension: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(extension)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Magenta text (for bound parameters).
    pub const MAGENTA: &str = "\x1b[35m";
    /// Yellow text (for warnings and hints).
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text (for errors).
    pub const RED: &str = "\x1b[31m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Wraps `text` in the given codes followed by a reset.
fn paint(codes: &[&str], text: &str) -> String {
    let mut out = codes.concat();
    out.push_str(text);
    out.push_str(colors::RESET);
    out
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    paint(&[colors::BOLD, colors::CYAN], text)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    paint(&[colors::DIM], text)
}

/// Formats a bound parameter value.
pub fn param(text: &str) -> String {
    paint(&[colors::MAGENTA], text)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    paint(&[colors::YELLOW], text)
}

/// Formats text as an error (bold red).
pub fn error(text: &str) -> String {
    paint(&[colors::BOLD, colors::RED], text)
}

/// Applies styling only when color output is enabled.
pub struct Styler {
    /// Highlighter, present only when colors are on.
    highlighter: Option<Highlighter>,
}

impl Styler {
    /// Creates a styler; with `color` off every method returns its input unchanged.
    pub fn new(color: bool) -> Self {
        Self {
            highlighter: color.then(Highlighter::new),
        }
    }

    /// Returns true if output is colored.
    pub fn is_color(&self) -> bool {
        self.highlighter.is_some()
    }

    /// Styles with `f` when colors are on.
    fn apply(&self, f: fn(&str) -> String, text: &str) -> String {
        if self.is_color() { f(text) } else { text.to_string() }
    }

    /// See [`header`].
    pub fn header(&self, text: &str) -> String {
        self.apply(header, text)
    }

    /// See [`dim`].
    pub fn dim(&self, text: &str) -> String {
        self.apply(dim, text)
    }

    /// See [`param`].
    pub fn param(&self, text: &str) -> String {
        self.apply(param, text)
    }

    /// See [`warning`].
    pub fn warning(&self, text: &str) -> String {
        self.apply(warning, text)
    }

    /// See [`error`].
    pub fn error(&self, text: &str) -> String {
        self.apply(error, text)
    }

    /// Highlights SQL when colors are on.
    pub fn sql(&self, sql: &str) -> String {
        match &self.highlighter {
            Some(highlighter) => highlighter.highlight_sql(sql),
            None => sql.to_string(),
        }
    }

    /// Highlights TOML when colors are on.
    pub fn toml(&self, content: &str) -> String {
        match &self.highlighter {
            Some(highlighter) => highlighter.highlight_toml(content),
            None => content.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Removes ANSI escape sequences.
    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_sql_syntax_available() {
        let ss = extra_syntaxes();
        assert!(ss.find_syntax_by_extension("sql").is_some());
        assert!(ss.find_syntax_by_extension("toml").is_some());
    }

    #[test]
    fn test_highlight_sql() {
        let sql = "(column_name LIKE ? or column_name LIKE ?) and column_name LIKE ?";
        let output = Highlighter::new().highlight_sql(sql);
        assert!(output.contains("\x1b["));
        assert!(output.ends_with(colors::RESET));
        assert_eq!(strip_ansi(&output), sql);
    }

    #[test]
    fn test_highlight_toml() {
        let toml = "[query]\ncolumn = \"title\"\n";
        let output = Highlighter::new().highlight_toml(toml);
        assert_eq!(strip_ansi(&output), toml);
    }

    #[test]
    fn test_helpers_wrap_and_reset() {
        let h = header("Test");
        assert!(h.starts_with(colors::BOLD));
        assert!(h.contains(colors::CYAN));
        assert!(h.ends_with(colors::RESET));
        assert_eq!(strip_ansi(&error("boom")), "boom");
        assert!(param("x").contains(colors::MAGENTA));
    }

    #[test]
    fn test_plain_styler_passes_through() {
        let styler = Styler::new(false);
        assert!(!styler.is_color());
        assert_eq!(styler.header("SQL"), "SQL");
        assert_eq!(styler.warning("hint"), "hint");
        assert_eq!(styler.sql("c LIKE ?"), "c LIKE ?");
        assert_eq!(styler.toml("a = 1\n"), "a = 1\n");
    }

    #[test]
    fn test_color_styler_styles() {
        let styler = Styler::new(true);
        assert!(styler.is_color());
        assert_eq!(styler.dim("x"), dim("x"));
        assert_eq!(styler.warning("hint:"), warning("hint:"));
        assert!(styler.sql("c LIKE ?").contains("\x1b["));
    }
}
