//! Error types for query compilation.
//!
//! Grammar failures are user errors and carry enough context to point at the offending input.
//! Internal errors signal a pipeline defect: a tree shape the grammar can never produce.

use std::fmt;

use thiserror::Error;

use crate::{ast::Operator, lexical::raw_run_at};

/// A grammar rule, as reported in the rule stack of a [`SyntaxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The whole query, including surrounding whitespace.
    Query,
    /// The OR tier: AND groups joined by `or` or bare whitespace.
    OrExpr,
    /// The AND tier: primaries joined by `and`.
    AndExpr,
    /// The separator between two OR-tier operands.
    OrSeparator,
    /// The separator between two AND-tier operands.
    AndSeparator,
    /// A group or a word.
    Primary,
    /// A parenthesized sub-expression.
    Group,
    /// A quoted or bare word.
    Word,
    /// A single- or double-quoted literal.
    QuotedString,
    /// A bare run of characters.
    RawWord,
}

impl Rule {
    /// Returns the rule's name as used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::OrExpr => "or_expr",
            Self::AndExpr => "and_expr",
            Self::OrSeparator => "or_separator",
            Self::AndSeparator => "and_separator",
            Self::Primary => "primary",
            Self::Group => "group",
            Self::Word => "word",
            Self::QuotedString => "quoted_string",
            Self::RawWord => "raw_word",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something the grammar would have accepted at the failure offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// A specific punctuation character.
    Char(char),
    /// One or more whitespace characters.
    Whitespace,
    /// A reserved keyword (`and` or `or`).
    Keyword(&'static str),
    /// A quoted or bare word.
    Word,
    /// The quote character that closes an open literal.
    ClosingQuote(char),
    /// No further input.
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "'{c}'"),
            Self::Whitespace => f.write_str("whitespace"),
            Self::Keyword(kw) => write!(f, "keyword \"{kw}\""),
            Self::Word => f.write_str("a word"),
            Self::ClosingQuote(q) => write!(f, "closing quote {q}"),
            Self::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// A grammar failure at the deepest offset any rule reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.format_with_context())]
pub struct SyntaxError {
    /// Byte offset of the failure in the input.
    pub offset: usize,
    /// Alternatives that would have matched at `offset`.
    pub expected: Vec<Expected>,
    /// Rule stack, outermost first, when the failure was first recorded.
    pub rules: Vec<Rule>,
    /// The complete input that failed to parse.
    pub input: String,
}

impl SyntaxError {
    /// Returns the character found at the failure offset, if any.
    pub fn found(&self) -> Option<char> {
        self.input.get(self.offset..).and_then(|rest| rest.chars().next())
    }

    /// Returns the 1-based line and 0-based character column of the failure.
    pub fn line_column(&self) -> (usize, usize) {
        let before = self.input.get(..self.offset).unwrap_or(&self.input);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        (line, before[line_start..].chars().count())
    }

    /// Returns the failure description without the input excerpt.
    pub fn message(&self) -> String {
        let expected = match self.expected.as_slice() {
            [] => "valid input".to_string(),
            [only] => only.to_string(),
            [init @ .., last] => {
                let init: Vec<String> = init.iter().map(ToString::to_string).collect();
                format!("{} or {last}", init.join(", "))
            }
        };
        format!("expected {expected}, found {}", self.found_description())
    }

    /// Describes what sits at the failure offset.
    fn found_description(&self) -> String {
        if let Some(keyword) = self.found_keyword() {
            return format!("keyword \"{keyword}\"");
        }
        match self.found() {
            None => "end of input".to_string(),
            Some(c) if c.is_control() => format!("{c:?}"),
            Some(c) => format!("'{c}'"),
        }
    }

    /// Returns the reserved keyword at the failure offset, if one is there.
    fn found_keyword(&self) -> Option<&str> {
        let run = raw_run_at(&self.input, self.offset);
        matches!(run, "and" | "or").then_some(run)
    }

    /// Returns true if the last non-whitespace character before the failure is `(`.
    fn follows_open_paren(&self) -> bool {
        self.input
            .get(..self.offset)
            .and_then(|before| before.trim_end().chars().next_back())
            == Some('(')
    }

    /// Returns a suggestion for common mistakes.
    pub fn suggestion(&self) -> Option<&'static str> {
        if self
            .expected
            .iter()
            .any(|e| matches!(e, Expected::ClosingQuote(_)))
        {
            return Some("Add a closing quote to finish the quoted word");
        }
        if self.input.trim().is_empty() {
            return Some("Enter at least one word, e.g. 'rust'");
        }
        if self.found_keyword().is_some() && self.expected.contains(&Expected::Word) {
            return Some("Quote reserved words to search for them literally, e.g. '\"and\"'");
        }
        if self.expected.contains(&Expected::Char(')')) {
            return Some("Add a closing parenthesis ) to match the opening one");
        }
        if self.found() == Some(')') {
            if self.follows_open_paren() {
                return Some("Groups cannot be empty; put a word inside the parentheses");
            }
            return Some("Remove the unmatched closing parenthesis");
        }
        None
    }

    /// Formats the error with the offending line and a position indicator.
    pub fn format_with_context(&self) -> String {
        let (line_no, column) = self.line_column();
        let line = self.input.lines().nth(line_no - 1).unwrap_or_default();

        let mut result = format!(
            "query syntax error: {} at line {line_no}, column {}\n",
            self.message(),
            column + 1
        );
        result.push_str(&format!("  {line}\n"));
        result.push_str(&format!("  {}^", " ".repeat(column)));
        if !self.rules.is_empty() {
            let stack: Vec<&str> = self.rules.iter().map(|r| r.name()).collect();
            result.push_str(&format!("\n  while parsing: {}", stack.join(" > ")));
        }
        if let Some(hint) = self.suggestion() {
            result.push_str(&format!("\nhint: {hint}"));
        }
        result
    }
}

/// A tree shape that well-formed grammar output never produces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    /// The transform met a tagged node it has no rewrite for.
    #[error("unexpected parse tree shape: {shape}")]
    UnexpectedShape {
        /// Tags and first value kind of the offending node.
        shape: String,
    },

    /// A chain with no items reached the fold.
    #[error("cannot fold an empty chain")]
    EmptyChain,

    /// A chain began with an operation that has no left operand.
    #[error("chain starts with a pending '{op}' operation")]
    LeadingOperator {
        /// The operator of the leading operation.
        op: Operator,
    },

    /// A chain item after the first was not a pending operation.
    #[error("chain item {index} is a {kind}, not a pending operation")]
    MissingOperator {
        /// Position of the item in the chain.
        index: usize,
        /// Kind of node found there.
        kind: &'static str,
    },

    /// A pending operation appeared outside a chain.
    #[error("pending '{op}' operation outside of a chain")]
    DanglingOperator {
        /// The operator of the stray operation.
        op: Operator,
    },

    /// Literal text appeared where an expression was required.
    #[error("bare text {text:?} outside of a word")]
    StrayText {
        /// The stray text.
        text: String,
    },
}

/// Any failure compiling a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The input does not match the grammar.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// Groups are nested deeper than the configured limit.
    #[error("query syntax error: groups nested deeper than {limit} levels at offset {offset}")]
    TooDeep {
        /// Byte offset of the `(` that exceeded the limit.
        offset: usize,
        /// The configured nesting limit.
        limit: usize,
    },

    /// The configured nesting limit is above what the parser supports.
    #[error("invalid nesting limit {max_depth}: at most {limit} levels are supported")]
    DepthLimitTooHigh {
        /// The requested nesting limit.
        max_depth: usize,
        /// The largest supported limit.
        limit: usize,
    },

    /// The predicate column is not a plain SQL identifier.
    #[error("invalid column name {column:?}: expected an identifier such as 'docs.title'")]
    InvalidColumn {
        /// The rejected column name.
        column: String,
    },

    /// The pipeline met a shape the grammar cannot produce.
    #[error("internal error: {0}")]
    Internal(#[from] InternalError),
}

impl QueryError {
    /// Returns true if this error signals a defect rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}
