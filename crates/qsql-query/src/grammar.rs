//! Query grammar.
//!
//! Recursive descent with backtracking over three tiers, loosest first:
//!
//! ```text
//! query         → ws? or_expr ws? EOF
//! or_expr       → and_expr (or_separator and_expr)*
//! or_separator  → ws? "or" ws? | ws
//! and_expr      → primary (and_separator primary)*
//! and_separator → ws "and" ws
//! primary       → "(" ws? or_expr ws? ")" | word
//! word          → quoted_string | raw_word
//! ```
//!
//! Whitespace alone separates OR operands, so `a b and c` is `a or (b and c)`. A group never
//! consumes the whitespace after its `)`: that whitespace belongs to the separator that
//! follows.
//!
//! The output is a [`ParseTree`] tagging each span with `left`, `right`, `and`, `or`,
//! `paren`, `word` or `str`.

use tracing::debug;

use crate::{
    MAX_DEPTH_LIMIT,
    error::{QueryError, Rule},
    lexical::{Miss, Scanner},
    tree::{ParseTree, Span, Tag},
};

/// Why a rule stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    /// The rule did not match; the caller may try an alternative.
    Miss,
    /// Groups nest deeper than allowed. Not recoverable.
    TooDeep {
        /// Offset of the `(` that went over the limit.
        offset: usize,
    },
}

impl From<Miss> for Halt {
    fn from(_: Miss) -> Self {
        Self::Miss
    }
}

/// Result of a grammar rule.
type Parsed<T> = Result<T, Halt>;

/// Recursive descent parser over a single query.
struct Parser<'a> {
    /// Input cursor and failure tracking.
    scanner: Scanner<'a>,
    /// Current group nesting.
    depth: usize,
    /// Maximum group nesting.
    max_depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser for `input`.
    fn new(input: &'a str, max_depth: usize) -> Self {
        Self {
            scanner: Scanner::new(input),
            depth: 0,
            max_depth,
        }
    }

    /// Runs `f` with `rule` on the diagnostic stack.
    fn rule<T>(&mut self, rule: Rule, f: impl FnOnce(&mut Self) -> Parsed<T>) -> Parsed<T> {
        self.scanner.enter(rule);
        let result = f(self);
        self.scanner.leave();
        result
    }

    /// Runs `f`, rewinding the input if it misses.
    fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> Parsed<T>) -> Parsed<Option<T>> {
        let mark = self.scanner.pos();
        match f(self) {
            Ok(value) => Ok(Some(value)),
            Err(Halt::Miss) => {
                self.scanner.reset(mark);
                Ok(None)
            }
            Err(halt) => Err(halt),
        }
    }

    /// Creates a text leaf for `span`.
    fn text(&self, span: Span) -> ParseTree {
        ParseTree::text(self.scanner.slice(span), span)
    }

    /// query → ws? or_expr ws? EOF
    fn query(&mut self) -> Parsed<ParseTree> {
        self.rule(Rule::Query, |p| {
            p.scanner.opt_whitespace();
            let tree = p.or_expr()?;
            p.scanner.opt_whitespace();
            p.scanner.end()?;
            Ok(tree)
        })
    }

    /// or_expr → and_expr (or_separator and_expr)*
    fn or_expr(&mut self) -> Parsed<ParseTree> {
        self.rule(Rule::OrExpr, |p| {
            let head = p.and_expr()?;
            let mut tail = Vec::new();
            while let Some(pair) = p.attempt(|p| {
                let separator = p.or_separator()?;
                let right = p.and_expr()?;
                Ok(ParseTree::pair(Tag::Or, separator, right))
            })? {
                tail.push(pair);
            }
            Ok(ParseTree::chain(head, tail))
        })
    }

    /// or_separator → ws? "or" ws? | ws
    fn or_separator(&mut self) -> Parsed<ParseTree> {
        self.rule(Rule::OrSeparator, |p| {
            let start = p.scanner.pos();
            let keyword = p.attempt(|p| {
                p.scanner.opt_whitespace();
                p.scanner.keyword("or")?;
                p.scanner.opt_whitespace();
                Ok(())
            })?;
            if keyword.is_none() {
                p.scanner.whitespace()?;
            }
            Ok(p.text(Span::new(start, p.scanner.pos())))
        })
    }

    /// and_expr → primary (and_separator primary)*
    fn and_expr(&mut self) -> Parsed<ParseTree> {
        self.rule(Rule::AndExpr, |p| {
            let head = p.primary()?;
            let mut tail = Vec::new();
            while let Some(pair) = p.attempt(|p| {
                let separator = p.and_separator()?;
                let right = p.primary()?;
                Ok(ParseTree::pair(Tag::And, separator, right))
            })? {
                tail.push(pair);
            }
            Ok(ParseTree::chain(head, tail))
        })
    }

    /// and_separator → ws "and" ws
    fn and_separator(&mut self) -> Parsed<ParseTree> {
        self.rule(Rule::AndSeparator, |p| {
            let start = p.scanner.pos();
            p.scanner.whitespace()?;
            p.scanner.keyword("and")?;
            p.scanner.whitespace()?;
            Ok(p.text(Span::new(start, p.scanner.pos())))
        })
    }

    /// primary → group | word
    fn primary(&mut self) -> Parsed<ParseTree> {
        self.rule(Rule::Primary, |p| match p.attempt(Self::group)? {
            Some(group) => Ok(group),
            None => p.word(),
        })
    }

    /// group → "(" ws? or_expr ws? ")"
    ///
    /// Whitespace after the closing parenthesis is left for the enclosing separator.
    fn group(&mut self) -> Parsed<ParseTree> {
        self.rule(Rule::Group, |p| {
            let open = p.scanner.pos();
            p.scanner.char('(')?;
            if p.depth >= p.max_depth {
                return Err(Halt::TooDeep { offset: open });
            }

            p.depth += 1;
            let inner = p.group_body();
            p.depth -= 1;

            Ok(ParseTree::tagged(Tag::Paren, inner?))
        })
    }

    /// The part of a group after its opening parenthesis.
    fn group_body(&mut self) -> Parsed<ParseTree> {
        self.scanner.opt_whitespace();
        let inner = self.or_expr()?;
        self.scanner.opt_whitespace();
        self.scanner.char(')')?;
        Ok(inner)
    }

    /// word → quoted_string | raw_word
    fn word(&mut self) -> Parsed<ParseTree> {
        self.rule(Rule::Word, |p| {
            let quoted = p.attempt(|p| {
                p.rule(Rule::QuotedString, |p| Ok(p.scanner.quoted_string()?))
            })?;
            let value = match quoted {
                Some(span) => ParseTree::tagged(Tag::Str, p.text(span)),
                None => {
                    let span = p.rule(Rule::RawWord, |p| Ok(p.scanner.raw_run()?))?;
                    p.text(span)
                }
            };
            Ok(ParseTree::tagged(Tag::Word, value))
        })
    }
}

/// Parses a query into its generic parse tree.
///
/// Groups nested more than `max_depth` levels deep fail with [`QueryError::TooDeep`]; any
/// other mismatch fails with a [`QueryError::Syntax`] describing the deepest failure. A
/// `max_depth` above [`MAX_DEPTH_LIMIT`] is rejected before any input is read.
pub fn parse(input: &str, max_depth: usize) -> Result<ParseTree, QueryError> {
    if max_depth > MAX_DEPTH_LIMIT {
        return Err(QueryError::DepthLimitTooHigh {
            max_depth,
            limit: MAX_DEPTH_LIMIT,
        });
    }
    let mut parser = Parser::new(input, max_depth);
    match parser.query() {
        Ok(tree) => Ok(tree),
        Err(Halt::Miss) => {
            let err = parser.scanner.into_error();
            debug!(offset = err.offset, "query failed to parse");
            Err(err.into())
        }
        Err(Halt::TooDeep { offset }) => {
            debug!(offset, max_depth, "query nests groups too deeply");
            Err(QueryError::TooDeep {
                offset,
                limit: max_depth,
            })
        }
    }
}
