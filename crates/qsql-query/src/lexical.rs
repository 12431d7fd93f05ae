//! Lexical primitives shared by the grammar.
//!
//! The [`Scanner`] is a cursor over the input that also remembers the deepest failure any
//! recognizer reported, together with the rule stack at that point. Recognizers never
//! allocate; they return spans into the input.

use crate::{
    error::{Expected, Rule, SyntaxError},
    tree::Span,
};

/// Marker for a recognizer that did not match at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Miss;

/// Result of a recognizer.
pub type Scan<T> = Result<T, Miss>;

/// The reserved keywords. They are never bare words.
pub const KEYWORDS: [&str; 2] = ["and", "or"];

/// Returns true for the characters the grammar treats as whitespace.
pub fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// Returns true for characters that can appear in a bare word.
fn is_raw(c: char) -> bool {
    !is_space(c) && c != '(' && c != ')'
}

/// Returns true for the characters that open a quoted literal.
fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Returns the maximal run of bare-word characters starting at `offset`.
pub fn raw_run_at(input: &str, offset: usize) -> &str {
    let rest = input.get(offset..).unwrap_or_default();
    let len = rest.find(|c| !is_raw(c)).unwrap_or(rest.len());
    &rest[..len]
}

/// The deepest failure recorded so far.
#[derive(Debug)]
struct Furthest {
    /// Byte offset of the failure.
    offset: usize,
    /// Everything that was expected there.
    expected: Vec<Expected>,
    /// Rule stack when the first expectation at this offset was recorded.
    rules: Vec<Rule>,
}

/// A backtracking cursor over the query input.
#[derive(Debug)]
pub struct Scanner<'a> {
    /// The full input.
    input: &'a str,
    /// Current byte position.
    pos: usize,
    /// Rules currently being matched, outermost first.
    rules: Vec<Rule>,
    /// Deepest recorded failure.
    furthest: Option<Furthest>,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of `input`.
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            rules: Vec::new(),
            furthest: None,
        }
    }

    /// Returns the current byte position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Moves back to a previously saved position.
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Returns the input text covered by `span`.
    pub fn slice(&self, span: Span) -> &'a str {
        &self.input[span.start..span.end]
    }

    /// Returns the next character without consuming it.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Consumes and returns the next character.
    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Pushes a rule onto the diagnostic stack.
    pub fn enter(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Pops the innermost rule from the diagnostic stack.
    pub fn leave(&mut self) {
        self.rules.pop();
    }

    /// Records that `what` was expected at the current position and returns a miss.
    pub fn expect(&mut self, what: Expected) -> Miss {
        match &mut self.furthest {
            Some(f) if f.offset > self.pos => {}
            Some(f) if f.offset == self.pos => {
                if !f.expected.contains(&what) {
                    f.expected.push(what);
                }
            }
            _ => {
                self.furthest = Some(Furthest {
                    offset: self.pos,
                    expected: vec![what],
                    rules: self.rules.clone(),
                });
            }
        }
        Miss
    }

    /// Matches one or more whitespace characters.
    pub fn whitespace(&mut self) -> Scan<Span> {
        let start = self.pos;
        self.opt_whitespace();
        if self.pos == start {
            return Err(self.expect(Expected::Whitespace));
        }
        Ok(Span::new(start, self.pos))
    }

    /// Skips any whitespace. Never fails.
    pub fn opt_whitespace(&mut self) {
        while self.peek().is_some_and(is_space) {
            self.bump();
        }
    }

    /// Matches a single literal character.
    pub fn char(&mut self, expected: char) -> Scan<()> {
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.expect(Expected::Char(expected)))
        }
    }

    /// Matches a reserved keyword standing as a complete bare run.
    pub fn keyword(&mut self, keyword: &'static str) -> Scan<Span> {
        if raw_run_at(self.input, self.pos) != keyword {
            return Err(self.expect(Expected::Keyword(keyword)));
        }
        let start = self.pos;
        self.pos += keyword.len();
        Ok(Span::new(start, self.pos))
    }

    /// Matches a single- or double-quoted literal, returning the span between the quotes.
    ///
    /// A backslash and the character after it form one unit; both are kept in the literal,
    /// so `"a\"b"` yields `a\"b`. Escapes are not decoded.
    pub fn quoted_string(&mut self) -> Scan<Span> {
        let Some(quote) = self.peek().filter(|&c| is_quote(c)) else {
            return Err(Miss);
        };
        self.bump();
        let start = self.pos;

        loop {
            match self.peek() {
                Some('\\') => {
                    self.bump();
                    if self.bump().is_none() {
                        return Err(self.expect(Expected::ClosingQuote(quote)));
                    }
                }
                Some(c) if c == quote => {
                    let span = Span::new(start, self.pos);
                    self.bump();
                    return Ok(span);
                }
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.expect(Expected::ClosingQuote(quote))),
            }
        }
    }

    /// Matches a bare word: a run without whitespace or parentheses that does not start
    /// with a quote and is not a reserved keyword.
    pub fn raw_run(&mut self) -> Scan<Span> {
        let run = raw_run_at(self.input, self.pos);
        if run.is_empty() || run.starts_with(is_quote) || KEYWORDS.contains(&run) {
            return Err(self.expect(Expected::Word));
        }
        let start = self.pos;
        self.pos += run.len();
        Ok(Span::new(start, self.pos))
    }

    /// Matches the end of the input.
    pub fn end(&mut self) -> Scan<()> {
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(self.expect(Expected::EndOfInput))
        }
    }

    /// Converts the deepest recorded failure into a syntax error.
    pub fn into_error(self) -> SyntaxError {
        let furthest = self.furthest.unwrap_or(Furthest {
            offset: self.pos,
            expected: Vec::new(),
            rules: Vec::new(),
        });
        SyntaxError {
            offset: furthest.offset,
            expected: furthest.expected,
            rules: furthest.rules,
            input: self.input.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_needs_one_char() {
        let mut s = Scanner::new(" \t\nx");
        assert_eq!(s.whitespace(), Ok(Span::new(0, 3)));
        assert_eq!(s.whitespace(), Err(Miss));
        assert_eq!(s.pos(), 3);
    }

    #[test]
    fn vertical_tab_and_form_feed_are_space() {
        assert!(is_space('\x0B'));
        assert!(is_space('\x0C'));
        assert!(!is_space('\u{a0}'));
    }

    #[test]
    fn double_quoted_literal() {
        let mut s = Scanner::new("\"ff f\" rest");
        let span = s.quoted_string().unwrap();
        assert_eq!(s.slice(span), "ff f");
        assert_eq!(s.pos(), 6);
    }

    #[test]
    fn single_quoted_literal_keeps_double_quotes() {
        let mut s = Scanner::new("'say \"hi\"'");
        let span = s.quoted_string().unwrap();
        assert_eq!(s.slice(span), "say \"hi\"");
    }

    #[test]
    fn escapes_are_kept_verbatim() {
        let mut s = Scanner::new(r#""a\"b\\""#);
        let span = s.quoted_string().unwrap();
        assert_eq!(s.slice(span), r#"a\"b\\"#);
    }

    #[test]
    fn empty_quoted_literal() {
        let mut s = Scanner::new("''");
        let span = s.quoted_string().unwrap();
        assert_eq!(s.slice(span), "");
    }

    #[test]
    fn unterminated_quote_records_end_offset() {
        let mut s = Scanner::new("\"aaa");
        assert_eq!(s.quoted_string(), Err(Miss));
        let err = s.into_error();
        assert_eq!(err.offset, 4);
        assert_eq!(err.expected, vec![Expected::ClosingQuote('"')]);
    }

    #[test]
    fn trailing_backslash_is_unterminated() {
        let mut s = Scanner::new("'abc\\");
        assert_eq!(s.quoted_string(), Err(Miss));
        assert_eq!(s.into_error().offset, 5);
    }

    #[test]
    fn raw_run_stops_at_space_and_parens() {
        let mut s = Scanner::new("bbb1)");
        assert_eq!(s.raw_run(), Ok(Span::new(0, 4)));

        let mut s = Scanner::new("don't stop");
        let span = s.raw_run().unwrap();
        assert_eq!(s.slice(span), "don't");
    }

    #[test]
    fn raw_run_rejects_keywords_exactly() {
        assert_eq!(Scanner::new("and").raw_run(), Err(Miss));
        assert_eq!(Scanner::new("or)").raw_run(), Err(Miss));
        assert_eq!(Scanner::new("order").raw_run(), Ok(Span::new(0, 5)));
        assert_eq!(Scanner::new("android").raw_run(), Ok(Span::new(0, 7)));
        assert_eq!(Scanner::new("AND").raw_run(), Ok(Span::new(0, 3)));
    }

    #[test]
    fn raw_run_never_starts_with_quote() {
        assert_eq!(Scanner::new("\"aaa").raw_run(), Err(Miss));
        assert_eq!(Scanner::new("a\"b").raw_run(), Ok(Span::new(0, 3)));
    }

    #[test]
    fn keyword_needs_a_full_run() {
        let mut s = Scanner::new("or(b)");
        assert_eq!(s.keyword("or"), Ok(Span::new(0, 2)));

        let mut s = Scanner::new("orange");
        assert_eq!(s.keyword("or"), Err(Miss));
        assert_eq!(s.pos(), 0);
    }

    #[test]
    fn deepest_failure_wins_and_merges() {
        let mut s = Scanner::new("ab");
        s.enter(Rule::Query);
        s.expect(Expected::Word);
        s.reset(1);
        s.enter(Rule::Word);
        s.expect(Expected::Char(')'));
        s.leave();
        s.expect(Expected::EndOfInput);
        s.reset(0);
        s.expect(Expected::Whitespace);

        let err = s.into_error();
        assert_eq!(err.offset, 1);
        assert_eq!(
            err.expected,
            vec![Expected::Char(')'), Expected::EndOfInput]
        );
        assert_eq!(err.rules, vec![Rule::Query, Rule::Word]);
    }
}
