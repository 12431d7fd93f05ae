//! Generic parse tree produced by the grammar.
//!
//! The tree only records which rule matched which span. Giving it meaning is the job of
//! [`transform`](crate::transform()).

use std::fmt;

/// A byte range in the query input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start offset, inclusive.
    pub start: usize,
    /// End offset, exclusive.
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// The label a grammar rule attaches to the span it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// First operand of a tier.
    Left,
    /// Operand following a separator.
    Right,
    /// An AND separator.
    And,
    /// An OR separator, keyword or bare whitespace.
    Or,
    /// A parenthesized group.
    Paren,
    /// A word.
    Word,
    /// The contents of a quoted literal.
    Str,
}

impl Tag {
    /// Returns the tag name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::And => "and",
            Self::Or => "or",
            Self::Paren => "paren",
            Self::Word => "word",
            Self::Str => "str",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the generic parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTree {
    /// Matched input text.
    Text {
        /// The text, exactly as it appears in the input.
        text: String,
        /// Where the text sits in the input.
        span: Span,
    },

    /// Named fields, in match order.
    Tagged(Vec<(Tag, Self)>),

    /// An operand followed by one or more separator/operand pairs.
    Sequence(Vec<Self>),
}

impl ParseTree {
    /// Creates a text leaf.
    pub fn text(text: impl Into<String>, span: Span) -> Self {
        Self::Text {
            text: text.into(),
            span,
        }
    }

    /// Creates a node with a single tagged field.
    pub fn tagged(tag: Tag, value: Self) -> Self {
        Self::Tagged(vec![(tag, value)])
    }

    /// Creates a separator/operand pair such as `{or: " ", right: ...}`.
    pub fn pair(separator_tag: Tag, separator: Self, right: Self) -> Self {
        Self::Tagged(vec![(separator_tag, separator), (Tag::Right, right)])
    }

    /// Assembles a tier: `{left: head}` alone, or a sequence of it and the pairs after it.
    pub fn chain(head: Self, tail: Vec<Self>) -> Self {
        let left = Self::tagged(Tag::Left, head);
        if tail.is_empty() {
            left
        } else {
            let mut items = Vec::with_capacity(tail.len() + 1);
            items.push(left);
            items.extend(tail);
            Self::Sequence(items)
        }
    }

    /// Formats the tree with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Text { text, span } => writeln!(f, "{prefix}{text:?} @{span}"),
            Self::Tagged(fields) => {
                for (tag, value) in fields {
                    if let Self::Text { text, span } = value {
                        writeln!(f, "{prefix}{tag}: {text:?} @{span}")?;
                    } else {
                        writeln!(f, "{prefix}{tag}:")?;
                        value.fmt_tree(f, indent + 1)?;
                    }
                }
                Ok(())
            }
            Self::Sequence(items) => {
                writeln!(f, "{prefix}sequence")?;
                for item in items {
                    writeln!(f, "{prefix}  item")?;
                    item.fmt_tree(f, indent + 2)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
