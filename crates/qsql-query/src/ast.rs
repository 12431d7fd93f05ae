//! Query abstract syntax tree.
//!
//! [`Node`] is the unresolved form the transform produces: operations still wait for their
//! left operand inside chains. [`Expr`] is the resolved binary tree the renderer consumes.

use std::{fmt, mem};

use serde::Serialize;

/// A boolean operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// Both sides must match.
    And,
    /// Either side must match.
    Or,
}

impl Operator {
    /// Returns the lowercase keyword, as written in queries and rendered SQL.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// An unresolved expression, as produced by the transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text that has not yet been wrapped as a word.
    Text(String),

    /// A word leaf.
    Word(String),

    /// An operator and its right operand, waiting for a left operand.
    Pending {
        /// The operator to apply.
        op: Operator,
        /// The right-hand operand.
        operand: Box<Self>,
    },

    /// An operand followed by pending operations, folded left to right.
    Chain(Vec<Self>),

    /// A parenthesized sub-expression.
    Group(Box<Self>),
}

impl Node {
    /// Creates a pending operation.
    pub fn pending(op: Operator, operand: Self) -> Self {
        Self::Pending {
            op,
            operand: Box::new(operand),
        }
    }

    /// Creates a group.
    pub fn group(inner: Self) -> Self {
        Self::Group(Box::new(inner))
    }

    /// Returns a short name for the node's variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Word(_) => "word",
            Self::Pending { .. } => "pending operation",
            Self::Chain(_) => "chain",
            Self::Group(_) => "group",
        }
    }
}

/// A resolved query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A word: one `LIKE` predicate.
    Word(String),

    /// Two expressions joined by an operator.
    Binary {
        /// The operator joining both sides.
        op: Operator,
        /// Left operand.
        left: Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },

    /// A parenthesized sub-expression. Renders its own parentheses.
    Group(Box<Self>),
}

impl Expr {
    /// Creates a word leaf.
    pub fn word(text: impl Into<String>) -> Self {
        Self::Word(text.into())
    }

    /// Creates a binary expression.
    pub fn binary(op: Operator, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates an AND expression.
    pub fn and(left: Self, right: Self) -> Self {
        Self::binary(Operator::And, left, right)
    }

    /// Creates an OR expression.
    pub fn or(left: Self, right: Self) -> Self {
        Self::binary(Operator::Or, left, right)
    }

    /// Creates a group.
    pub fn group(inner: Self) -> Self {
        Self::Group(Box::new(inner))
    }

    /// Returns the word leaves in depth-first, left-before-right order.
    pub fn words(&self) -> Vec<&str> {
        let mut words = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Self::Word(text) => words.push(text.as_str()),
                Self::Binary { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
                Self::Group(inner) => stack.push(inner),
            }
        }
        words
    }

    /// Moves the children of this node into `out`, leaving empty words behind.
    fn detach_children(&mut self, out: &mut Vec<Self>) {
        let mut take = |child: &mut Box<Self>| {
            out.push(mem::replace(child.as_mut(), Self::Word(String::new())));
        };
        match self {
            Self::Word(_) => {}
            Self::Binary { left, right, .. } => {
                take(left);
                take(right);
            }
            Self::Group(inner) => take(inner),
        }
    }

    /// Returns the operands of a left-nested run of `op`, leftmost first.
    fn spine_operands(&self, op: Operator) -> Vec<&Self> {
        let mut operands = Vec::new();
        let mut node = self;
        while let Self::Binary {
            op: inner,
            left,
            right,
        } = node
        {
            if *inner != op {
                break;
            }
            operands.push(right.as_ref());
            node = left.as_ref();
        }
        operands.push(node);
        operands.reverse();
        operands
    }

    /// Formats the expression as a tree structure, one node per line.
    ///
    /// A left-nested run of one operator prints as a single node listing its operands, so a
    /// folded chain of N words takes N + 1 lines rather than nesting N levels deep.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self, 0)];
        while let Some((expr, indent)) = stack.pop() {
            let prefix = "  ".repeat(indent);
            match expr {
                Self::Word(text) => writeln!(f, "{prefix}Word({text:?})")?,
                Self::Binary { op, .. } => {
                    let name = match op {
                        Operator::And => "And",
                        Operator::Or => "Or",
                    };
                    writeln!(f, "{prefix}{name}")?;
                    for operand in expr.spine_operands(*op).into_iter().rev() {
                        stack.push((operand, indent + 1));
                    }
                }
                Self::Group(inner) => {
                    writeln!(f, "{prefix}Group")?;
                    stack.push((inner.as_ref(), indent + 1));
                }
            }
        }
        Ok(())
    }
}

// Folded chains nest one level per operand; dropping them recursively would use one stack
// frame per word.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f)
    }
}
