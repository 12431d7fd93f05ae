//! Boolean search queries compiled to SQL filters.
//!
//! A query is a small boolean language typed by people:
//!
//! - **Words**: `rust` or `"error handling"` - each becomes one `LIKE` predicate
//! - **OR**: `rust or golang`, or just `rust golang` - whitespace alone means OR
//! - **AND**: `rust and async` - binds tighter than OR
//! - **Grouping**: `(rust or golang) and async` - precedence control
//!
//! Compilation runs four stages: the [grammar](parse_tree) builds a generic parse tree,
//! [`transform`] rewrites it into an unresolved AST, [`fold`] resolves chains into a
//! left-associative binary tree and [`render`] writes the SQL fragment and its parameters.
//!
//! # Example
//!
//! ```
//! let out = qsql_query::compile("(aaa or bbb) and ccc").unwrap();
//! assert_eq!(
//!     out.sql,
//!     "(column_name LIKE ? or column_name LIKE ?) and column_name LIKE ?"
//! );
//! assert_eq!(out.params, ["aaa", "bbb", "ccc"]);
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod fold;
mod grammar;
mod lexical;
mod render;
mod transform;
mod tree;

use tracing::{debug, trace};

pub use ast::{Expr, Node, Operator};
pub use error::{Expected, InternalError, QueryError, Rule, SyntaxError};
pub use fold::fold;
pub use grammar::parse as parse_tree;
pub use render::{Rendered, is_valid_column, render};
pub use transform::transform;
pub use tree::{ParseTree, Span, Tag};

/// Column tested by each word unless another is configured.
pub const DEFAULT_COLUMN: &str = "column_name";

/// Default limit on group nesting.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Largest group nesting limit accepted.
///
/// Each nesting level costs stack in the grammar, transform, fold and renderer; this bound
/// keeps the deepest accepted query well inside a default main-thread stack.
pub const MAX_DEPTH_LIMIT: usize = 256;

/// Options controlling compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Column every `LIKE` predicate tests.
    pub column: String,
    /// Maximum group nesting accepted by the grammar.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            column: DEFAULT_COLUMN.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl CompileOptions {
    /// Sets the predicate column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    /// Sets the group nesting limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Compiles queries with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    /// Validated options.
    options: CompileOptions,
}

impl Compiler {
    /// Creates a compiler, rejecting a column that is not a plain SQL identifier and a
    /// nesting limit above [`MAX_DEPTH_LIMIT`].
    pub fn new(options: CompileOptions) -> Result<Self, QueryError> {
        if options.max_depth > MAX_DEPTH_LIMIT {
            return Err(QueryError::DepthLimitTooHigh {
                max_depth: options.max_depth,
                limit: MAX_DEPTH_LIMIT,
            });
        }
        if !is_valid_column(&options.column) {
            return Err(QueryError::InvalidColumn {
                column: options.column,
            });
        }
        Ok(Self { options })
    }

    /// Returns the options this compiler was built with.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Parses a query into its generic parse tree.
    pub fn parse_tree(&self, input: &str) -> Result<ParseTree, QueryError> {
        debug!(bytes = input.len(), "parsing query");
        grammar::parse(input, self.options.max_depth)
    }

    /// Parses, transforms and folds a query into a resolved expression.
    pub fn expression(&self, input: &str) -> Result<Expr, QueryError> {
        let tree = self.parse_tree(input)?;
        trace!(%tree, "parse tree");
        let node = transform(&tree)?;
        let expr = fold(node)?;
        trace!(%expr, "resolved expression");
        Ok(expr)
    }

    /// Compiles a query into a SQL fragment and its parameters.
    pub fn compile(&self, input: &str) -> Result<Rendered, QueryError> {
        let expr = self.expression(input)?;
        let rendered = render(&expr, &self.options.column);
        debug!(params = rendered.params.len(), "rendered filter");
        Ok(rendered)
    }
}

/// Compiles a query with the default options.
pub fn compile(input: &str) -> Result<Rendered, QueryError> {
    Compiler::default().compile(input)
}
