//! SQL rendering.
//!
//! Every word becomes `<column> LIKE ?` and contributes its text, unchanged, as one bound
//! parameter. Parameters follow the placeholders left to right.

use serde::Serialize;

use crate::ast::Expr;

/// A rendered SQL filter fragment and its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rendered {
    /// SQL fragment with `?` placeholders.
    pub sql: String,
    /// Parameter values, one per placeholder, in placeholder order.
    pub params: Vec<String>,
}

/// Returns true if `name` is a plain, optionally dotted, SQL identifier.
pub fn is_valid_column(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Renders a resolved expression against `column`.
pub fn render(expr: &Expr, column: &str) -> Rendered {
    let mut writer = Writer {
        column,
        sql: String::new(),
        params: Vec::new(),
    };
    writer.write(expr);
    Rendered {
        sql: writer.sql,
        params: writer.params,
    }
}

/// Accumulates SQL text and parameters during a walk.
struct Writer<'a> {
    /// Column every predicate tests.
    column: &'a str,
    /// SQL written so far.
    sql: String,
    /// Parameters collected so far.
    params: Vec<String>,
}

impl Writer<'_> {
    /// Writes an expression.
    ///
    /// Chains fold into left-nested trees, so the left spine is walked in a loop and only
    /// right operands and groups recurse.
    fn write(&mut self, expr: &Expr) {
        let mut spine = Vec::new();
        let mut leftmost = expr;
        while let Expr::Binary { op, left, right } = leftmost {
            spine.push((*op, right.as_ref()));
            leftmost = left;
        }

        self.write_operand(leftmost);
        for (op, right) in spine.into_iter().rev() {
            self.sql.push(' ');
            self.sql.push_str(op.keyword());
            self.sql.push(' ');
            self.write(right);
        }
    }

    /// Writes a word or group.
    fn write_operand(&mut self, expr: &Expr) {
        match expr {
            Expr::Word(text) => {
                self.sql.push_str(self.column);
                self.sql.push_str(" LIKE ?");
                self.params.push(text.clone());
            }
            Expr::Group(inner) => {
                self.sql.push('(');
                self.write(inner);
                self.sql.push(')');
            }
            Expr::Binary { .. } => self.write(expr),
        }
    }
}
