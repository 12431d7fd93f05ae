//! Left fold of chains into binary expressions.
//!
//! The first item of a chain seeds the accumulator; every later item must be a pending
//! operation, which takes the accumulator as its left operand. Both tiers therefore
//! associate to the left: `a or b or c` is `(a or b) or c`.

use crate::{
    ast::{Expr, Node},
    error::InternalError,
};

/// Resolves an unresolved AST into a binary expression tree.
pub fn fold(node: Node) -> Result<Expr, InternalError> {
    match node {
        Node::Word(text) => Ok(Expr::Word(text)),
        Node::Group(inner) => Ok(Expr::group(fold(*inner)?)),
        Node::Chain(items) => fold_chain(items),
        Node::Pending { op, .. } => Err(InternalError::DanglingOperator { op }),
        Node::Text(text) => Err(InternalError::StrayText { text }),
    }
}

/// Folds one chain left to right.
fn fold_chain(items: Vec<Node>) -> Result<Expr, InternalError> {
    let mut items = items.into_iter();
    let first = match items.next() {
        None => return Err(InternalError::EmptyChain),
        Some(Node::Pending { op, .. }) => return Err(InternalError::LeadingOperator { op }),
        Some(first) => first,
    };

    let mut acc = fold(first)?;
    for (index, item) in items.enumerate() {
        match item {
            Node::Pending { op, operand } => acc = Expr::binary(op, acc, fold(*operand)?),
            other => {
                return Err(InternalError::MissingOperator {
                    index: index + 1,
                    kind: other.kind(),
                });
            }
        }
    }
    Ok(acc)
}
