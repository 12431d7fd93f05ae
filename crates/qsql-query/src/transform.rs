//! Parse tree to AST transform.
//!
//! A bottom-up rewrite: children are transformed first, then the node is matched by the shape
//! of its tags. Every shape the grammar emits has exactly one rule:
//!
//! | shape                  | result                   |
//! |------------------------|--------------------------|
//! | `{str: text}`          | the text                 |
//! | `{left: x}`            | `x`                      |
//! | `{word: text}`         | `Word(text)`             |
//! | `{or: _, right: r}`    | `Pending(or, r)`         |
//! | `{and: _, right: r}`   | `Pending(and, r)`        |
//! | `{paren: x}`           | `Group(x)`               |
//! | `[a, b, ...]`          | `Chain([a, b, ...])`     |

use crate::{
    ast::{Node, Operator},
    error::InternalError,
    tree::{ParseTree, Tag},
};

/// Rewrites a generic parse tree into an unresolved AST.
///
/// Fails only on shapes the grammar never produces.
pub fn transform(tree: &ParseTree) -> Result<Node, InternalError> {
    match tree {
        ParseTree::Text { text, .. } => Ok(Node::Text(text.clone())),
        ParseTree::Sequence(items) => items
            .iter()
            .map(transform)
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Chain),
        ParseTree::Tagged(fields) => {
            let tags: Vec<Tag> = fields.iter().map(|(tag, _)| *tag).collect();
            let values = fields
                .iter()
                .map(|(_, value)| transform(value))
                .collect::<Result<Vec<_>, _>>()?;
            rewrite(&tags, values)
        }
    }
}

/// Applies the rewrite rule for one tagged node whose values are already transformed.
fn rewrite(tags: &[Tag], values: Vec<Node>) -> Result<Node, InternalError> {
    let mut values = values.into_iter();
    match (tags, values.next(), values.next()) {
        ([Tag::Str], Some(Node::Text(text)), None) => Ok(Node::Text(text)),
        ([Tag::Left], Some(node), None) => Ok(node),
        ([Tag::Word], Some(Node::Text(text)), None) => Ok(Node::Word(text)),
        ([Tag::Or, Tag::Right], Some(Node::Text(_)), Some(right)) => {
            Ok(Node::pending(Operator::Or, right))
        }
        ([Tag::And, Tag::Right], Some(Node::Text(_)), Some(right)) => {
            Ok(Node::pending(Operator::And, right))
        }
        ([Tag::Paren], Some(inner), None) => Ok(Node::group(inner)),
        (tags, first, _) => Err(InternalError::UnexpectedShape {
            shape: describe(tags, first.as_ref()),
        }),
    }
}

/// Describes a tagged node for diagnostics, e.g. `{word: chain}`.
fn describe(tags: &[Tag], first: Option<&Node>) -> String {
    let names: Vec<&str> = tags.iter().map(|t| t.name()).collect();
    match first {
        Some(node) => format!("{{{}}} with {}", names.join(", "), node.kind()),
        None => format!("{{{}}}", names.join(", ")),
    }
}
