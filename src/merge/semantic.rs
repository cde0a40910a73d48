//! Semantic equality between document trees
//!
//! Callers use this to decide whether a generated variant of a file is
//! redundant and can be deleted — e.g. a dark-mode overlay that ended up
//! identical to the light-mode resource except for comments. The deletion
//! decision itself belongs to the caller; this module only answers the
//! equality question.

use crate::dom::{Document, Element, Node};

/// Deep equality of two trees, optionally ignoring comment nodes.
///
/// With `disregard_comments`, every comment is stripped recursively from
/// both trees before comparison. Stripping removes only the comment
/// entries; surviving siblings are never reordered. Two trees that are
/// both a bare comment compare equal under this mode.
pub fn semantically_equal(a: &Node, b: &Node, disregard_comments: bool) -> bool {
    if !disregard_comments {
        return a == b;
    }
    match (strip_comments(a), strip_comments(b)) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        _ => false,
    }
}

/// [`semantically_equal`] over whole documents, comparing the roots.
/// Declarations and prolog comments are formatting, not content, and are
/// ignored.
pub fn documents_equal(a: &Document, b: &Document, disregard_comments: bool) -> bool {
    semantically_equal(&a.root, &b.root, disregard_comments)
}

fn strip_comments(node: &Node) -> Option<Node> {
    match node {
        Node::Comment(_) => None,
        Node::Text(value) => Some(Node::Text(value.clone())),
        Node::Element(element) => Some(Node::Element(Element {
            name: element.name.clone(),
            attributes: element.attributes.clone(),
            children: element.children.iter().filter_map(strip_comments).collect(),
        })),
    }
}
