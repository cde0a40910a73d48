//! # Document Model
//!
//! The in-memory tree representing one parsed markup file. A tree is made
//! of [`Node`]s — elements, text, and comments — and is wrapped in a
//! [`Document`] carrying the optional declaration line from the top of the
//! file.
//!
//! Attribute order and child order are both semantically meaningful for
//! serialization, so attributes live in an `IndexMap` and children in a
//! `Vec`. Trees are plain owned values: merging never mutates its inputs,
//! it builds fresh output trees, which is what makes the non-destructiveness
//! contract of the merge engine auditable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered attribute map of an element. Keys are unique per element.
pub type Attributes = IndexMap<String, String>;

/// A single node in a document tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// A named element with attributes and ordered children.
    Element(Element),
    /// A run of character data.
    Text(String),
    /// A comment. Preserved verbatim so user-authored notes survive a merge.
    Comment(String),
}

/// A named element with ordered attributes and children.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Add or replace an attribute, returning the element for chaining.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Append a child node, returning the element for chaining.
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append a text child, returning the element for chaining.
    pub fn text(self, value: impl Into<String>) -> Self {
        self.child(Node::Text(value.into()))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Node {
    /// Shorthand for a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Shorthand for a comment node.
    pub fn comment(value: impl Into<String>) -> Self {
        Node::Comment(value.into())
    }

    /// The element behind this node, if it is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Node::Comment(_))
    }
}

/// A whole markup file: the declaration line (if any), comments that
/// precede the root element, and the root node itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Raw declaration as it appeared in the source, e.g.
    /// `<?xml version="1.0" encoding="utf-8"?>`.
    pub declaration: Option<String>,
    /// Comment text appearing between the declaration and the root element.
    pub prolog_comments: Vec<String>,
    pub root: Node,
}

impl Document {
    /// Wrap a root node with the standard declaration.
    pub fn new(root: impl Into<Node>) -> Self {
        Self {
            declaration: Some(DEFAULT_DECLARATION.to_string()),
            prolog_comments: Vec::new(),
            root: root.into(),
        }
    }

    /// Minimal fallback document used when the target file does not exist
    /// yet: a declaration plus an empty root element.
    pub fn skeleton(root_name: impl Into<String>) -> Self {
        Self::new(Element::new(root_name))
    }
}

/// Declaration written onto documents built in memory.
pub const DEFAULT_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
