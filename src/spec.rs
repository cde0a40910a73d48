//! # Patch Specs
//!
//! The caller-authored, declarative description of the desired shape of a
//! document tree. A [`PatchNode`] mirrors the [`crate::dom::Node`] kinds
//! and adds:
//!
//! - [`PatchNode::ChildrenOnly`] — address only a node's children, leaving
//!   its name and attributes alone.
//! - [`AttrValue::Override`] — force-write an attribute value without
//!   letting it participate in match decisions.
//! - [`AnnotatedPatch`] — per-item ordering (`idx`) and deletion markers.
//!
//! Configurators build these values directly through the fluent helpers
//! below; no file-format concerns leak into this surface.
//!
//! ## Example
//!
//! A patch that pins a color resource and drops a stale one:
//!
//! ```
//! use idempatch::spec::{AnnotatedPatch, PatchElement};
//!
//! let patch = PatchElement::new("resources").merge_children(vec![
//!     PatchElement::new("color")
//!         .attr("name", "splashscreen_background")
//!         .text("#008000")
//!         .into(),
//!     AnnotatedPatch::from(PatchElement::new("color").attr("name", "legacy_background"))
//!         .deleted(),
//! ]);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The value side of a spec attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrValue {
    /// Written on merge and required to match on lookup.
    Literal(String),
    /// Written on merge but ignored when deciding whether an existing
    /// element matches. Lets a patch retarget an attribute whose current
    /// value is unknown.
    Override(String),
}

impl AttrValue {
    /// The value that ends up in the merged document.
    pub fn value(&self) -> &str {
        match self {
            AttrValue::Literal(value) | AttrValue::Override(value) => value,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, AttrValue::Override(_))
    }
}

/// Desired shape of one element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchElement {
    pub name: String,
    pub attributes: IndexMap<String, AttrValue>,
    /// `None` leaves existing children untouched.
    pub children: Option<PatchChildren>,
}

impl PatchElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: None,
        }
    }

    /// Add a literal attribute, returning the spec for chaining.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(key.into(), AttrValue::Literal(value.into()));
        self
    }

    /// Add an override attribute, returning the spec for chaining.
    pub fn attr_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(key.into(), AttrValue::Override(value.into()));
        self
    }

    /// Merge the given items into the element's existing children.
    pub fn merge_children(mut self, items: Vec<AnnotatedPatch>) -> Self {
        self.children = Some(PatchChildren::Merge(items));
        self
    }

    /// Discard the element's existing children and use the given items.
    pub fn replace_children(mut self, items: Vec<AnnotatedPatch>) -> Self {
        self.children = Some(PatchChildren::Replace(items));
        self
    }

    /// Set the element's text content. Text nodes always match, so this
    /// overwrites whatever character data the element currently holds.
    pub fn text(self, value: impl Into<String>) -> Self {
        self.merge_children(vec![AnnotatedPatch::from(PatchNode::Text(value.into()))])
    }
}

/// Desired shape of one node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchNode {
    Element(PatchElement),
    Text(String),
    Comment(String),
    /// Address only the matched node's children; its own name and
    /// attributes are left untouched. Matches any element.
    ChildrenOnly(PatchChildren),
}

impl From<PatchElement> for PatchNode {
    fn from(element: PatchElement) -> Self {
        PatchNode::Element(element)
    }
}

/// How a spec addresses a child list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchChildren {
    /// Match items against existing children and merge in place; unmatched
    /// spec items are appended as new nodes.
    Merge(Vec<AnnotatedPatch>),
    /// Discard all existing children and convert the item list wholesale.
    Replace(Vec<AnnotatedPatch>),
}

/// A spec node carrying optional absolute ordering and a deletion marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedPatch {
    pub node: PatchNode,
    /// Absolute target position applied after matching and merging.
    /// Items without an index keep their relative order among themselves.
    pub idx: Option<usize>,
    /// Marks a matched existing node for removal. A delete-marked item is
    /// never converted into an emitted node.
    pub delete: bool,
}

impl AnnotatedPatch {
    pub fn new(node: impl Into<PatchNode>) -> Self {
        Self {
            node: node.into(),
            idx: None,
            delete: false,
        }
    }

    /// Pin the item to an absolute position in the final child list.
    pub fn at(mut self, idx: usize) -> Self {
        self.idx = Some(idx);
        self
    }

    /// Mark the matched existing node for removal.
    pub fn deleted(mut self) -> Self {
        self.delete = true;
        self
    }
}

impl From<PatchNode> for AnnotatedPatch {
    fn from(node: PatchNode) -> Self {
        AnnotatedPatch::new(node)
    }
}

impl From<PatchElement> for AnnotatedPatch {
    fn from(element: PatchElement) -> Self {
        AnnotatedPatch::new(element)
    }
}
