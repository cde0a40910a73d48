//! The recursive merge algorithm
//!
//! The entry point is [`merge`], which combines an existing node with a
//! spec node. Child lists go through [`merge_children`], which matches
//! existing children against spec items with [`node_matches`], merges the
//! pairs, appends unmatched spec items as new nodes, and finally splices
//! index-pinned items into their absolute positions.
//!
//! Matching is asymmetric: an existing node "matches" a spec node, never
//! the other way round. All functions build fresh output values; inputs
//! are never mutated or aliased into the result.

use log::debug;

use crate::dom::{Attributes, Element, Node};
use crate::spec::{AnnotatedPatch, AttrValue, PatchChildren, PatchElement, PatchNode};

/// Merge a spec node into an existing node, producing a new node.
///
/// - A `Text` or `Comment` spec forces the node kind and overwrites the
///   value.
/// - A `ChildrenOnly` spec leaves the node's name and attributes alone and
///   merges only its children. Applied to a non-element node it is the
///   identity, keeping the engine total.
/// - An `Element` spec wins on name and on every attribute key it
///   specifies; unspecified attributes and (when the spec carries no child
///   list) existing children are preserved unchanged.
pub fn merge(existing: &Node, spec: &PatchNode) -> Node {
    match spec {
        PatchNode::Comment(value) => Node::Comment(value.clone()),
        PatchNode::Text(value) => Node::Text(value.clone()),
        PatchNode::ChildrenOnly(patch) => match existing {
            Node::Element(element) => Node::Element(Element {
                name: element.name.clone(),
                attributes: element.attributes.clone(),
                children: merge_children(&element.children, patch),
            }),
            other => other.clone(),
        },
        PatchNode::Element(spec) => {
            let existing_element = existing.as_element();
            let existing_children: &[Node] = existing_element
                .map(|element| element.children.as_slice())
                .unwrap_or(&[]);

            let mut attributes = existing_element
                .map(|element| element.attributes.clone())
                .unwrap_or_default();
            for (key, value) in &spec.attributes {
                attributes.insert(key.clone(), value.value().to_string());
            }

            let children = match &spec.children {
                Some(patch) => merge_children(existing_children, patch),
                None => existing_children.to_vec(),
            };

            Node::Element(Element {
                name: spec.name.clone(),
                attributes,
                children,
            })
        }
    }
}

/// Merge a spec child list into an existing child list.
///
/// For [`PatchChildren::Merge`], each existing child consumes the first
/// spec item it matches: delete-marked matches drop the child, other
/// matches merge into it. Unmatched children pass through unchanged, and
/// leftover spec items (minus delete markers, which have nothing left to
/// delete) are converted to brand-new nodes at the end. A final pass
/// splices index-pinned items into their absolute positions, in ascending
/// index order; colliding indices keep the items' original relative order.
///
/// For [`PatchChildren::Replace`], existing children are discarded and the
/// item list is converted wholesale, honoring the same index placement.
pub fn merge_children(current: &[Node], patch: &PatchChildren) -> Vec<Node> {
    match patch {
        PatchChildren::Replace(items) => reorder(
            items
                .iter()
                .filter(|item| !item.delete)
                .map(|item| (convert(item), item.idx))
                .collect(),
        ),
        PatchChildren::Merge(items) => {
            let mut remaining: Vec<&AnnotatedPatch> = items.iter().collect();
            let mut emitted: Vec<(Node, Option<usize>)> = Vec::new();

            for child in current {
                let matched = remaining
                    .iter()
                    .position(|item| node_matches(child, &item.node));
                match matched {
                    Some(pos) => {
                        let item = remaining.remove(pos);
                        if item.delete {
                            debug!("dropping matched child of kind {}", kind_name(child));
                            continue;
                        }
                        emitted.push((merge(child, &item.node), item.idx));
                    }
                    None => emitted.push((child.clone(), None)),
                }
            }

            for item in remaining {
                // A leftover delete marker found nothing to delete.
                if item.delete {
                    continue;
                }
                emitted.push((convert_node(&item.node), item.idx));
            }

            reorder(emitted)
        }
    }
}

/// Splice index-pinned nodes into the base sequence formed by the unpinned
/// ones. Pinned nodes are processed in ascending index order; a run of
/// equal indices lands in encounter order. An index past the end clamps to
/// appending.
fn reorder(emitted: Vec<(Node, Option<usize>)>) -> Vec<Node> {
    let mut base = Vec::new();
    let mut pinned = Vec::new();
    for (node, idx) in emitted {
        match idx {
            Some(idx) => pinned.push((idx, node)),
            None => base.push(node),
        }
    }

    // Stable sort: equal indices keep their encounter order.
    pinned.sort_by_key(|(idx, _)| *idx);

    let mut previous: Option<(usize, usize)> = None;
    for (requested, node) in pinned {
        let position = match previous {
            Some((prior_requested, prior_position)) if prior_requested == requested => {
                prior_position + 1
            }
            _ => requested,
        };
        let position = position.min(base.len());
        base.insert(position, node);
        previous = Some((requested, position));
    }

    base
}

/// Decide whether an existing node satisfies a spec node for matching.
///
/// Kinds must agree. Text always matches text (the content is exactly what
/// gets overwritten); comments match on trimmed text; a `ChildrenOnly`
/// spec matches any element. For elements the names must be equal, and
/// then either the existing element carries no attributes at all (a bare
/// wrapper matches unconditionally) or every literal attribute in the spec
/// must already hold. Override attributes and attributes the spec does not
/// mention never block a match.
pub fn node_matches(existing: &Node, spec: &PatchNode) -> bool {
    match (existing, spec) {
        (Node::Comment(a), PatchNode::Comment(b)) => a.trim() == b.trim(),
        (Node::Text(_), PatchNode::Text(_)) => true,
        (Node::Element(_), PatchNode::ChildrenOnly(_)) => true,
        (Node::Element(element), PatchNode::Element(spec)) => {
            if element.name != spec.name {
                return false;
            }
            if element.attributes.is_empty() {
                return true;
            }
            spec.attributes.iter().all(|(key, value)| match value {
                AttrValue::Override(_) => true,
                AttrValue::Literal(expected) => {
                    element.attributes.get(key).map(String::as_str) == Some(expected.as_str())
                }
            })
        }
        _ => false,
    }
}

/// Build a brand-new node from a spec item that has no existing
/// counterpart.
///
/// # Panics
///
/// Panics if the item is delete-marked: there is nothing to delete, so the
/// spec was authored inconsistently with its intended semantics.
pub fn convert(item: &AnnotatedPatch) -> Node {
    assert!(
        !item.delete,
        "cannot convert a delete-marked patch item into a node"
    );
    convert_node(&item.node)
}

fn convert_node(spec: &PatchNode) -> Node {
    match spec {
        PatchNode::Text(value) => Node::Text(value.clone()),
        PatchNode::Comment(value) => Node::Comment(value.clone()),
        PatchNode::Element(spec) => Node::Element(convert_element(spec)),
        // A ChildrenOnly spec names no element; materializing one is a
        // degenerate authoring case that yields an unnamed element.
        PatchNode::ChildrenOnly(children) => Node::Element(Element {
            name: String::new(),
            attributes: Attributes::new(),
            children: merge_children(&[], children),
        }),
    }
}

fn convert_element(spec: &PatchElement) -> Element {
    Element {
        name: spec.name.clone(),
        attributes: spec
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), value.value().to_string()))
            .collect(),
        children: match &spec.children {
            Some(patch) => merge_children(&[], patch),
            None => Vec::new(),
        },
    }
}

fn kind_name(node: &Node) -> &'static str {
    match node {
        Node::Element(_) => "Element",
        Node::Text(_) => "Text",
        Node::Comment(_) => "Comment",
    }
}
