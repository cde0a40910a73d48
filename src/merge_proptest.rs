//! Property-based tests for the merge engine.
//!
//! These tests use proptest to generate random document trees and patch
//! specs and verify that the engine's contracts hold for all of them.
//!
//! Generated trees use distinct element names per child list, mirroring
//! how resource and manifest files address entries, so each spec item has
//! at most one match candidate.

#[cfg(test)]
mod proptest_tests {
    use indexmap::IndexMap;
    use proptest::collection::vec as pvec;
    use proptest::prelude::*;
    use proptest::sample::subsequence;

    use crate::dom::{Document, Element, Node};
    use crate::merge::{merge, semantically_equal};
    use crate::spec::{AnnotatedPatch, AttrValue, PatchChildren, PatchElement, PatchNode};
    use crate::xml;

    const CHILD_NAMES: &[&str] = &["alpha", "beta", "gamma", "delta", "epsilon"];
    const FRESH_NAMES: &[&str] = &["omega", "sigma", "theta"];
    const ATTR_KEYS: &[&str] = &["name", "value", "translatable"];

    fn attributes() -> impl Strategy<Value = IndexMap<String, String>> {
        subsequence(ATTR_KEYS.to_vec(), 0..=ATTR_KEYS.len()).prop_flat_map(|keys| {
            let len = keys.len();
            pvec("[a-z0-9#@/]{1,8}", len).prop_map(move |values| {
                keys.iter()
                    .map(|key| key.to_string())
                    .zip(values)
                    .collect()
            })
        })
    }

    #[derive(Clone, Debug)]
    enum Body {
        Text(Option<String>),
        Nested(Vec<Node>),
    }

    fn node_body(depth: u32) -> BoxedStrategy<(IndexMap<String, String>, Body)> {
        if depth == 0 {
            (attributes(), proptest::option::of("[a-zA-Z0-9#@/]{1,10}"))
                .prop_map(|(attrs, text)| (attrs, Body::Text(text)))
                .boxed()
        } else {
            (
                attributes(),
                prop_oneof![
                    proptest::option::of("[a-zA-Z0-9#@/]{1,10}").prop_map(Body::Text),
                    child_nodes(depth - 1).prop_map(Body::Nested),
                ],
            )
                .boxed()
        }
    }

    fn build_node(name: &str, (attributes, body): (IndexMap<String, String>, Body)) -> Node {
        let mut element = Element {
            name: name.to_string(),
            attributes,
            children: Vec::new(),
        };
        match body {
            Body::Text(Some(text)) => element.children.push(Node::Text(text)),
            Body::Text(None) => {}
            Body::Nested(children) => element.children = children,
        }
        Node::Element(element)
    }

    fn child_nodes(depth: u32) -> BoxedStrategy<Vec<Node>> {
        subsequence(CHILD_NAMES.to_vec(), 0..=3)
            .prop_flat_map(move |names| {
                let len = names.len();
                pvec(node_body(depth), len).prop_map(move |bodies| {
                    names
                        .iter()
                        .zip(bodies)
                        .map(|(name, body)| build_node(name, body))
                        .collect()
                })
            })
            .boxed()
    }

    fn document_root() -> impl Strategy<Value = Node> {
        (
            attributes(),
            child_nodes(2),
            proptest::option::of("[a-z ]{1,8}"),
        )
            .prop_map(|(attributes, mut children, comment)| {
                if let Some(comment) = comment {
                    children.insert(0, Node::Comment(comment));
                }
                Node::Element(Element {
                    name: "resources".to_string(),
                    attributes,
                    children,
                })
            })
    }

    fn patch_attributes() -> impl Strategy<Value = Vec<(String, AttrValue)>> {
        subsequence(ATTR_KEYS.to_vec(), 0..=2).prop_flat_map(|keys| {
            let len = keys.len();
            pvec(("[a-z0-9#@/]{1,8}", any::<bool>()), len).prop_map(move |values| {
                keys.iter()
                    .zip(values)
                    .map(|(key, (value, is_override))| {
                        let value = if is_override {
                            AttrValue::Override(value)
                        } else {
                            AttrValue::Literal(value)
                        };
                        (key.to_string(), value)
                    })
                    .collect()
            })
        })
    }

    type ItemParts = (Vec<(String, AttrValue)>, Option<String>, Option<usize>, bool);

    fn item_parts() -> impl Strategy<Value = ItemParts> {
        (
            patch_attributes(),
            proptest::option::of("[a-zA-Z0-9#@/]{1,10}"),
            proptest::option::of(0usize..5),
            prop::bool::weighted(0.2),
        )
    }

    fn build_item(name: &str, (attrs, text, idx, delete): ItemParts) -> AnnotatedPatch {
        let mut spec = PatchElement::new(name);
        spec.attributes = attrs.into_iter().collect();
        let spec = match text {
            Some(text) => spec.text(text),
            None => spec,
        };
        AnnotatedPatch {
            node: spec.into(),
            idx,
            delete,
        }
    }

    fn patch_items(pool: &'static [&'static str]) -> impl Strategy<Value = Vec<AnnotatedPatch>> {
        subsequence(pool.to_vec(), 0..=3).prop_flat_map(|names| {
            let len = names.len();
            pvec(item_parts(), len).prop_map(move |parts| {
                names
                    .iter()
                    .zip(parts)
                    .map(|(name, parts)| build_item(name, parts))
                    .collect()
            })
        })
    }

    fn root_patch(items: Vec<AnnotatedPatch>) -> PatchNode {
        PatchNode::Element(PatchElement::new("resources").merge_children(items))
    }

    proptest! {
        /// Property: merge(merge(d, s), s) == merge(d, s) for any document
        /// and any well-formed spec.
        #[test]
        fn merge_is_idempotent(root in document_root(), items in patch_items(CHILD_NAMES)) {
            let patch = root_patch(items);
            let once = merge(&root, &patch);
            let twice = merge(&once, &patch);
            prop_assert_eq!(once, twice);
        }

        /// Property: a children-only merge with no items is the identity.
        #[test]
        fn empty_children_merge_is_identity(root in document_root()) {
            let patch = PatchNode::ChildrenOnly(PatchChildren::Merge(Vec::new()));
            prop_assert_eq!(merge(&root, &patch), root);
        }

        /// Property: children not addressed by the spec are preserved
        /// verbatim, in order, and new items are appended after them.
        #[test]
        fn unaddressed_children_are_preserved(
            root in document_root(),
            items in patch_items(FRESH_NAMES),
        ) {
            let items: Vec<AnnotatedPatch> = items
                .into_iter()
                .map(|mut item| {
                    item.idx = None;
                    item.delete = false;
                    item
                })
                .collect();
            let added = items.len();
            let patch = PatchNode::ChildrenOnly(PatchChildren::Merge(items));

            let merged = merge(&root, &patch);
            let before = root.as_element().unwrap();
            let after = merged.as_element().unwrap();
            prop_assert_eq!(&after.attributes, &before.attributes);
            prop_assert_eq!(after.children.len(), before.children.len() + added);
            prop_assert_eq!(&after.children[..before.children.len()], &before.children[..]);
        }

        /// Property: serialization is a pure function of the tree — the
        /// serialized form is a fixed point under reparse-and-serialize.
        #[test]
        fn serialization_is_stable_under_reparse(root in document_root()) {
            let first = xml::serialize(&Document::new(root));
            let reparsed = xml::parse(&first).unwrap();
            prop_assert_eq!(xml::serialize(&reparsed), first);
        }

        /// Property: semantic equality is reflexive, and inserting a
        /// comment is invisible when comments are disregarded.
        #[test]
        fn comments_are_semantically_invisible(
            root in document_root(),
            comment in "[a-z ]{1,8}",
        ) {
            prop_assert!(semantically_equal(&root, &root, false));
            prop_assert!(semantically_equal(&root, &root, true));

            let mut with_comment = root.as_element().unwrap().clone();
            with_comment.children.push(Node::Comment(comment));
            let with_comment = Node::Element(with_comment);
            prop_assert!(semantically_equal(&root, &with_comment, true));
            prop_assert!(!semantically_equal(&root, &with_comment, false));
        }
    }
}
