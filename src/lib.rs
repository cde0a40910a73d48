//! # idempatch
//!
//! Core engines for configuring native project artifacts by applying
//! declarative, idempotent patches instead of regenerating files, so that
//! user-authored content outside the tool's concern survives repeated
//! runs.
//!
//! Two engines cover every file shape a configurator meets:
//!
//! - A **tree merge** for hierarchical markup: given a parsed document and
//!   a partial "desired shape", produce a new document containing that
//!   shape while leaving everything else untouched — a fixed point under
//!   repeated application. See [`merge`] and [`spec`].
//! - A **sequential text pipeline** for unstructured source files: ordered
//!   named steps built from "try replace, else insert, else scaffold"
//!   primitives, threading an outcome map between steps. See [`text`].
//!
//! Platform-specific configurators are consumers of this crate: they parse
//! a file into a [`dom::Document`] (or start from
//! [`dom::Document::skeleton`] when the file is missing), author a
//! [`spec::PatchNode`] describing the shape they need, merge, and write
//! the serialized result back.
//!
//! ## Quick Example
//!
//! ```
//! use idempatch::spec::{PatchElement, PatchNode};
//! use idempatch::{merge, xml};
//!
//! let existing = xml::parse(
//!     "<resources>\n  <color name=\"splashscreen_background\">#FF0000</color>\n</resources>",
//! )
//! .unwrap();
//!
//! let patch: PatchNode = PatchElement::new("resources")
//!     .merge_children(vec![PatchElement::new("color")
//!         .attr("name", "splashscreen_background")
//!         .text("#008000")
//!         .into()])
//!     .into();
//!
//! let merged = merge::merge(&existing.root, &patch);
//! assert!(xml::serialize(&idempatch::dom::Document {
//!     root: merged.clone(),
//!     ..existing
//! })
//! .contains("#008000"));
//!
//! // Applying the same patch again is a fixed point.
//! assert_eq!(merge::merge(&merged, &patch), merged);
//! ```
//!
//! ## Core Concepts
//!
//! - **Document model (`dom`)**: the tree of element/text/comment nodes
//!   representing one markup file.
//! - **Patch specs (`spec`)**: the caller's declarative description of the
//!   desired tree shape, with per-item ordering and deletion markers.
//! - **Merge (`merge`)**: the recursive merge algorithm, its asymmetric
//!   match predicate, and comment-insensitive semantic equality.
//! - **Text (`text`)**: regex-guided patch primitives and the ordered
//!   transformation pipeline for source files.
//! - **Syntax (`xml`)**: the parser and deterministic serializer between
//!   markup text and the document model.
//!
//! Everything is synchronous, allocation-fresh, and free of I/O: callers
//! own all file reading and writing, which also makes independent
//! merge/patch calls safe to run concurrently as separate tasks.

pub mod dom;
pub mod error;
pub mod merge;
pub mod spec;
pub mod text;
pub mod xml;

#[cfg(test)]
mod merge_proptest;
