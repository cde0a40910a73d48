//! Merge operations for document trees
//!
//! This module provides the declarative tree merge used by every
//! platform-specific configurator: given an existing parsed document and a
//! partial "desired shape" ([`crate::spec::PatchNode`]), produce a new
//! document that contains the desired shape while leaving everything else
//! untouched, and that is a fixed point under repeated application.
//!
//! ## Submodules
//!
//! - `engine` — the recursive merge algorithm and its match predicate
//! - `semantic` — deep equality between trees, optionally ignoring comments
//!
//! ## Contracts
//!
//! - **Idempotence**: `merge(merge(d, s), s)` is structurally identical to
//!   `merge(d, s)` for any document `d` and well-formed spec `s`.
//! - **Non-destructiveness**: any attribute or child of `d` not addressed
//!   by `s` appears unchanged in the result.

pub mod engine;
pub mod semantic;

pub use engine::{convert, merge, merge_children, node_matches};
pub use semantic::{documents_equal, semantically_equal};
