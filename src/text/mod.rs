//! Idempotent text transformation for unstructured source files
//!
//! Markup files get the tree merge; source files (an activity class, an
//! app delegate) get this module instead: small regex-guided primitives
//! (`patch`) composed into an ordered pipeline of named steps (`pipeline`)
//! threading a text value and an accumulating outcome map.
//!
//! The canonical idiom is three tiers: try to `replace` a marker that
//! exists if the tool already ran; if not found, `insert` at a narrower
//! anchor; if that anchor is also absent, insert a larger scaffold that is
//! guaranteed to exist and itself contains the narrower anchor. The first
//! run takes the insert branch; every later run takes the replace branch
//! and rewrites in place instead of duplicating content.

pub mod patch;
pub mod pipeline;

pub use patch::{try_insert, try_replace};
pub use pipeline::{Outcomes, Pipeline, PipelineResult, StepOutcome};
