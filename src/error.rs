//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for the
//! `idempatch` library. It uses the `thiserror` library to create a small
//! `Error` enum covering the failure modes the core can actually hit,
//! providing clear and descriptive error messages.
//!
//! The merge engine itself is a total function and never fails for
//! well-formed patch specs; the only fallible surfaces are:
//!
//! - Parsing markup text into a [`crate::dom::Document`].
//! - Compiling a step pattern (a malformed regular expression is a
//!   configuration error in the calling configurator and is surfaced
//!   immediately, never retried).
//!
//! A pattern that compiles but does not match is *not* an error: text
//! patch primitives report that as a normal `false` outcome consumed by
//! pipeline gating logic.

use thiserror::Error;

/// Main error type for idempatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// The markup text could not be parsed into a document tree.
    ///
    /// Includes the 1-based line and column of the offending input.
    #[error("Markup parsing error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// A step pattern failed to compile, wrapped from `regex::Error`.
    #[error("Invalid step pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
