//! # Error Hierarchy
//!
//! Structured error types for context annotation parsing, built with
//! `thiserror`. Resolution failures are recoverable by design of the
//! pipeline: the governed object that carried the annotation is skipped.

use thiserror::Error;

/// Why a `@context` URL could not be resolved into a [`crate::ContextKey`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The URL does not contain a `/refs/heads/{branch}/schema/` segment.
    #[error("no branch segment in context URL \"{context_url}\" (expected .../refs/heads/<branch>/schema/...)")]
    MissingBranch {
        /// The offending context URL.
        context_url: String,
    },

    /// The derived attributes URL does not name a schema family and version.
    #[error("no schema family in attributes URL \"{canonical_url}\" (expected .../schema/<family>/<version>/attributes.yaml)")]
    MissingFamily {
        /// The attributes URL derived from the context URL.
        canonical_url: String,
    },
}
