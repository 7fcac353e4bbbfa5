#![deny(missing_docs)]

//! # ldv-core: Foundational Types for Context-Discovered Validation
//!
//! This crate defines the I/O-free building blocks shared by the rest of the
//! workspace. It performs no network or filesystem access, and its only
//! external dependencies are `serde`, `serde_json`, and `thiserror`.
//!
//! ## Design Principles
//!
//! 1. **The context annotation is the schema address.** A `@context` URL is
//!    parsed into a [`ContextKey`] (branch, family, version, core flag). The
//!    attributes document URL is derived from it by a single suffix
//!    substitution, [`canonical_url`]. There is no other derivation path.
//!
//! 2. **One classification step.** Every JSON object is classified once into
//!    [`Governed::Core`], [`Governed::Domain`], or [`Governed::Unrecognized`].
//!    Callers branch exhaustively on that variant.
//!
//! 3. **Traversal is decoupled from dispatch.** [`tree::visit`] walks any JSON
//!    value depth-first in pre-order and hands each node plus its
//!    [`JsonPath`] to a callback.

pub mod context;
pub mod error;
pub mod governed;
pub mod report;
pub mod tree;

// Re-export primary types at crate root for ergonomic imports.
pub use context::{canonical_url, is_core_context, ContextKey};
pub use error::ResolveError;
pub use governed::{classify, Governed, GovernedObject};
pub use report::{ObjectKind, ValidationError};
pub use tree::{JsonPath, Node};
