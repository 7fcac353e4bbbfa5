#![deny(missing_docs)]

//! # ldv-schema: On-Demand Schema Resolution & Validation
//!
//! This crate turns the addresses carried by JSON-LD annotations into
//! validated objects: it loads attributes documents lazily, caches them for
//! the lifetime of a [`SchemaStore`], and validates every governed object a
//! payload contains.
//!
//! ## Responsibilities
//!
//! - **Loading:** [`HttpSchemaLoader`] fetches attributes documents over
//!   HTTP(S); [`MemoryLoader`] serves them from memory.
//! - **Caching:** [`SchemaStore`] keeps the reference registry and the
//!   context map consistent, fetching each canonical URL at most once.
//! - **Reference rewriting:** [`rewrite_refs`] anchors local `$ref`s at the
//!   owning document so extracted definitions validate standalone.
//! - **Validation:** [`ObjectValidator`] runs the strategy ladder;
//!   [`PayloadWalker`] drives it over a whole payload.
//!
//! ## Design
//!
//! Nothing here is global. Callers create one store per run and pass it to
//! every payload, so documents loaded for one payload serve the next.
//! Failures to resolve or load a schema are logged and never abort a walk.

pub mod config;
pub mod document;
pub mod loader;
pub mod registry;
pub mod rewrite;
pub mod store;
pub mod validate;
pub mod walker;

// Re-export primary types.
pub use config::{ConfigError, LoaderConfig, WalkOptions};
pub use document::SchemaDocument;
pub use loader::{HttpSchemaLoader, LoadError, MemoryLoader, SchemaLoader};
pub use registry::SchemaRegistry;
pub use rewrite::rewrite_refs;
pub use store::{DomainSchema, SchemaStore};
pub use validate::{ObjectValidator, Outcome, Violation};
pub use walker::{validate_payload, PayloadWalker};
