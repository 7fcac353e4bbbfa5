#![deny(missing_docs)]

//! # ldv-cli: Command-Line Validator
//!
//! Provides the `ldv` command-line interface. Every file argument is either
//! a JSON payload or a request collection; governed objects inside are
//! validated against the schemas their `@context` annotations name.
//!
//! ```bash
//! ldv payloads/on_search.json
//! ldv --core-only collections/ev-charging.postman_collection.json
//! ldv -vv --timeout-secs 20 payloads/*.json
//! ```
//!
//! ## Exit codes
//!
//! - `0`: every file validated cleanly.
//! - `1`: at least one validation error, or a file could not be processed.
//! - `2`: operational error before any file was processed.

pub mod collection;
pub mod validate;
