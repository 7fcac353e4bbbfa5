//! # Validation Error Records
//!
//! One [`ValidationError`] is recorded per governed object whose data
//! violates its resolved schema. Records are appended in traversal order and
//! never mutated afterwards.

use std::fmt;

use serde::Serialize;

/// Which schema family governed the failing object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// A `beckn:`-namespaced object validated against the core schema.
    Core,
    /// An object validated against a domain schema family.
    Domain,
}

/// A single reported validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Core or domain object.
    pub kind: ObjectKind,
    /// Structural path of the object inside the payload (empty for the root).
    pub path: String,
    /// Type name the object was validated as.
    pub type_name: String,
    /// The underlying schema violation message.
    pub message: String,
    /// JSON pointer to the failing location inside the object.
    pub instance_path: String,
}

impl fmt::Display for ValidationError {
    /// `{path} ({type}): {message}` for domain objects, `{path}: {message}`
    /// for core objects.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ObjectKind::Domain => write!(f, "{} ({}): {}", self.path, self.type_name, self.message),
            ObjectKind::Core => write!(f, "{}: {}", self.path, self.message),
        }
    }
}
