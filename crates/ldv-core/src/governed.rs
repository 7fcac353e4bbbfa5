//! # Governed-Object Classification
//!
//! A JSON-LD object declares its governing schema through two annotations:
//! `@context` (where the schema lives) and `@type` (which definition inside
//! that schema applies). Types in the `beckn:` namespace belong to the core
//! schema family; every other type belongs to the domain family named by the
//! context URL.

use serde_json::Value;

/// Annotation key carrying the context URL.
pub const CONTEXT_KEY: &str = "@context";

/// Annotation key carrying the type name.
pub const TYPE_KEY: &str = "@type";

/// Namespace prefix of core types.
pub const CORE_TYPE_PREFIX: &str = "beckn:";

/// An object carrying both a context and a type annotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GovernedObject<'a> {
    /// The `@context` URL.
    pub context_url: &'a str,
    /// The `@type` annotation as written, e.g. `beckn:Order`.
    pub type_annotation: &'a str,
    /// The type name with any namespace prefix removed, e.g. `Order`.
    pub type_name: &'a str,
    /// The whole object, annotations included.
    pub object: &'a Value,
}

/// Classification of a JSON value for validation dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Governed<'a> {
    /// A core-namespaced object (`@type` starts with `beckn:`).
    Core(GovernedObject<'a>),
    /// A domain object governed by the schema family its context names.
    Domain(GovernedObject<'a>),
    /// Anything else: scalars, arrays, and objects lacking string annotations.
    Unrecognized,
}

/// Strip a namespace prefix: the text after the last `:`.
pub fn bare_type_name(type_annotation: &str) -> &str {
    type_annotation
        .rsplit_once(':')
        .map_or(type_annotation, |(_, name)| name)
}

/// Classify a JSON value.
pub fn classify(value: &Value) -> Governed<'_> {
    let Some(map) = value.as_object() else {
        return Governed::Unrecognized;
    };
    let (Some(context_url), Some(type_annotation)) = (
        map.get(CONTEXT_KEY).and_then(Value::as_str),
        map.get(TYPE_KEY).and_then(Value::as_str),
    ) else {
        return Governed::Unrecognized;
    };

    let governed = GovernedObject {
        context_url,
        type_annotation,
        type_name: bare_type_name(type_annotation),
        object: value,
    };

    if type_annotation.starts_with(CORE_TYPE_PREFIX) {
        Governed::Core(governed)
    } else {
        Governed::Domain(governed)
    }
}
