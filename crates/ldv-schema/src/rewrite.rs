//! # Reference Rewriting
//!
//! A type definition lifted out of its attributes document loses the
//! document that its local `$ref`s (`#/components/schemas/...`) point into.
//! Rewriting anchors every such reference at the document's canonical URL,
//! so the fragment validates standalone while its references still resolve
//! through the registry.
//!
//! The walk covers every nested object and array, which includes
//! composition keywords (`allOf`, `anyOf`, `oneOf`), `properties`, `items`,
//! and anything else a definition nests. References that are already
//! absolute, or relative to some other document, are left as written.

use serde_json::{Map, Value};

/// The reference keyword.
pub const REF_KEY: &str = "$ref";

/// Return a copy of `fragment` with every document-local `$ref` prefixed
/// by `base_url`.
pub fn rewrite_refs(fragment: &Value, base_url: &str) -> Value {
    match fragment {
        Value::Object(map) => {
            let rewritten: Map<String, Value> = map
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(target) if key == REF_KEY && target.starts_with('#') => {
                            Value::String(format!("{base_url}{target}"))
                        }
                        other => rewrite_refs(other, base_url),
                    };
                    (key.clone(), value)
                })
                .collect();
            Value::Object(rewritten)
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| rewrite_refs(item, base_url))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}
