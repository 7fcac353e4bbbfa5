//! Parsed attributes documents.
//!
//! An attributes document is an OpenAPI-style YAML file whose
//! `components.schemas` mapping holds one JSON Schema definition per type
//! name. Documents are immutable once parsed and shared by reference count
//! between the reference registry and the context cache.

use std::sync::Arc;

use serde_json::{Map, Value};

/// A parsed schema document, cheap to clone.
#[derive(Debug, Clone)]
pub struct SchemaDocument(Arc<Value>);

impl SchemaDocument {
    /// Wrap parsed document contents.
    pub fn new(contents: Value) -> Self {
        Self(Arc::new(contents))
    }

    /// The full document.
    pub fn contents(&self) -> &Value {
        &self.0
    }

    /// The `components.schemas` mapping, if the document has one.
    pub fn schemas(&self) -> Option<&Map<String, Value>> {
        self.0.get("components")?.get("schemas")?.as_object()
    }

    /// The definition registered under exactly `type_name`.
    pub fn schema(&self, type_name: &str) -> Option<&Value> {
        self.schemas()?.get(type_name)
    }

    /// Find a type definition: exact name first, then the first
    /// case-insensitive match in document order.
    ///
    /// Returns the key actually matched together with its definition.
    pub fn lookup_type(&self, type_name: &str) -> Option<(&str, &Value)> {
        let schemas = self.schemas()?;
        if let Some((key, schema)) = schemas.get_key_value(type_name) {
            return Some((key.as_str(), schema));
        }
        let wanted = type_name.to_lowercase();
        schemas
            .iter()
            .find(|(key, _)| key.to_lowercase() == wanted)
            .map(|(key, schema)| (key.as_str(), schema))
    }

    /// True if both handles refer to the same parsed document.
    pub fn same_document(&self, other: &SchemaDocument) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn shared(&self) -> Arc<Value> {
        Arc::clone(&self.0)
    }
}
