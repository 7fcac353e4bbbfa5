//! Reference-resolution registry.
//!
//! Maps canonical attributes URLs to parsed documents so that `$ref`s
//! spanning independently fetched documents resolve during validation.
//! Entries are insert-once: a registered document is never replaced or
//! evicted for the lifetime of the registry.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::document::SchemaDocument;

/// Canonical URL → document registry.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    documents: HashMap<String, SchemaDocument>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The document registered under `canonical_url`.
    pub fn get(&self, canonical_url: &str) -> Option<&SchemaDocument> {
        self.documents.get(canonical_url)
    }

    /// Returns true if a document is registered under `canonical_url`.
    pub fn contains(&self, canonical_url: &str) -> bool {
        self.documents.contains_key(canonical_url)
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Register `document` unless the URL is already taken.
    ///
    /// Returns the document now registered under the URL, which is the
    /// existing one if there was one.
    pub fn insert(&mut self, canonical_url: String, document: SchemaDocument) -> SchemaDocument {
        self.documents
            .entry(canonical_url)
            .or_insert(document)
            .clone()
    }

    /// Resolve an absolute reference such as
    /// `https://.../attributes.yaml#/components/schemas/Order`.
    pub fn resolve(&self, reference: &str) -> Option<&Value> {
        let (url, pointer) = reference.split_once('#').unwrap_or((reference, ""));
        self.get(url)?.contents().pointer(pointer)
    }

    pub(crate) fn retriever(&self) -> RegistryRetriever {
        RegistryRetriever {
            documents: self
                .documents
                .iter()
                .map(|(url, doc)| (resolution_key(url), doc.shared()))
                .collect(),
        }
    }
}

/// Serves registered documents to the validator's `$ref` resolution.
///
/// Never touches the network: a URI that is not registered fails to
/// resolve, which the validator reports as unavailable resolution.
///
/// The validator normalizes every reference target (lowercase scheme and
/// host, decoded unreserved percent-escapes) before asking for it, while
/// the registry keeps canonical URLs exactly as derived. Documents are
/// therefore looked up by [`resolution_key`] on both sides.
pub(crate) struct RegistryRetriever {
    documents: HashMap<String, Arc<Value>>,
}

impl jsonschema::Retrieve for RegistryRetriever {
    fn retrieve(
        &self,
        uri: &jsonschema::Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let key = resolution_key(uri.as_str());
        self.documents
            .get(&key)
            .map(|doc| Value::clone(doc))
            .ok_or_else(|| format!("schema document not registered: {key}").into())
    }
}

/// A URL without its fragment, in the normalized form the validator uses
/// for reference targets. Unparseable URLs are kept verbatim.
fn resolution_key(url: &str) -> String {
    let base = url.split_once('#').map_or(url, |(base, _)| base);
    match jsonschema::Uri::parse(base) {
        Ok(uri) => uri.normalize().as_str().to_string(),
        Err(_) => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonschema::Retrieve;
    use serde_json::json;

    const URL: &str = "https://x/refs/heads/main/schema/core/v2/attributes.yaml";

    #[test]
    fn insert_never_replaces() {
        let mut registry = SchemaRegistry::new();
        let first = registry.insert(URL.to_string(), SchemaDocument::new(json!({"v": 1})));
        let second = registry.insert(URL.to_string(), SchemaDocument::new(json!({"v": 2})));
        assert!(first.same_document(&second));
        assert_eq!(registry.get(URL).unwrap().contents()["v"], 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn resolves_absolute_references() {
        let mut registry = SchemaRegistry::new();
        registry.insert(
            URL.to_string(),
            SchemaDocument::new(json!({"components": {"schemas": {"Order": {"type": "object"}}}})),
        );
        assert_eq!(
            registry.resolve(&format!("{URL}#/components/schemas/Order")),
            Some(&json!({"type": "object"}))
        );
        assert!(registry.resolve(URL).is_some());
        assert!(registry.resolve(&format!("{URL}#/components/schemas/Missing")).is_none());
        assert!(registry.resolve("https://elsewhere#/a").is_none());
    }

    #[test]
    fn retriever_matches_normalized_reference_targets() {
        let registered =
            "https://Schemas.Test/refs/heads/feature%7ex/schema/core/v2/attributes.yaml";
        let mut registry = SchemaRegistry::new();
        registry.insert(registered.to_string(), SchemaDocument::new(json!({"v": 1})));
        let retriever = registry.retriever();

        let requested =
            "https://schemas.test/refs/heads/feature~x/schema/core/v2/attributes.yaml";
        let uri = jsonschema::Uri::parse(requested).unwrap();
        assert_eq!(retriever.retrieve(&uri).unwrap(), json!({"v": 1}));

        let other = jsonschema::Uri::parse("https://schemas.test/other.yaml").unwrap();
        assert!(retriever.retrieve(&other).is_err());
    }

    #[test]
    fn resolution_key_ignores_fragment_and_case_of_host() {
        assert_eq!(
            resolution_key("HTTPS://X.Example/a.yaml#/components/schemas/A"),
            resolution_key("https://x.example/a.yaml")
        );
        assert_eq!(resolution_key("not a url"), "not a url");
    }

    #[test]
    fn empty_registry() {
        let registry = SchemaRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains(URL));
    }
}
