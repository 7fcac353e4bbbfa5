//! # Payload Walker
//!
//! Traverses an arbitrary JSON payload, discovers every governed object by
//! its `@context`/`@type` annotations, resolves its schema on demand through
//! a [`SchemaStore`], and validates it in place.
//!
//! Every node is visited, including the descendants of governed objects, so
//! nested governed objects are validated independently. Errors accumulate in
//! traversal order (depth-first, pre-order) and are returned together; a
//! single invalid or unresolvable object never stops the walk.

use ldv_core::{canonical_url, classify, is_core_context, Governed, GovernedObject, JsonPath};
use ldv_core::{tree, ValidationError};
use serde_json::Value;
use tracing::debug;

use crate::config::WalkOptions;
use crate::loader::SchemaLoader;
use crate::store::SchemaStore;
use crate::validate::ObjectValidator;

/// Walks payloads against a shared [`SchemaStore`].
#[derive(Debug)]
pub struct PayloadWalker<'s, L> {
    store: &'s mut SchemaStore<L>,
    options: WalkOptions,
}

impl<'s, L: SchemaLoader> PayloadWalker<'s, L> {
    /// A walker resolving schemas through `store`.
    pub fn new(store: &'s mut SchemaStore<L>, options: WalkOptions) -> Self {
        Self { store, options }
    }

    /// Validate every governed object in `payload`.
    pub fn walk(&mut self, payload: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        tree::visit(payload, &mut |path: &JsonPath, node: &Value| {
            match classify(node) {
                Governed::Core(object) => self.check_core(&object, path, &mut errors),
                Governed::Domain(object) => self.check_domain(&object, path, &mut errors),
                Governed::Unrecognized => {}
            }
        });
        errors
    }

    fn check_core(
        &mut self,
        object: &GovernedObject<'_>,
        path: &JsonPath,
        errors: &mut Vec<ValidationError>,
    ) {
        if !is_core_context(object.context_url) {
            debug!(
                path = %path.display_or_root(),
                context_url = object.context_url,
                "core type under non-core context; skipped"
            );
            return;
        }
        let Some(document) = self.store.get_or_load_core(object.context_url) else {
            return;
        };
        let Some(definition) = document.schema(object.type_name) else {
            debug!(type_name = object.type_name, "type not in core schema; skipped");
            return;
        };

        let url = canonical_url(object.context_url);
        ObjectValidator::new(self.store.registry()).validate_core_object(
            object.object,
            definition,
            object.type_name,
            path,
            &url,
            errors,
        );
    }

    fn check_domain(
        &mut self,
        object: &GovernedObject<'_>,
        path: &JsonPath,
        errors: &mut Vec<ValidationError>,
    ) {
        if self.options.core_only {
            return;
        }
        let Some(domain) = self.store.get_or_load_domain(object.context_url) else {
            return;
        };
        let Some((type_name, definition)) = domain.document.lookup_type(object.type_name) else {
            debug!(
                type_name = object.type_name,
                family = %domain.family,
                "type not in attributes schema; skipped"
            );
            return;
        };

        ObjectValidator::new(self.store.registry()).validate_domain_object(
            object.object,
            definition,
            type_name,
            &domain.family,
            path,
            Some(&domain.canonical_url),
            errors,
        );
    }
}

/// Validate `payload` through `store` and return every error found.
///
/// The store is left populated, so later payloads reuse whatever this one
/// loaded.
pub fn validate_payload<L: SchemaLoader>(
    store: &mut SchemaStore<L>,
    payload: &Value,
    options: WalkOptions,
) -> Vec<ValidationError> {
    PayloadWalker::new(store, options).walk(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;
    use ldv_core::ObjectKind;
    use serde_json::json;

    const CORE_CTX: &str = "https://x/refs/heads/main/schema/core/v2/context.jsonld";
    const CORE_URL: &str = "https://x/refs/heads/main/schema/core/v2/attributes.yaml";
    const EV_CTX: &str = "https://x/refs/heads/main/schema/EvChargingOffer/v1/context.jsonld";
    const EV_URL: &str = "https://x/refs/heads/main/schema/EvChargingOffer/v1/attributes.yaml";

    const CORE_DOC: &str = r#"
components:
  schemas:
    Order:
      type: object
      required: ["beckn:id"]
    Item:
      type: object
"#;

    const EV_DOC: &str = r#"
components:
  schemas:
    ChargingOffer:
      type: object
      additionalProperties: false
      required: [tariffModel]
      properties:
        tariffModel: {type: string}
"#;

    fn loader() -> MemoryLoader {
        MemoryLoader::new()
            .with_document(CORE_URL, CORE_DOC)
            .with_document(EV_URL, EV_DOC)
    }

    #[test]
    fn nested_objects_are_validated_independently() {
        let payload = json!({
            "message": {
                "order": {
                    "@context": CORE_CTX,
                    "@type": "beckn:Order",
                    "beckn:offer": {
                        "@context": EV_CTX,
                        "@type": "ChargingOffer"
                    }
                }
            }
        });
        let loader = loader();
        let mut store = SchemaStore::new(&loader);
        let errors = validate_payload(&mut store, &payload, WalkOptions::default());

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, ObjectKind::Core);
        assert_eq!(errors[0].path, "message/order");
        assert_eq!(errors[1].kind, ObjectKind::Domain);
        assert_eq!(errors[1].path, "message/order/beckn:offer");
        assert_eq!(errors[1].type_name, "ChargingOffer");
    }

    #[test]
    fn core_type_under_domain_context_is_skipped() {
        let payload = json!({"@context": EV_CTX, "@type": "beckn:Order"});
        let loader = loader();
        let mut store = SchemaStore::new(&loader);
        assert!(validate_payload(&mut store, &payload, WalkOptions::default()).is_empty());
        assert_eq!(loader.fetch_count(), 0);
    }

    #[test]
    fn unknown_types_are_skipped() {
        let payload = json!([
            {"@context": CORE_CTX, "@type": "beckn:Nothing"},
            {"@context": EV_CTX, "@type": "Nothing"}
        ]);
        let loader = loader();
        let mut store = SchemaStore::new(&loader);
        assert!(validate_payload(&mut store, &payload, WalkOptions::default()).is_empty());
    }

    #[test]
    fn core_only_never_touches_domain_schemas() {
        let payload = json!({"items": [{"@context": EV_CTX, "@type": "ChargingOffer"}]});
        let loader = loader();
        let mut store = SchemaStore::new(&loader);
        let options = WalkOptions { core_only: true };
        assert!(validate_payload(&mut store, &payload, options).is_empty());
        assert!(!loader.requested().iter().any(|url| url == EV_URL));
    }

    #[test]
    fn non_string_annotations_are_not_governed() {
        let payload = json!({"@context": {"x": 1}, "@type": "ChargingOffer"});
        let loader = loader();
        let mut store = SchemaStore::new(&loader);
        assert!(validate_payload(&mut store, &payload, WalkOptions::default()).is_empty());
        assert_eq!(loader.fetch_count(), 0);
    }
}
