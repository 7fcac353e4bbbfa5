//! # Object Validation
//!
//! Validates one governed object against its resolved type definition
//! (JSON Schema Draft 2020-12).
//!
//! ## Strategy ladder
//!
//! Each attempt yields an [`Outcome`]. Strategies are tried in order until
//! one returns [`Outcome::Validated`] or [`Outcome::SchemaViolation`]; only
//! [`Outcome::ResolutionUnavailable`] advances to the next one.
//!
//! - Domain objects: the definition taken from the registered document with
//!   its local `$ref`s rewritten to absolute form, then the definition as
//!   supplied by the caller.
//! - Core objects: a `$ref` into the registered document, so every internal
//!   reference resolves against the live registry, then the definition as
//!   supplied.
//!
//! If every strategy is unavailable the object is left unvalidated: a
//! warning is logged and nothing is recorded. Only a genuine violation
//! produces a [`ValidationError`], and at most one per object.
//!
//! ## JSON-LD envelope
//!
//! Domain definitions that forbid additional properties would reject the
//! mandatory `@context`/`@type` annotations. Before validating a domain
//! object, both are declared as string properties on such definitions.

use jsonschema::Draft;
use ldv_core::governed::{CONTEXT_KEY, TYPE_KEY};
use ldv_core::{JsonPath, ObjectKind, ValidationError};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::registry::SchemaRegistry;
use crate::rewrite::rewrite_refs;

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Human-readable description.
    pub message: String,
    /// JSON pointer to the failing location inside the instance.
    pub instance_path: String,
}

/// Result of one validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The instance conforms.
    Validated,
    /// The instance violates the schema.
    SchemaViolation(Violation),
    /// The schema could not be assembled, e.g. a `$ref` did not resolve.
    ResolutionUnavailable(String),
}

/// Declare `@context` and `@type` as string properties on a definition that
/// sets `additionalProperties: false`. Other definitions are left as is.
pub fn allow_jsonld_envelope(schema: &mut Value) {
    let Some(definition) = schema.as_object_mut() else {
        return;
    };
    if definition.get("additionalProperties") != Some(&Value::Bool(false)) {
        return;
    }
    let properties = definition
        .entry("properties")
        .or_insert_with(|| json!({}));
    if let Some(properties) = properties.as_object_mut() {
        properties.insert(CONTEXT_KEY.to_string(), json!({"type": "string"}));
        properties.insert(TYPE_KEY.to_string(), json!({"type": "string"}));
    }
}

/// Compile `schema` with registry-backed `$ref` resolution and validate
/// `instance` against it.
pub fn check(schema: &Value, instance: &Value, registry: &SchemaRegistry) -> Outcome {
    let validator = match jsonschema::options()
        .with_draft(Draft::Draft202012)
        .with_retriever(registry.retriever())
        .build(schema)
    {
        Ok(validator) => validator,
        Err(e) => return Outcome::ResolutionUnavailable(e.to_string()),
    };

    let first = validator.iter_errors(instance).next().map(|err| Violation {
        message: err.to_string(),
        instance_path: err.instance_path.to_string(),
    });
    match first {
        Some(violation) => Outcome::SchemaViolation(violation),
        None => Outcome::Validated,
    }
}

/// One way of assembling the schema for an object.
#[derive(Debug, Clone, Copy)]
enum Strategy<'a> {
    /// A definition from a registered document, local refs made absolute.
    Rewritten {
        definition: &'a Value,
        canonical_url: &'a str,
    },
    /// A `$ref` to the definition inside a registered document.
    DocumentRef {
        canonical_url: &'a str,
        type_name: &'a str,
    },
    /// The definition as supplied; local refs stay unresolved.
    Fragment {
        definition: &'a Value,
        jsonld_allowance: bool,
    },
}

impl Strategy<'_> {
    fn name(&self) -> &'static str {
        match self {
            Strategy::Rewritten { .. } => "rewritten-definition",
            Strategy::DocumentRef { .. } => "document-ref",
            Strategy::Fragment { .. } => "direct-fragment",
        }
    }
}

/// Validates governed objects against definitions resolved through a
/// [`SchemaRegistry`], recording failures into a shared accumulator.
#[derive(Debug, Clone, Copy)]
pub struct ObjectValidator<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> ObjectValidator<'r> {
    /// A validator resolving references through `registry`.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validate a domain object.
    ///
    /// `type_name` is the key the definition was found under and is what
    /// gets reported. `canonical_url` names the document the definition came
    /// from; when that document is registered but has no entry for
    /// `type_name`, the object is skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn validate_domain_object(
        &self,
        object: &Value,
        definition: &Value,
        type_name: &str,
        family: &str,
        path: &JsonPath,
        canonical_url: Option<&str>,
        errors: &mut Vec<ValidationError>,
    ) {
        info!("Validating {type_name} (from {family}) at {}...", path.display_or_root());

        let mut strategies = Vec::with_capacity(2);
        if let Some(url) = canonical_url {
            if let Some(document) = self.registry.get(url) {
                match document.schema(type_name) {
                    Some(registered) => strategies.push(Strategy::Rewritten {
                        definition: registered,
                        canonical_url: url,
                    }),
                    None => {
                        info!(type_name, url, "type not defined in registered document; skipped");
                        return;
                    }
                }
            }
        }
        strategies.push(Strategy::Fragment {
            definition,
            jsonld_allowance: true,
        });

        let outcome = self.run(&strategies, object);
        self.record(outcome, ObjectKind::Domain, type_name, path, errors);
    }

    /// Validate a core object whose definition lives in the document
    /// registered under `canonical_url`.
    pub fn validate_core_object(
        &self,
        object: &Value,
        definition: &Value,
        type_name: &str,
        path: &JsonPath,
        canonical_url: &str,
        errors: &mut Vec<ValidationError>,
    ) {
        info!("Validating {type_name} at {}...", path.display_or_root());

        let strategies = [
            Strategy::DocumentRef {
                canonical_url,
                type_name,
            },
            Strategy::Fragment {
                definition,
                jsonld_allowance: false,
            },
        ];

        let outcome = self.run(&strategies, object);
        self.record(outcome, ObjectKind::Core, type_name, path, errors);
    }

    fn run(&self, strategies: &[Strategy<'_>], instance: &Value) -> Outcome {
        let mut outcome =
            Outcome::ResolutionUnavailable("no validation strategy applicable".to_string());
        for (idx, strategy) in strategies.iter().enumerate() {
            outcome = self.attempt(strategy, instance);
            match &outcome {
                Outcome::ResolutionUnavailable(reason) if idx + 1 < strategies.len() => {
                    warn!(
                        strategy = strategy.name(),
                        reason = %reason,
                        "reference resolution failed, falling back to {}",
                        strategies[idx + 1].name()
                    );
                }
                Outcome::ResolutionUnavailable(_) => {}
                _ => break,
            }
        }
        outcome
    }

    fn attempt(&self, strategy: &Strategy<'_>, instance: &Value) -> Outcome {
        match *strategy {
            Strategy::Rewritten {
                definition,
                canonical_url,
            } => {
                let mut schema = rewrite_refs(definition, canonical_url);
                allow_jsonld_envelope(&mut schema);
                check(&schema, instance, self.registry)
            }
            Strategy::DocumentRef {
                canonical_url,
                type_name,
            } => {
                let schema = json!({
                    "$ref": format!("{canonical_url}#/components/schemas/{type_name}")
                });
                check(&schema, instance, self.registry)
            }
            Strategy::Fragment {
                definition,
                jsonld_allowance,
            } => {
                let mut schema = definition.clone();
                if jsonld_allowance {
                    allow_jsonld_envelope(&mut schema);
                }
                check(&schema, instance, self.registry)
            }
        }
    }

    fn record(
        &self,
        outcome: Outcome,
        kind: ObjectKind,
        type_name: &str,
        path: &JsonPath,
        errors: &mut Vec<ValidationError>,
    ) {
        let location = path.display_or_root();
        match outcome {
            Outcome::Validated => info!("{type_name} at {location} is VALID."),
            Outcome::SchemaViolation(violation) => {
                info!(
                    instance_path = %violation.instance_path,
                    "{type_name} at {location} is INVALID: {}",
                    violation.message
                );
                errors.push(ValidationError {
                    kind,
                    path: path.as_str().to_string(),
                    type_name: type_name.to_string(),
                    message: violation.message,
                    instance_path: violation.instance_path,
                });
            }
            Outcome::ResolutionUnavailable(reason) => {
                warn!("{type_name} at {location} could not be validated: {reason}");
            }
        }
    }
}
