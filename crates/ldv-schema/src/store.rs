//! # Schema Store
//!
//! The caller-owned resolution context for one run. It holds two caches
//! that must stay consistent:
//!
//! - the [`SchemaRegistry`], keyed by canonical attributes URL, used for
//!   cross-document `$ref` resolution;
//! - the context map, keyed by the exact `@context` URL, holding the
//!   resolved family name, document, and canonical URL.
//!
//! Many context URLs can lead to one canonical document, so a document is
//! fetched at most once per canonical URL no matter which context URL (or
//! which lookup, core or domain) asked for it first. Both caches only grow.
//! A failed fetch or an unresolvable context URL leaves both untouched.

use std::collections::HashMap;
use std::fmt;

use ldv_core::context::{canonical_url, extract_branch};
use ldv_core::ContextKey;
use tracing::{debug, info, warn};

use crate::document::SchemaDocument;
use crate::loader::SchemaLoader;
use crate::registry::SchemaRegistry;

/// A resolved domain schema: the cached result for one context URL.
#[derive(Debug, Clone)]
pub struct DomainSchema {
    /// Schema family name, e.g. `EvChargingOffer`.
    pub family: String,
    /// The attributes document.
    pub document: SchemaDocument,
    /// URL the document was fetched from.
    pub canonical_url: String,
}

/// Lazily populated schema caches backed by a [`SchemaLoader`].
pub struct SchemaStore<L> {
    loader: L,
    registry: SchemaRegistry,
    contexts: HashMap<String, DomainSchema>,
}

impl<L> fmt::Debug for SchemaStore<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaStore")
            .field("registered_documents", &self.registry.len())
            .field("resolved_contexts", &self.contexts.len())
            .finish_non_exhaustive()
    }
}

impl<L: SchemaLoader> SchemaStore<L> {
    /// An empty store that fetches through `loader`.
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            registry: SchemaRegistry::new(),
            contexts: HashMap::new(),
        }
    }

    /// The reference-resolution registry.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// The underlying loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Number of context URLs resolved so far.
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Get the core attributes document for a core `@context` URL, fetching
    /// it on first use.
    ///
    /// Returns `None` (after logging a warning) if the fetch fails.
    pub fn get_or_load_core(&mut self, context_url: &str) -> Option<SchemaDocument> {
        let canonical_url = canonical_url(context_url);
        if let Some(document) = self.registry.get(&canonical_url) {
            debug!(url = %canonical_url, "core attributes schema already registered");
            return Some(document.clone());
        }

        let branch = extract_branch(context_url).unwrap_or("unknown");
        match self.loader.fetch(&canonical_url) {
            Ok(contents) => {
                let document = self
                    .registry
                    .insert(canonical_url, SchemaDocument::new(contents));
                info!(branch, "loaded core attributes schema");
                Some(document)
            }
            Err(e) => {
                warn!(
                    url = %canonical_url,
                    error = %e,
                    "failed to load core attributes schema"
                );
                None
            }
        }
    }

    /// Resolve a domain `@context` URL to its schema family and document,
    /// fetching the document on first use.
    ///
    /// A context URL seen before is answered from the context map verbatim.
    /// Returns `None` if the URL cannot be resolved (silently) or the fetch
    /// fails (with a warning).
    pub fn get_or_load_domain(&mut self, context_url: &str) -> Option<DomainSchema> {
        if let Some(resolved) = self.contexts.get(context_url) {
            debug!(context_url, family = %resolved.family, "context already resolved");
            return Some(resolved.clone());
        }

        let key = match ContextKey::resolve(context_url) {
            Ok(key) => key,
            Err(e) => {
                debug!(error = %e, "context URL not resolvable; object skipped");
                return None;
            }
        };

        let document = match self.registry.get(&key.canonical_url) {
            Some(document) => document.clone(),
            None => match self.loader.fetch(&key.canonical_url) {
                Ok(contents) => {
                    let document = self
                        .registry
                        .insert(key.canonical_url.clone(), SchemaDocument::new(contents));
                    info!(
                        family = %key.family,
                        version = %key.version,
                        branch = %key.branch,
                        "loaded attributes schema"
                    );
                    document
                }
                Err(e) => {
                    warn!(
                        family = %key.family,
                        version = %key.version,
                        url = %key.canonical_url,
                        error = %e,
                        "failed to load attributes schema"
                    );
                    return None;
                }
            },
        };

        let resolved = DomainSchema {
            family: key.family,
            document,
            canonical_url: key.canonical_url,
        };
        self.contexts
            .insert(context_url.to_string(), resolved.clone());
        Some(resolved)
    }
}
