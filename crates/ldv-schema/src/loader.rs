//! # Schema Loading
//!
//! Fetches and parses attributes documents. A fetch is a single blocking
//! attempt: it either yields a parsed document or a [`LoadError`]. The
//! caller decides what a failure means; loading itself never touches any
//! cache, so a failed fetch cannot leave a partial entry behind.
//!
//! Documents are YAML. JSON is a subset of YAML and parses the same way.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use reqwest::blocking::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::LoaderConfig;

/// Upper bound on the response body kept in a [`LoadError::Status`].
const MAX_ERROR_BODY: usize = 256;

/// Errors fetching or parsing a schema document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The URL could not be parsed.
    #[error("invalid schema URL {url}: {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Transport-level failure (DNS, TLS, connection, timeout).
    #[error("fetch of {url} failed: {source}")]
    Http {
        /// The URL being fetched.
        url: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("fetch of {url} returned HTTP {status}: {body}")]
    Status {
        /// The URL being fetched.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Start of the response body.
        body: String,
    },

    /// The document body is not well-formed YAML/JSON.
    #[error("schema document {url} is malformed: {source}")]
    Parse {
        /// The URL the document came from.
        url: String,
        /// YAML parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("cannot build HTTP client: {reason}")]
    Client {
        /// Builder diagnostic.
        reason: String,
    },
}

/// Source of raw schema documents, keyed by canonical URL.
pub trait SchemaLoader {
    /// Fetch and parse the document at `url`.
    fn fetch(&self, url: &str) -> Result<Value, LoadError>;
}

impl<L: SchemaLoader + ?Sized> SchemaLoader for &L {
    fn fetch(&self, url: &str) -> Result<Value, LoadError> {
        (**self).fetch(url)
    }
}

/// Parse a fetched document body.
pub fn parse_document(url: &str, body: &str) -> Result<Value, LoadError> {
    serde_yaml::from_str(body).map_err(|source| LoadError::Parse {
        url: url.to_string(),
        source,
    })
}

/// Loads schema documents over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSchemaLoader {
    http: Client,
}

impl HttpSchemaLoader {
    /// Build a loader from configuration.
    pub fn new(config: &LoaderConfig) -> Result<Self, LoadError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| LoadError::Client {
                reason: e.to_string(),
            })?;
        Ok(Self { http })
    }
}

impl SchemaLoader for HttpSchemaLoader {
    fn fetch(&self, url: &str) -> Result<Value, LoadError> {
        let target = Url::parse(url).map_err(|e| LoadError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let resp = self.http.get(target).send().map_err(|source| LoadError::Http {
            url: url.to_string(),
            source,
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().unwrap_or_default();
            return Err(LoadError::Status {
                url: url.to_string(),
                status,
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body = resp.text().map_err(|source| LoadError::Http {
            url: url.to_string(),
            source,
        })?;
        parse_document(url, &body)
    }
}

/// Serves schema documents from memory.
///
/// Useful for offline runs against mirrored documents. Every fetch is
/// recorded, so callers can observe exactly which URLs were requested.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    documents: HashMap<String, String>,
    requested: RefCell<Vec<String>>,
    fetches: Cell<usize>,
}

impl MemoryLoader {
    /// An empty loader: every fetch fails with HTTP 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` (YAML or JSON text) at `url`.
    pub fn with_document(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.documents.insert(url.into(), body.into());
        self
    }

    /// Serve a JSON value at `url`.
    pub fn with_json(self, url: impl Into<String>, document: &Value) -> Self {
        self.with_document(url, document.to_string())
    }

    /// Total number of fetch calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }

    /// Every URL requested so far, in order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl SchemaLoader for MemoryLoader {
    fn fetch(&self, url: &str) -> Result<Value, LoadError> {
        self.fetches.set(self.fetches.get() + 1);
        self.requested.borrow_mut().push(url.to_string());
        match self.documents.get(url) {
            Some(body) => parse_document(url, body),
            None => Err(LoadError::Status {
                url: url.to_string(),
                status: 404,
                body: "404: Not Found".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yaml_documents() {
        let body = "components:\n  schemas:\n    Order:\n      type: object\n      required: [id]\n";
        let doc = parse_document("https://x/attributes.yaml", body).unwrap();
        assert_eq!(doc["components"]["schemas"]["Order"]["required"][0], "id");
    }

    #[test]
    fn parses_json_documents() {
        let doc = parse_document("u", r#"{"components": {"schemas": {}}}"#).unwrap();
        assert!(doc["components"]["schemas"].is_object());
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = parse_document("u", "components: [unclosed").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }), "got {err}");
    }

    #[test]
    fn memory_loader_counts_and_records() {
        let loader = MemoryLoader::new().with_document("a", "x: 1");
        assert_eq!(loader.fetch("a").unwrap()["x"], 1);
        assert!(matches!(
            loader.fetch("b"),
            Err(LoadError::Status { status: 404, .. })
        ));
        assert_eq!(loader.fetch_count(), 2);
        assert_eq!(loader.requested(), vec!["a", "b"]);
    }

    #[test]
    fn loader_by_reference() {
        let loader = MemoryLoader::new().with_document("a", "{}");
        let by_ref = &loader;
        by_ref.fetch("a").unwrap();
        assert_eq!(loader.fetch_count(), 1);
    }

    #[test]
    fn http_loader_rejects_invalid_url_without_request() {
        let loader = HttpSchemaLoader::new(&LoaderConfig::default()).unwrap();
        let err = loader.fetch("not a url").unwrap_err();
        assert!(matches!(err, LoadError::InvalidUrl { .. }), "got {err}");
    }
}
