//! # Context Annotation Parsing
//!
//! A `@context` URL such as
//!
//! ```text
//! https://raw.githubusercontent.com/beckn/protocol-specifications-new/refs/heads/main/schema/EvChargingOffer/v1/context.jsonld
//! ```
//!
//! encodes everything needed to locate the schema that governs the object
//! carrying it: the hosting branch (`main`), the schema family
//! (`EvChargingOffer`), and its version (`v1`). The attributes document that
//! holds the JSON Schema definitions lives next to the context document, so
//! its URL is obtained by swapping the filename.
//!
//! All functions here are pure string transforms. No normalization, no
//! percent-decoding.

use crate::error::ResolveError;

/// Filename suffix of a context document.
pub const CONTEXT_SUFFIX: &str = "/context.jsonld";

/// Filename suffix of the attributes (schema) document.
pub const ATTRIBUTES_SUFFIX: &str = "/attributes.yaml";

/// Path marker preceding the branch name.
const BRANCH_MARKER: &str = "/refs/heads/";

/// Path marker preceding the schema family.
const SCHEMA_MARKER: &str = "/schema/";

/// Path marker identifying the core schema family.
const CORE_MARKER: &str = "/schema/core/";

/// Derive the attributes document URL from a context URL.
///
/// Every occurrence of [`CONTEXT_SUFFIX`] is replaced with
/// [`ATTRIBUTES_SUFFIX`]. A URL without the suffix is returned unchanged.
pub fn canonical_url(context_url: &str) -> String {
    context_url.replace(CONTEXT_SUFFIX, ATTRIBUTES_SUFFIX)
}

/// Returns true if the URL points into the core schema family.
pub fn is_core_context(context_url: &str) -> bool {
    context_url.contains(CORE_MARKER)
}

/// Extract the branch name from `.../refs/heads/{branch}/schema/...`.
///
/// The leftmost occurrence that is followed by a non-empty branch segment
/// and a `/schema/` segment wins.
pub fn extract_branch(context_url: &str) -> Option<&str> {
    marker_positions(context_url, BRANCH_MARKER).find_map(|idx| {
        let rest = &context_url[idx + BRANCH_MARKER.len()..];
        let (branch, tail) = rest.split_at(rest.find('/')?);
        (!branch.is_empty() && tail.starts_with(SCHEMA_MARKER)).then_some(branch)
    })
}

/// Extract `(family, version)` from `.../schema/{family}/{version}/attributes.yaml`.
pub fn extract_family(canonical_url: &str) -> Option<(&str, &str)> {
    let filename = &ATTRIBUTES_SUFFIX[1..];
    marker_positions(canonical_url, SCHEMA_MARKER).find_map(|idx| {
        let rest = &canonical_url[idx + SCHEMA_MARKER.len()..];
        let mut parts = rest.splitn(3, '/');
        let family = parts.next()?;
        let version = parts.next()?;
        let tail = parts.next()?;
        (!family.is_empty() && !version.is_empty() && tail.starts_with(filename))
            .then_some((family, version))
    })
}

/// Structural identity of a `@context` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextKey {
    /// Branch the schema is hosted on. Used for diagnostics only.
    pub branch: String,
    /// Schema family name, e.g. `EvChargingOffer` or `core`.
    pub family: String,
    /// Schema family version, e.g. `v1`.
    pub version: String,
    /// True for the core schema family.
    pub is_core: bool,
    /// URL of the attributes document derived from the context URL.
    pub canonical_url: String,
}

impl ContextKey {
    /// Parse a context URL into its structural identity.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MissingBranch`] if the URL has no branch
    /// segment, and [`ResolveError::MissingFamily`] if the derived attributes
    /// URL does not name a family and version.
    pub fn resolve(context_url: &str) -> Result<Self, ResolveError> {
        let branch = extract_branch(context_url).ok_or_else(|| ResolveError::MissingBranch {
            context_url: context_url.to_string(),
        })?;

        let canonical_url = canonical_url(context_url);
        let (family, version) = match extract_family(&canonical_url) {
            Some((family, version)) => (family.to_string(), version.to_string()),
            None => return Err(ResolveError::MissingFamily { canonical_url }),
        };

        Ok(Self {
            branch: branch.to_string(),
            family,
            version,
            is_core: is_core_context(context_url),
            canonical_url,
        })
    }
}

/// Byte offsets of every occurrence of `marker`, overlapping ones included.
fn marker_positions<'a>(haystack: &'a str, marker: &'a str) -> impl Iterator<Item = usize> + 'a {
    let mut from = 0;
    std::iter::from_fn(move || {
        let idx = from + haystack.get(from..)?.find(marker)?;
        from = idx + 1;
        Some(idx)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str =
        "https://raw.githubusercontent.com/beckn/protocol-specifications-new/refs/heads";

    fn context(branch: &str, family: &str, version: &str) -> String {
        format!("{BASE}/{branch}/schema/{family}/{version}/context.jsonld")
    }

    #[test]
    fn canonical_url_swaps_filename() {
        let url = context("main", "EvChargingOffer", "v1");
        assert_eq!(
            canonical_url(&url),
            format!("{BASE}/main/schema/EvChargingOffer/v1/attributes.yaml")
        );
    }

    #[test]
    fn canonical_url_leaves_other_urls_alone() {
        let url = "https://example.org/vocab.jsonld";
        assert_eq!(canonical_url(url), url);
    }

    #[test]
    fn resolves_domain_context() {
        let key = ContextKey::resolve(&context("p2p_trading", "EnergyResource", "v0.2")).unwrap();
        assert_eq!(key.branch, "p2p_trading");
        assert_eq!(key.family, "EnergyResource");
        assert_eq!(key.version, "v0.2");
        assert!(!key.is_core);
        assert!(key.canonical_url.ends_with("/EnergyResource/v0.2/attributes.yaml"));
    }

    #[test]
    fn resolves_core_context() {
        let key = ContextKey::resolve(&context("draft", "core", "v2")).unwrap();
        assert_eq!(key.branch, "draft");
        assert_eq!(key.family, "core");
        assert_eq!(key.version, "v2");
        assert!(key.is_core);
    }

    #[test]
    fn missing_branch_is_rejected() {
        let url = "https://example.org/schema/core/v2/context.jsonld";
        assert_eq!(
            ContextKey::resolve(url),
            Err(ResolveError::MissingBranch {
                context_url: url.to_string()
            })
        );
    }

    #[test]
    fn branch_requires_schema_segment() {
        assert_eq!(
            extract_branch("https://x/refs/heads/main/docs/core/v2/context.jsonld"),
            None
        );
        assert_eq!(extract_branch("https://x/refs/heads//schema/core"), None);
    }

    #[test]
    fn missing_family_is_rejected() {
        let url = format!("{BASE}/main/schema/core/context.jsonld");
        let err = ContextKey::resolve(&url).unwrap_err();
        assert!(matches!(err, ResolveError::MissingFamily { .. }));
    }

    #[test]
    fn family_extraction_picks_first_match() {
        let url = "https://x/schema/a/schema/Fam/v3/attributes.yaml";
        assert_eq!(extract_family(url), Some(("Fam", "v3")));
    }

    #[test]
    fn overlapping_markers_are_considered() {
        let url = "https://x/schema/schema/Fam/v1/attributes.yaml";
        assert_eq!(extract_family(url), Some(("Fam", "v1")));
    }

    #[test]
    fn core_detection_is_literal() {
        assert!(is_core_context(&context("main", "core", "v2")));
        assert!(!is_core_context(&context("main", "corex", "v2")));
        assert!(!is_core_context(&context("main", "Core", "v2")));
    }
}
