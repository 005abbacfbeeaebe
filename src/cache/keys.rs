use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use std::fmt;

/// Upper bound on fingerprint length; the shared store uses the fingerprint
/// as a document id and long detail paths would overflow it.
pub const MAX_FINGERPRINT_LEN: usize = 120;

/// Typed cache key for a logical catalog request, replacing ad-hoc string
/// concatenation. The derived fingerprint is the cache key in both tiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestKey {
    /// One page of a category listing.
    Category { action: String, page: u32 },

    /// A free-text search.
    Search { query: String },

    /// A detail lookup by opaque upstream path.
    Detail { path: String },
}

impl RequestKey {
    pub fn category(action: &str, page: u32) -> Self {
        RequestKey::Category {
            action: action.to_string(),
            page,
        }
    }

    pub fn search(query: &str) -> Self {
        RequestKey::Search {
            query: query.to_string(),
        }
    }

    pub fn detail(path: &str) -> Self {
        RequestKey::Detail {
            path: path.to_string(),
        }
    }

    /// Derive the deterministic fingerprint for this request.
    ///
    /// Detail paths go through a reversible URL-safe base64 encoding rather
    /// than being used raw: slashes and unicode in the path must not leak
    /// into store keys. The result is clamped to [`MAX_FINGERPRINT_LEN`].
    pub fn fingerprint(&self) -> String {
        let full = match self {
            RequestKey::Category { action, page } => format!("{}_{}", action, page),
            RequestKey::Search { query } => format!("search_{}", normalize_query(query)),
            RequestKey::Detail { path } => format!("detail_{}", URL_SAFE_NO_PAD.encode(path)),
        };
        clamp(full)
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fingerprint())
    }
}

/// Case-fold and collapse whitespace runs to single underscores, so
/// "Iron  Man" and "iron man" share one cache entry.
fn normalize_query(query: &str) -> String {
    query
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn clamp(mut key: String) -> String {
    if key.len() > MAX_FINGERPRINT_LEN {
        let mut end = MAX_FINGERPRINT_LEN;
        while !key.is_char_boundary(end) {
            end -= 1;
        }
        key.truncate(end);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_fingerprint_joins_action_and_page() {
        let key = RequestKey::category("kdrama", 3);
        assert_eq!(key.fingerprint(), "kdrama_3");
        assert_eq!(key.to_string(), "kdrama_3");
    }

    #[test]
    fn search_fingerprint_is_case_folded_and_collapsed() {
        let key = RequestKey::search("  Iron   MAN  ");
        assert_eq!(key.fingerprint(), "search_iron_man");
        assert_eq!(
            RequestKey::search("iron man").fingerprint(),
            key.fingerprint()
        );
    }

    #[test]
    fn detail_fingerprint_survives_special_characters() {
        let key = RequestKey::detail("/film/drama-korea/äöü?ep=1");
        let fingerprint = key.fingerprint();
        assert!(fingerprint.starts_with("detail_"));
        assert!(!fingerprint.contains('/'));
        assert!(!fingerprint.contains('+'));
        assert_eq!(fingerprint, key.fingerprint());
    }

    #[test]
    fn distinct_paths_produce_distinct_fingerprints() {
        let a = RequestKey::detail("/film/a-b").fingerprint();
        let b = RequestKey::detail("/film/a/b").fingerprint();
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprints_are_bounded() {
        let long_path = "/series/".repeat(64);
        let fingerprint = RequestKey::detail(&long_path).fingerprint();
        assert!(fingerprint.len() <= MAX_FINGERPRINT_LEN);
    }
}
