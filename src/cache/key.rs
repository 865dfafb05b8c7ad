//! Cache Key Module
//!
//! Derives cache identities from request URIs.

use std::convert::Infallible;
use std::fmt;

use axum::{
    async_trait,
    extract::{FromRequestParts, OriginalUri},
    http::{request::Parts, Uri},
};

// == Cache Key ==
/// Identity of a cacheable request: its path plus raw query string.
///
/// Derivation is pure. Parameter order and case are preserved and every
/// query parameter takes part, so clients passing different `api_key`
/// values never share an entry. A missing and an empty query produce the
/// same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds a key from a request path and its optional raw query.
    ///
    /// # Examples
    ///
    /// ```
    /// use scraper_gateway::cache::CacheKey;
    ///
    /// let key = CacheKey::new("/amazon/search/laptop", Some("api_key=abc"));
    /// assert_eq!(key.as_str(), "/amazon/search/laptop?api_key=abc");
    /// assert_eq!(CacheKey::new("/ebay/b/1", Some("")), CacheKey::new("/ebay/b/1", None));
    /// ```
    pub fn new(path: &str, query: Option<&str>) -> Self {
        match query {
            Some(query) if !query.is_empty() => Self(format!("{}?{}", path, query)),
            _ => Self(path.to_string()),
        }
    }

    // == From URI ==
    pub fn from_uri(uri: &Uri) -> Self {
        Self::new(uri.path(), uri.query())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key without its query string. Safe to log: the query may carry
    /// a client credential.
    pub fn path(&self) -> &str {
        key_path(&self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Path portion of a raw key string.
pub(crate) fn key_path(key: &str) -> &str {
    key.split_once('?').map_or(key, |(path, _)| path)
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Extractor ==
/// Keys are taken from the URI the client sent, before any router nesting
/// strips a prefix.
#[async_trait]
impl<S> FromRequestParts<S> for CacheKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = match parts.extensions.get::<OriginalUri>() {
            Some(OriginalUri(uri)) => Self::from_uri(uri),
            None => Self::from_uri(&parts.uri),
        };
        Ok(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_key_includes_query_verbatim() {
        let key = CacheKey::new("/amazon/products/B001", Some("api_key=k1&country=us"));
        assert_eq!(key.as_str(), "/amazon/products/B001?api_key=k1&country=us");
    }

    #[test]
    fn test_key_is_order_and_case_sensitive() {
        let a = CacheKey::new("/ebay/search/Phone", Some("a=1&b=2"));
        let b = CacheKey::new("/ebay/search/Phone", Some("b=2&a=1"));
        let c = CacheKey::new("/ebay/search/phone", Some("a=1&b=2"));

        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_query_is_dropped() {
        let key = CacheKey::new("/ebay/category/123", Some(""));
        assert_eq!(key.to_string(), "/ebay/category/123");
    }

    #[test]
    fn test_path_drops_query() {
        let key = CacheKey::new("/amazon/search/tv", Some("api_key=SECRET123"));
        assert_eq!(key.path(), "/amazon/search/tv");
        assert_eq!(CacheKey::new("/ebay/b/1", None).path(), "/ebay/b/1");
    }

    #[test]
    fn test_key_from_uri_is_stable() {
        let uri: Uri = "/amazon/search/usb%20hub?api_key=abc".parse().unwrap();
        assert_eq!(CacheKey::from_uri(&uri), CacheKey::from_uri(&uri));
        assert_eq!(
            CacheKey::from_uri(&uri).as_str(),
            "/amazon/search/usb%20hub?api_key=abc"
        );
    }

    #[tokio::test]
    async fn test_extractor_prefers_original_uri() {
        let original: Uri = "/api/amazon/products/B001?x=1".parse().unwrap();
        let (mut parts, _) = Request::builder()
            .uri("/amazon/products/B001?x=1")
            .extension(OriginalUri(original))
            .body(())
            .unwrap()
            .into_parts();

        let key = CacheKey::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(key.as_str(), "/api/amazon/products/B001?x=1");
    }

    #[tokio::test]
    async fn test_extractor_falls_back_to_request_uri() {
        let (mut parts, _) = Request::builder()
            .uri("/ebay/products/42")
            .body(())
            .unwrap()
            .into_parts();

        let key = CacheKey::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(key.as_str(), "/ebay/products/42");
    }
}
