use bytes::Bytes;
use http::{HeaderMap, Method};
use pokepwa_cache::RequestKey;
use url::Url;

/// What the request is for, as reported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// Top-level document load.
    Navigate,
    SameOrigin,
    NoCors,
    #[default]
    Cors,
}

/// How intermediary HTTP caches may be used for the network round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    #[default]
    Default,
    NoStore,
    /// Force a full network round trip, bypassing intermediary caches.
    Reload,
    NoCache,
}

/// An intercepted outbound request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub mode: RequestMode,
    pub cache: CacheMode,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            mode: RequestMode::default(),
            cache: CacheMode::default(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// A top-level `GET` navigation.
    pub fn navigate(url: Url) -> Self {
        Self::get(url).with_mode(RequestMode::Navigate)
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn key(&self) -> RequestKey {
        RequestKey::new(self.method.clone(), self.url.clone())
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// Only `GET` requests are looked up in or written to a partition.
    pub fn is_cacheable(&self) -> bool {
        self.method == Method::GET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_defaults() {
        let request = Request::get(url("http://localhost:3000/index.html"));
        assert_eq!(request.mode, RequestMode::Cors);
        assert_eq!(request.cache, CacheMode::Default);
        assert!(!request.is_navigation());
        assert!(request.is_cacheable());
    }

    #[test]
    fn test_navigate() {
        let request = Request::navigate(url("http://localhost:3000/pokemon/25"));
        assert!(request.is_navigation());
        assert_eq!(request.method, Method::GET);
    }

    #[test]
    fn test_key_matches_method_and_url() {
        let request = Request::new(Method::POST, url("https://pokeapi.co/api/v2/x"))
            .with_body("{}");
        let key = request.key();
        assert_eq!(key.method, Method::POST);
        assert_eq!(key.url.as_str(), "https://pokeapi.co/api/v2/x");
        assert!(!request.is_cacheable());
    }
}
