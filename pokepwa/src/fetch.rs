//! Network fetch capability.
//!
//! The worker never talks to the network directly; it goes through a
//! `Fetcher`. `HttpFetcher` is the reqwest-backed implementation; tests inject
//! scripted ones.
use crate::request::Request;
use async_trait::async_trait;
use pokepwa_cache::Response;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    /// The request never produced a response (offline, DNS, refused, timeout).
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Generic network fetch: request in, response or failure out.
///
/// HTTP error statuses are responses, not failures.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

#[cfg(feature = "http")]
pub use self::http_fetcher::HttpFetcher;

#[cfg(feature = "http")]
mod http_fetcher {
    use super::{FetchError, Fetcher};
    use crate::request::{CacheMode, Request};
    use async_trait::async_trait;
    use http::{HeaderMap, HeaderValue, header};
    use pokepwa_cache::Response;
    use pokepwa_config::http::{HttpClientParams, build_http_client};
    use tracing::debug;

    impl From<reqwest::Error> for FetchError {
        fn from(e: reqwest::Error) -> Self {
            if e.is_builder() {
                FetchError::InvalidRequest(e.to_string())
            } else {
                FetchError::Network(e.to_string())
            }
        }
    }

    /// Fetcher backed by a `reqwest::Client`.
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: reqwest::Client,
    }

    impl HttpFetcher {
        pub fn new(client: reqwest::Client) -> Self {
            Self { client }
        }

        pub fn from_params(params: HttpClientParams) -> Result<Self, FetchError> {
            Ok(Self::new(build_http_client(params)?))
        }
    }

    /// Request headers that carry a cache mode to intermediary HTTP caches.
    pub(crate) fn cache_mode_headers(mode: CacheMode) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match mode {
            CacheMode::Default => {}
            CacheMode::Reload | CacheMode::NoCache => {
                headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
                headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
            }
            CacheMode::NoStore => {
                headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
            }
        }
        headers
    }

    #[async_trait]
    impl Fetcher for HttpFetcher {
        async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
            let mut headers = request.headers.clone();
            headers.extend(cache_mode_headers(request.cache));

            let mut builder = self
                .client
                .request(request.method.clone(), request.url.clone())
                .headers(headers);
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }

            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            debug!("Fetched {} {} -> {}", request.method, request.url, status);

            Ok(Response {
                status,
                headers,
                body,
            })
        }
    }

}
