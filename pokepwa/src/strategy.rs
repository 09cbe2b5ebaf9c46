//! Request routing and the three caching strategies.
//!
//! `route` classifies the request and runs exactly one strategy:
//!
//! - API: partition lookup, then network. A `200 OK` is written back; a
//!   network failure is answered with a synthesized `503` JSON error.
//! - Image: same lookup/write-back, but a network failure is answered with
//!   whatever fetching the fallback icon yields.
//! - Generic: cache-first over every partition, never written back. A network
//!   failure is answered with the cached root document for navigations and
//!   with no response otherwise.
//!
//! Steps inside one invocation are strictly sequential. Concurrent invocations
//! for the same identity may both miss and both write; the last write wins.
use crate::error::WorkerError;
use crate::fetch::{FetchError, Fetcher};
use crate::partitions::Partition;
use crate::request::Request;
use http::StatusCode;
use pokepwa_cache::{CacheStorage, RequestKey, Response};
use pokepwa_router::{Router, Strategy};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use url::Url;

/// Message of the synthesized API error served while offline.
pub const OFFLINE_ERROR_MESSAGE: &str = "Sin conexión";

/// Result of a network-first attempt against one partition.
enum NetworkFirst {
    /// Cache hit or network response.
    Served(Response),
    /// Cache miss and the network failed.
    Offline(FetchError),
}

pub struct StrategyEngine {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    router: Router,
    root: RequestKey,
    fallback_icon: Url,
}

impl StrategyEngine {
    /// `root` is the document served to offline navigations, `fallback_icon`
    /// the placeholder fetched for offline images.
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        root: Url,
        fallback_icon: Url,
    ) -> Self {
        Self {
            storage,
            fetcher,
            router: Router::new(),
            root: RequestKey::get(root),
            fallback_icon,
        }
    }

    pub fn classify(&self, request: &Request) -> Strategy {
        self.router.classify_url(&request.url)
    }

    /// Produce the response for an intercepted request.
    ///
    /// `Ok(None)` means the request gets no response and the client sees a
    /// failed load. Store failures and a failed fallback-icon fetch surface as
    /// `Err`.
    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    pub async fn route(&self, request: &Request) -> Result<Option<Response>, WorkerError> {
        let strategy = self.classify(request);
        debug!("Routing with {} strategy", strategy);

        match strategy {
            Strategy::Api => self.api(request).await.map(Some),
            Strategy::Image => self.image(request).await.map(Some),
            Strategy::Generic => self.generic(request).await,
        }
    }

    async fn api(&self, request: &Request) -> Result<Response, WorkerError> {
        match self.network_first(Partition::ApiResponses, request).await? {
            NetworkFirst::Served(response) => Ok(response),
            NetworkFirst::Offline(e) => {
                warn!("Network error for API request {}: {}", request.url, e);
                let response = Response::json(
                    StatusCode::SERVICE_UNAVAILABLE,
                    &json!({ "error": OFFLINE_ERROR_MESSAGE }),
                )?;
                Ok(response)
            }
        }
    }

    async fn image(&self, request: &Request) -> Result<Response, WorkerError> {
        match self.network_first(Partition::ImageAssets, request).await? {
            NetworkFirst::Served(response) => Ok(response),
            NetworkFirst::Offline(e) => {
                warn!("Failed to load image {}: {}", request.url, e);
                let fallback = Request::get(self.fallback_icon.clone());
                Ok(self.fetcher.fetch(&fallback).await?)
            }
        }
    }

    async fn generic(&self, request: &Request) -> Result<Option<Response>, WorkerError> {
        if request.is_cacheable() {
            if let Some(hit) = self.storage.match_any(&request.key()).await? {
                debug!("Served {} from cache", request.url);
                return Ok(Some(hit));
            }
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => Ok(Some(response)),
            Err(e) if request.is_navigation() => {
                warn!("Navigation to {} failed, serving {}: {}", request.url, self.root.url, e);
                Ok(self.storage.match_any(&self.root).await?)
            }
            Err(e) => {
                debug!("Request {} failed with no fallback: {}", request.url, e);
                Ok(None)
            }
        }
    }

    /// Lookup in `partition`, then network, writing `200 OK` responses back.
    ///
    /// Only lookup failures propagate; a failed write-back is logged and the
    /// network response is still returned.
    async fn network_first(
        &self,
        partition: Partition,
        request: &Request,
    ) -> Result<NetworkFirst, WorkerError> {
        let cache = self.storage.open(partition.name()).await?;

        if request.is_cacheable() {
            if let Some(hit) = cache.get(&request.key()).await? {
                debug!("Served {} from {}", request.url, partition);
                return Ok(NetworkFirst::Served(hit));
            }
        }

        let response = match self.fetcher.fetch(request).await {
            Ok(response) => response,
            Err(e) => return Ok(NetworkFirst::Offline(e)),
        };

        if request.is_cacheable() && response.is_cacheable() {
            match cache.put(request.key(), response.clone()).await {
                Ok(()) => debug!("Saved {} in {}", request.url, partition),
                Err(e) => warn!("Failed to save {} in {}: {}", request.url, partition, e),
            }
        }

        Ok(NetworkFirst::Served(response))
    }
}

impl std::fmt::Debug for StrategyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyEngine")
            .field("router", &self.router)
            .field("root", &self.root.url.as_str())
            .field("fallback_icon", &self.fallback_icon.as_str())
            .finish()
    }
}
