//! Install-time population of the critical-assets partition.
//!
//! Every manifest entry is fetched concurrently with `CacheMode::Reload`, so
//! intermediary HTTP caches are bypassed. The responses are written as one
//! batch only after all of them have arrived. Any failed fetch or non-2xx
//! response fails the whole install, and nothing is retried.
use crate::fetch::{FetchError, Fetcher};
use crate::manifest::{Manifest, ManifestError};
use crate::partitions::Partition;
use crate::request::{CacheMode, Request};
use futures::future::try_join_all;
use http::StatusCode;
use pokepwa_cache::{CacheError, CacheStorage};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: Url,
        #[source]
        source: FetchError,
    },
    #[error("Unexpected status {status} for {url}")]
    BadStatus { url: Url, status: StatusCode },
}

pub struct BootstrapLoader {
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    origin: Url,
    manifest: Manifest,
}

impl BootstrapLoader {
    pub fn new(
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        origin: Url,
        manifest: Manifest,
    ) -> Self {
        Self {
            storage,
            fetcher,
            origin,
            manifest,
        }
    }

    /// Populate the critical-assets partition. Returns the number of entries
    /// written.
    pub async fn install(&self) -> Result<usize, BootstrapError> {
        let urls = self.manifest.resolve(&self.origin)?;
        let cache = self.storage.open(Partition::CriticalAssets.name()).await?;
        debug!("Opened {} for {} critical assets", cache.name(), urls.len());

        let fetches = urls.into_iter().map(|url| async move {
            let request = Request::get(url).with_cache(CacheMode::Reload);
            let response = self.fetcher.fetch(&request).await.map_err(|source| {
                BootstrapError::Fetch {
                    url: request.url.clone(),
                    source,
                }
            })?;
            if !response.is_success() {
                return Err(BootstrapError::BadStatus {
                    url: request.url.clone(),
                    status: response.status,
                });
            }
            Ok((request.key(), response))
        });

        let entries = try_join_all(fetches).await?;
        let written = entries.len();
        cache.put_all(entries).await?;

        info!("Cached {} critical assets in {}", written, cache.name());
        Ok(written)
    }
}

impl std::fmt::Debug for BootstrapLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapLoader")
            .field("origin", &self.origin.as_str())
            .field("manifest", &self.manifest)
            .finish()
    }
}
