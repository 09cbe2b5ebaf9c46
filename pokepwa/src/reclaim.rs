//! Activation-time cleanup: delete every partition that is not current, then
//! claim the open clients.
//!
//! Deletions run independently. A failed deletion is recorded and never stops
//! the remaining ones or the claim.
use crate::host::{Host, HostError};
use crate::partitions::Partition;
use futures::future::join_all;
use pokepwa_cache::{CacheError, CacheStorage};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What a reclaim pass did.
#[derive(Debug, Default)]
pub struct ReclaimReport {
    /// Stale partitions that were deleted.
    pub deleted: Vec<String>,
    /// Stale partitions whose deletion failed.
    pub failed: Vec<(String, CacheError)>,
    /// Set when the partition names could not be listed at all.
    pub listing_error: Option<CacheError>,
    /// Number of clients claimed.
    pub claimed: usize,
    pub claim_error: Option<HostError>,
}

impl ReclaimReport {
    /// True when every step succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.listing_error.is_none() && self.claim_error.is_none()
    }
}

pub struct Reclaimer {
    storage: Arc<dyn CacheStorage>,
    host: Arc<dyn Host>,
    version: String,
}

impl Reclaimer {
    pub fn new(storage: Arc<dyn CacheStorage>, host: Arc<dyn Host>, version: &str) -> Self {
        Self {
            storage,
            host,
            version: version.to_string(),
        }
    }

    pub async fn reclaim(&self) -> ReclaimReport {
        let mut report = ReclaimReport::default();

        match self.storage.names().await {
            Ok(names) => {
                let stale = names.into_iter().filter(|name| !Partition::is_current(name));
                let results = join_all(stale.map(|name| async move {
                    let result = self.storage.delete(&name).await;
                    (name, result)
                }))
                .await;

                for (name, result) in results {
                    match result {
                        Ok(true) => {
                            info!("Deleted stale cache {}", name);
                            report.deleted.push(name);
                        }
                        Ok(false) => debug!("Stale cache {} already gone", name),
                        Err(e) => {
                            warn!("Failed to delete stale cache {}: {}", name, e);
                            report.failed.push((name, e));
                        }
                    }
                }
            }
            Err(e) => {
                warn!("Failed to list caches: {}", e);
                report.listing_error = Some(e);
            }
        }

        match self.host.claim_clients(&self.version).await {
            Ok(claimed) => report.claimed = claimed,
            Err(e) => {
                warn!("Failed to claim clients: {}", e);
                report.claim_error = Some(e);
            }
        }

        report
    }
}

impl std::fmt::Debug for Reclaimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reclaimer")
            .field("version", &self.version)
            .finish()
    }
}
