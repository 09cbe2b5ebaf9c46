pub use crate::bootstrap::{BootstrapError, BootstrapLoader};
pub use crate::error::WorkerError;
#[cfg(feature = "http")]
pub use crate::fetch::HttpFetcher;
pub use crate::fetch::{FetchError, Fetcher};
pub use crate::host::{ClientId, Host, HostError, LocalHost};
pub use crate::manifest::{Manifest, ManifestError};
pub use crate::partitions::Partition;
pub use crate::reclaim::{ReclaimReport, Reclaimer};
pub use crate::request::{CacheMode, Request, RequestMode};
pub use crate::strategy::StrategyEngine;
pub use crate::worker::{
    EventOutcome, LifecycleEvent, ServiceWorker, WorkerOptions, WorkerOptionsBuilder,
};
pub use pokepwa_cache::{
    Cache, CacheError, CacheStorage, InMemoryCacheStorage, RequestKey, Response,
};
pub use pokepwa_router::{Router, Strategy};
