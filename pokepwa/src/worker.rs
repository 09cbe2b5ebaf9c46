//! Lifecycle event dispatch.
//!
//! The host delivers `install`, `activate` and `fetch` events and does not
//! consider an event finished until the future returned for it settles. That
//! is how the worker holds installation open until critical assets are cached
//! and how it answers a request with a specific response.
use crate::bootstrap::{BootstrapError, BootstrapLoader};
use crate::error::WorkerError;
use crate::fetch::Fetcher;
use crate::host::Host;
use crate::manifest::Manifest;
use crate::reclaim::{ReclaimReport, Reclaimer};
use crate::request::Request;
use crate::strategy::StrategyEngine;
use derive_builder::Builder;
use pokepwa_cache::{CacheStorage, Response};
use pokepwa_config::WorkerSettings;
use pokepwa_config::settings::{DEFAULT_FALLBACK_ICON, DEFAULT_VERSION};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use url::Url;

pub const DEFAULT_USER_AGENT: &str = concat!("pokepwa/", env!("CARGO_PKG_VERSION"));

#[derive(Builder, Clone, Debug)]
#[builder(public, setter(into))]
pub struct WorkerOptions {
    /// Origin the worker controls.
    pub origin: Url,
    #[builder(default = "Manifest::default()")]
    pub manifest: Manifest,
    /// Placeholder fetched for offline images, relative to `origin`.
    #[builder(default = "DEFAULT_FALLBACK_ICON.to_string()")]
    pub fallback_icon: String,
    /// Version tag reported to the host when claiming clients.
    #[builder(default = "DEFAULT_VERSION.to_string()")]
    pub version: String,
}

impl WorkerOptions {
    pub fn from_settings(settings: &WorkerSettings, manifest: Manifest) -> Self {
        Self {
            origin: settings.origin.clone(),
            manifest,
            fallback_icon: settings.fallback_icon.clone(),
            version: settings.version.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    Install,
    Activate,
    Fetch(Request),
}

#[derive(Debug)]
pub enum EventOutcome {
    /// Number of critical assets cached, or why installation failed. A failed
    /// install still completes the event.
    Installed(Result<usize, BootstrapError>),
    Activated(ReclaimReport),
    /// `None` is a failed load on the client side.
    Responded(Option<Response>),
}

pub struct ServiceWorker {
    options: WorkerOptions,
    host: Arc<dyn Host>,
    bootstrap: BootstrapLoader,
    engine: StrategyEngine,
    reclaimer: Reclaimer,
}

impl ServiceWorker {
    pub fn new(
        options: WorkerOptions,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        host: Arc<dyn Host>,
    ) -> Result<Self, WorkerError> {
        let root = resolve(&options.origin, "/")?;
        let fallback_icon = resolve(&options.origin, &options.fallback_icon)?;

        let bootstrap = BootstrapLoader::new(
            storage.clone(),
            fetcher.clone(),
            options.origin.clone(),
            options.manifest.clone(),
        );
        let engine = StrategyEngine::new(storage.clone(), fetcher, root, fallback_icon);
        let reclaimer = Reclaimer::new(storage, host.clone(), &options.version);

        Ok(Self {
            options,
            host,
            bootstrap,
            engine,
            reclaimer,
        })
    }

    /// Build a worker with a reqwest-backed fetcher from a YAML config holding
    /// `worker:` and `http:` sections.
    #[cfg(feature = "http")]
    pub fn from_config<C: pokepwa_config::Configurable>(
        app: &C,
        storage: Arc<dyn CacheStorage>,
        host: Arc<dyn Host>,
    ) -> Result<Self, WorkerError> {
        use crate::fetch::HttpFetcher;
        use pokepwa_config::ConfigError;
        use pokepwa_config::http::HttpClientParams;

        let settings = WorkerSettings::from_config(app)?;
        let manifest = match settings.manifest_lines::<C>()? {
            Some(lines) => Manifest::from_lines(lines)?,
            None => Manifest::default(),
        };
        let options = WorkerOptions::from_settings(&settings, manifest);

        let http_config = app
            .get_config_value("http")
            .ok_or_else(|| ConfigError::Missing("http".to_string()))?;
        let params = HttpClientParams::from_config(http_config, DEFAULT_USER_AGENT)?;
        let fetcher = HttpFetcher::from_params(params)?;

        Self::new(options, storage, Arc::new(fetcher), host)
    }

    pub fn options(&self) -> &WorkerOptions {
        &self.options
    }

    pub fn version(&self) -> &str {
        &self.options.version
    }

    pub fn engine(&self) -> &StrategyEngine {
        &self.engine
    }

    /// Cache the critical assets, then ask the host to activate this version
    /// right away. Failures are logged and reported, never retried.
    #[instrument(skip(self), fields(version = %self.options.version))]
    pub async fn handle_install(&self) -> Result<usize, BootstrapError> {
        info!("Installing worker");
        match self.bootstrap.install().await {
            Ok(written) => {
                if let Err(e) = self.host.skip_waiting().await {
                    warn!("Failed to skip waiting: {}", e);
                }
                Ok(written)
            }
            Err(e) => {
                error!("Failed to cache critical assets: {}", e);
                Err(e)
            }
        }
    }

    #[instrument(skip(self), fields(version = %self.options.version))]
    pub async fn handle_activate(&self) -> ReclaimReport {
        let report = self.reclaimer.reclaim().await;
        info!(
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            claimed = report.claimed,
            "Worker activated"
        );
        report
    }

    /// Answer an intercepted request. Errors end as a failed load for that
    /// request only.
    pub async fn handle_fetch(&self, request: Request) -> Option<Response> {
        match self.engine.route(&request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to respond to {} {}: {}", request.method, request.url, e);
                None
            }
        }
    }

    pub async fn dispatch(&self, event: LifecycleEvent) -> EventOutcome {
        match event {
            LifecycleEvent::Install => EventOutcome::Installed(self.handle_install().await),
            LifecycleEvent::Activate => EventOutcome::Activated(self.handle_activate().await),
            LifecycleEvent::Fetch(request) => {
                EventOutcome::Responded(self.handle_fetch(request).await)
            }
        }
    }
}

fn resolve(origin: &Url, path: &str) -> Result<Url, WorkerError> {
    origin.join(path).map_err(|source| WorkerError::InvalidUrl {
        url: path.to_string(),
        source,
    })
}

impl std::fmt::Debug for ServiceWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceWorker")
            .field("options", &self.options)
            .field("engine", &self.engine)
            .finish()
    }
}
