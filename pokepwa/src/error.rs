use crate::fetch::FetchError;
use crate::manifest::ManifestError;
use pokepwa_cache::CacheError;
use pokepwa_config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
