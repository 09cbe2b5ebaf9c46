//! # pokepwa - offline caching worker
//!
//! `pokepwa` intercepts the outbound requests of a web client and answers them
//! from versioned cache partitions when it can, falling back to the network and
//! filling the caches opportunistically.
//!
//! ## Strategies
//!
//! Each request is classified by URL into exactly one strategy:
//!
//! - **API** (`pokeapi.co`): cached response if present, otherwise network;
//!   `200 OK` responses are stored, network failure yields a `503` JSON error.
//! - **Image** (`raw.githubusercontent.com` + `sprites`): same, but offline
//!   requests get the placeholder icon instead.
//! - **Generic**: cache-first across every partition; an offline navigation is
//!   answered with the cached root document.
//!
//! ## Lifecycle
//!
//! - `install`: fills the critical-assets partition from the manifest, then
//!   asks the host to activate this version without waiting.
//! - `activate`: deletes every partition that is not current and claims the
//!   already-open clients.
//! - `fetch`: routes the request through its strategy.
//!
//! ## Modules
//!
//! - `partitions`: the fixed, versioned partition names.
//! - `manifest`: the critical-asset list.
//! - `bootstrap`: install-time population of critical assets.
//! - `strategy`: request routing and the three caching strategies.
//! - `reclaim`: stale partition cleanup.
//! - `host`: host capabilities (skip waiting, client claiming).
//! - `worker`: lifecycle event dispatch tying everything together.
pub mod bootstrap;
pub mod error;
pub mod fetch;
pub mod host;
pub mod manifest;
pub mod observability;
pub mod partitions;
pub mod prelude;
pub mod reclaim;
pub mod request;
pub mod strategy;
pub mod worker;

pub use pokepwa_cache as cache;
pub use pokepwa_config as config;
pub use pokepwa_router as router;

// re-export
pub use async_trait;
#[cfg(feature = "http")]
pub use reqwest;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;
pub use url;
