//! HTTP client construction for the worker's network fetcher.
//!
//! This module provides functionality for building a configured HTTP client:
//! - Timeout settings
//! - User agent customization
//!
//! Retries are deliberately absent: a failed request must surface quickly so
//! the offline fallbacks can take over.
//!
//! # Example
//! ```no_run
//! use pokepwa_config::http::{HttpClientParams, build_http_client};
//! use serde_yaml::Value;
//!
//! let config: Value = serde_yaml::from_str(r#"
//! http:
//!     timeout: 30
//!     connect_timeout: 10
//! "#).unwrap();
//!
//! let params = HttpClientParams::from_config(&config["http"], "pokepwa/0.4").unwrap();
//! let client = build_http_client(params).unwrap();
//! ```
use crate::ConfigError;

/// Parameters for configuring an HTTP client.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpClientParams<'a> {
    pub timeout: u64,
    pub connect_timeout: u64,
    pub user_agent: &'a str,
}

impl<'a> HttpClientParams<'a> {
    /// Creates an HttpClientParams instance from a YAML configuration.
    ///
    /// The configuration should follow this structure:
    /// ```yaml
    /// http:
    ///     timeout: 30
    ///     connect_timeout: 10
    ///     user_agent: pokepwa/0.4
    /// ```
    ///
    /// `user_agent` in the config takes precedence over the `user_agent`
    /// argument.
    pub fn from_config(
        http_config: &'a serde_yaml::Value,
        user_agent: &'a str,
    ) -> Result<Self, ConfigError> {
        let timeout = http_config["timeout"]
            .as_u64()
            .ok_or_else(|| ConfigError::Missing("http.timeout".to_string()))?;
        let connect_timeout = http_config["connect_timeout"]
            .as_u64()
            .ok_or_else(|| ConfigError::Missing("http.connect_timeout".to_string()))?;
        let user_agent = http_config["user_agent"].as_str().unwrap_or(user_agent);

        Ok(Self {
            timeout,
            connect_timeout,
            user_agent,
        })
    }
}

/// Builds an HTTP client with the specified parameters.
///
/// Creates a reqwest::Client configured with:
/// - TLS settings
/// - Timeout configurations
/// - User agent
pub fn build_http_client(
    params: HttpClientParams,
) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::ClientBuilder::new()
        .use_rustls_tls()
        .timeout(std::time::Duration::from_secs(params.timeout))
        .connect_timeout(std::time::Duration::from_secs(params.connect_timeout))
        .user_agent(params.user_agent)
        .build()
}
