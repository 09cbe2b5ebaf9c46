//! Request classification for the offline worker.
//!
//! Every intercepted request is routed to exactly one caching strategy. The
//! decision is a pure function of the request URL, evaluated per request:
//!
//! - `Strategy::Api`: the upstream data API, served network-first with cache
//!   population and a synthesized offline error.
//! - `Strategy::Image`: sprite images, served network-first with a placeholder
//!   icon fallback.
//! - `Strategy::Generic`: everything else, served cache-first.
//!
//! Rules are checked in a fixed order and the first match wins; anything no
//! rule claims is `Generic`.
//!
//! # Examples
//!
//! ```
//! use pokepwa_router::{Router, Strategy};
//! use pokepwa_router::url::Url;
//!
//! let router = Router::new();
//!
//! let url = Url::parse("https://pokeapi.co/api/v2/pokemon/1").unwrap();
//! assert_eq!(router.classify_url(&url), Strategy::Api);
//!
//! let url = Url::parse("http://localhost:3000/static/js/bundle.js").unwrap();
//! assert_eq!(router.classify_url(&url), Strategy::Generic);
//! ```
#![warn(clippy::unwrap_used)]
pub use url;
use std::fmt;
use url::Url;

/// Substring identifying the upstream data API host.
pub const API_HOST_PATTERN: &str = "pokeapi.co";
/// Substring identifying the sprite image host.
pub const IMAGE_HOST_PATTERN: &str = "raw.githubusercontent.com";
/// Path segment that must also be present for an image-host URL to count as a
/// sprite. This is a plain substring test on the whole URL, not a path match.
pub const SPRITE_PATH_PATTERN: &str = "sprites";

/// Caching strategy chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Network-first with cache population; cache hit short-circuits.
    Api,
    /// Like `Api`, but falls back to a placeholder icon when offline.
    Image,
    /// Cache-first across all partitions with navigation fallback.
    Generic,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Api => "api",
            Strategy::Image => "image",
            Strategy::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// Classifies request URLs into strategies.
#[derive(Debug)]
pub struct Router {
    classifier: URLClassifier,
}

trait ClassificationRule: Send + Sync {
    fn classify(&self, url: &Url) -> Option<Strategy>;
}

// Matches when the URL contains every pattern.
struct ContainsRule {
    strategy: Strategy,
    patterns: Vec<&'static str>,
}

impl Router {
    /// Creates a router with the fixed rule order: API first, then sprite
    /// images.
    pub fn new() -> Self {
        let mut classifier = URLClassifier::new();
        classifier.add_rule(Box::new(ContainsRule {
            strategy: Strategy::Api,
            patterns: vec![API_HOST_PATTERN],
        }));
        classifier.add_rule(Box::new(ContainsRule {
            strategy: Strategy::Image,
            patterns: vec![IMAGE_HOST_PATTERN, SPRITE_PATH_PATTERN],
        }));
        Router { classifier }
    }

    /// Classifies a single URL.
    ///
    /// # Returns
    ///
    /// The strategy of the first matching rule, or `Strategy::Generic` when
    /// no rule matches.
    pub fn classify_url(&self, url: &Url) -> Strategy {
        self.classifier.classify(url).unwrap_or(Strategy::Generic)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationRule for ContainsRule {
    fn classify(&self, url: &Url) -> Option<Strategy> {
        let test_str = url.as_str();
        if self.patterns.iter().all(|p| test_str.contains(p)) {
            return Some(self.strategy);
        }
        None
    }
}

struct URLClassifier {
    rules: Vec<Box<dyn ClassificationRule>>,
}

impl fmt::Debug for URLClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("URLClassifier")
            .field("rules_count", &self.rules.len())
            .finish()
    }
}

impl URLClassifier {
    fn new() -> Self {
        URLClassifier { rules: Vec::new() }
    }

    fn add_rule(&mut self, rule: Box<dyn ClassificationRule>) {
        self.rules.push(rule);
    }

    fn classify(&self, url: &Url) -> Option<Strategy> {
        for rule in &self.rules {
            if let Some(strategy) = rule.classify(url) {
                return Some(strategy);
            }
        }
        None
    }
}
