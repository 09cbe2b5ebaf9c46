//! The three cache partitions and their versioned names.
//!
//! Bumping a version token here is the only invalidation mechanism: on the
//! next activation every partition with a different name is deleted.
use std::fmt;

pub const CRITICAL_ASSETS_CACHE: &str = "pokepwa-v4";
pub const API_CACHE: &str = "pokepwa-api-v4";
pub const IMAGE_CACHE: &str = "pokepwa-images-v3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// App shell files populated at install time.
    CriticalAssets,
    /// Upstream data API responses.
    ApiResponses,
    /// Sprite images.
    ImageAssets,
}

impl Partition {
    pub const ALL: [Partition; 3] = [
        Partition::CriticalAssets,
        Partition::ApiResponses,
        Partition::ImageAssets,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Partition::CriticalAssets => CRITICAL_ASSETS_CACHE,
            Partition::ApiResponses => API_CACHE,
            Partition::ImageAssets => IMAGE_CACHE,
        }
    }

    /// True when `name` is one of the current partition names.
    pub fn is_current(name: &str) -> bool {
        Self::ALL.iter().any(|p| p.name() == name)
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_distinct() {
        let names: std::collections::HashSet<_> =
            Partition::ALL.iter().map(|p| p.name()).collect();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_is_current() {
        assert!(Partition::is_current("pokepwa-v4"));
        assert!(Partition::is_current("pokepwa-api-v4"));
        assert!(Partition::is_current("pokepwa-images-v3"));
        assert!(!Partition::is_current("pokepwa-v3"));
        assert!(!Partition::is_current("pokepwa-images-v2"));
        assert!(!Partition::is_current(""));
    }
}
