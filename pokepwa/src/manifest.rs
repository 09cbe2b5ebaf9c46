//! The critical-asset manifest: an ordered, non-empty list of paths that make
//! up the app shell. The list itself is produced by the build; this module only
//! reads and resolves it.
use thiserror::Error;
use url::Url;

/// App shell files cached at install time when no manifest file is configured.
pub const CRITICAL_ASSETS: &[&str] = &[
    "/",
    "/static/js/bundle.js",
    "/static/css/main.css",
    "/manifest.json",
    "/favicon.ico",
    "/index.html",
    "/static/media/logo.svg",
];

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Manifest is empty")]
    Empty,
    #[error("Invalid manifest entry {entry}: {source}")]
    InvalidEntry {
        entry: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<String>,
}

impl Manifest {
    pub fn new<I, S>(entries: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if entries.is_empty() {
            return Err(ManifestError::Empty);
        }
        Ok(Self { entries })
    }

    /// Build a manifest from text lines, one path or URL per line. Blank lines
    /// and `#` comments are skipped.
    pub fn from_lines<I, S>(lines: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = lines.into_iter().filter_map(|line| {
            let line = line.as_ref().trim();
            (!line.is_empty() && !line.starts_with('#')).then(|| line.to_string())
        });
        Self::new(entries)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every entry against the worker origin, keeping order. Absolute
    /// URLs pass through unchanged.
    pub fn resolve(&self, origin: &Url) -> Result<Vec<Url>, ManifestError> {
        self.entries
            .iter()
            .map(|entry| {
                origin
                    .join(entry)
                    .map_err(|source| ManifestError::InvalidEntry {
                        entry: entry.clone(),
                        source,
                    })
            })
            .collect()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            entries: CRITICAL_ASSETS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("http://localhost:3000/").unwrap()
    }

    #[test]
    fn test_default_manifest() {
        let manifest = Manifest::default();
        assert_eq!(manifest.len(), 7);
        assert_eq!(manifest.entries()[0], "/");
        assert_eq!(manifest.entries()[6], "/static/media/logo.svg");
    }

    #[test]
    fn test_empty_manifest_rejected() {
        assert!(matches!(
            Manifest::new(Vec::<String>::new()),
            Err(ManifestError::Empty)
        ));
        assert!(matches!(
            Manifest::from_lines(["", "# nothing here", "   "]),
            Err(ManifestError::Empty)
        ));
    }

    #[test]
    fn test_from_lines_skips_comments_and_blanks() {
        let manifest =
            Manifest::from_lines(["# shell", "/", "", "  /index.html  ", "/favicon.ico"])
                .unwrap();
        assert_eq!(manifest.entries(), ["/", "/index.html", "/favicon.ico"]);
    }

    #[test]
    fn test_resolve_against_origin() {
        let manifest =
            Manifest::new(["/", "static/app.js", "https://cdn.example.com/font.woff2"])
                .unwrap();
        let urls = manifest.resolve(&origin()).unwrap();

        assert_eq!(urls[0].as_str(), "http://localhost:3000/");
        assert_eq!(urls[1].as_str(), "http://localhost:3000/static/app.js");
        assert_eq!(urls[2].as_str(), "https://cdn.example.com/font.woff2");
    }

    #[test]
    fn test_resolve_invalid_entry() {
        let manifest = Manifest::new(["http://[bad"]).unwrap();
        assert!(matches!(
            manifest.resolve(&origin()),
            Err(ManifestError::InvalidEntry { .. })
        ));
    }
}
