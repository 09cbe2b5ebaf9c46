//! Worker settings read from the `worker:` section of a YAML config.
//!
//! ```yaml
//! worker:
//!     origin: http://localhost:3000/
//!     version: v4
//!     fallback_icon: /favicon.ico
//!     manifest_file: ./manifest.txt
//! ```
use crate::{ConfigError, Configurable};
use std::path::PathBuf;
use tracing::debug;
use url::Url;

pub const DEFAULT_VERSION: &str = "v4";
pub const DEFAULT_FALLBACK_ICON: &str = "/favicon.ico";

#[derive(Debug, Clone, PartialEq)]
pub struct WorkerSettings {
    /// Origin the worker is installed on; relative manifest paths and the
    /// navigation/icon fallbacks resolve against it.
    pub origin: Url,
    pub version: String,
    pub fallback_icon: String,
    pub manifest_file: Option<PathBuf>,
}

impl WorkerSettings {
    pub fn from_config<C: Configurable>(app: &C) -> Result<Self, ConfigError> {
        let origin_str = app.require_str("worker.origin")?;
        let origin = Url::parse(origin_str).map_err(|e| ConfigError::Invalid {
            field: "worker.origin".to_string(),
            reason: e.to_string(),
        })?;

        let version = optional_str(app, "worker.version")?
            .unwrap_or(DEFAULT_VERSION)
            .to_string();
        let fallback_icon = optional_str(app, "worker.fallback_icon")?
            .unwrap_or(DEFAULT_FALLBACK_ICON)
            .to_string();
        let manifest_file = optional_str(app, "worker.manifest_file")?.map(PathBuf::from);
        debug!("Loaded worker settings for {} ({})", origin, version);

        Ok(Self {
            origin,
            version,
            fallback_icon,
            manifest_file,
        })
    }

    /// Manifest lines from `manifest_file`, if one is configured.
    pub fn manifest_lines<C: Configurable>(
        &self,
    ) -> Result<Option<Vec<String>>, ConfigError> {
        self.manifest_file
            .as_ref()
            .map(|path| C::load_text_file_lines(path))
            .transpose()
    }
}

fn optional_str<'a, C: Configurable>(
    app: &'a C,
    key: &str,
) -> Result<Option<&'a str>, ConfigError> {
    match app.get_config_value(key) {
        None => Ok(None),
        Some(_) => app.require_str(key).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct App(serde_yaml::Value);

    impl Configurable for App {
        fn config(&self) -> &serde_yaml::Value {
            &self.0
        }
    }

    fn app(yaml: &str) -> App {
        App(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_settings_from_fixture() {
        let app = App(App::load_config("../tests/simple_config.yml").unwrap());
        let settings = WorkerSettings::from_config(&app).unwrap();

        assert_eq!(settings.origin.as_str(), "http://localhost:3000/");
        assert_eq!(settings.version, "v4");
        assert_eq!(settings.fallback_icon, "/favicon.ico");

        let lines = settings.manifest_lines::<App>().unwrap().unwrap();
        assert!(lines.contains(&"/static/js/bundle.js".to_string()));
    }

    #[test]
    fn test_settings_defaults() {
        let settings =
            WorkerSettings::from_config(&app("worker:\n  origin: https://pwa.example/\n"))
                .unwrap();

        assert_eq!(settings.version, DEFAULT_VERSION);
        assert_eq!(settings.fallback_icon, DEFAULT_FALLBACK_ICON);
        assert_eq!(settings.manifest_file, None);
        assert_eq!(settings.manifest_lines::<App>().unwrap(), None);
    }

    #[test]
    fn test_settings_missing_origin() {
        let result = WorkerSettings::from_config(&app("worker:\n  version: v5\n"));
        assert!(matches!(result, Err(ConfigError::Missing(field)) if field == "worker.origin"));
    }

    #[test]
    fn test_settings_invalid_origin() {
        let result = WorkerSettings::from_config(&app("worker:\n  origin: not a url\n"));
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }
}
