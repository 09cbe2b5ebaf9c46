use std::{
    fs,
    io::{self, BufRead},
    path,
};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
    #[error("Line parsing error: {0}")]
    LineParse(String),
    #[error("Missing config field: {0}")]
    Missing(String),
    #[error("Invalid config field {field}: {reason}")]
    Invalid { field: String, reason: String },
}

pub trait Configurable {
    fn config(&self) -> &serde_yaml::Value;

    // read configuration from yaml config
    fn load_config(
        config_file_path: impl AsRef<path::Path>,
    ) -> Result<serde_yaml::Value, ConfigError> {
        let content: String = fs::read_to_string(config_file_path)?;
        let config: serde_yaml::Value = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load Vec<String> from file with path `file path`
    fn load_text_file_lines(
        file_path: impl AsRef<path::Path>,
    ) -> Result<Vec<String>, ConfigError> {
        let file = fs::File::open(file_path)?;
        let lines = io::BufReader::new(file)
            .lines()
            .map(|l| l.map_err(|e| ConfigError::LineParse(e.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines)
    }

    /// Extract Value from config using dot notation i.e. "worker.origin"
    fn get_config_value(&self, key: &str) -> Option<&serde_yaml::Value> {
        let keys: Vec<&str> = key.split('.').collect();
        get_value_recursive(self.config(), &keys)
    }

    /// Like `get_config_value`, but the value must be a string.
    fn require_str(&self, key: &str) -> Result<&str, ConfigError> {
        self.get_config_value(key)
            .ok_or_else(|| ConfigError::Missing(key.to_string()))?
            .as_str()
            .ok_or_else(|| ConfigError::Invalid {
                field: key.to_string(),
                reason: "expected a string".to_string(),
            })
    }
}

/// Walk a YAML mapping by a list of keys.
pub fn get_value_recursive<'a>(
    config: &'a serde_yaml::Value,
    keys: &[&str],
) -> Option<&'a serde_yaml::Value> {
    if keys.is_empty() {
        return None;
    };

    match config {
        serde_yaml::Value::Mapping(map) => {
            let key = keys[0];
            let remaining_keys = &keys[1..];

            if let Some(value) = map.get(serde_yaml::Value::String(key.to_string()))
            {
                if remaining_keys.is_empty() {
                    Some(value)
                } else {
                    get_value_recursive(value, remaining_keys)
                }
            } else {
                None
            }
        }
        _ => None,
    }
}
