//! Service configuration loaded from `config.json`.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Canvas instance coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Host name of the Canvas instance, e.g. `canvas.kth.se`.
    pub host: String,
    /// API access token used as the Bearer credential.
    pub access_token: String,
}

/// LTI consumer credentials shared with Canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LtiConfig {
    #[serde(default = "default_consumer_key")]
    pub consumer_key: String,
    #[serde(default = "default_consumer_secret")]
    pub consumer_secret: String,
}

fn default_consumer_key() -> String {
    "test".to_string()
}

fn default_consumer_secret() -> String {
    "secret".to_string()
}

impl Default for LtiConfig {
    fn default() -> Self {
        Self {
            consumer_key: default_consumer_key(),
            consumer_secret: default_consumer_secret(),
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub lti: LtiConfig,
}

impl ServiceConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text)
            .map_err(|e| crate::Error::config(format!("cannot parse {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_canvas_section_and_defaults_lti() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(
            br#"{"canvas": {"host": "canvas.example.com", "access_token": "tok-123"}}"#,
        )
        .unwrap();

        let config = ServiceConfig::load(&path).unwrap();
        assert_eq!(config.canvas.host, "canvas.example.com");
        assert_eq!(config.canvas.access_token, "tok-123");
        assert_eq!(config.lti.consumer_key, "test");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = ServiceConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, crate::Error::Config { .. }));
    }
}
