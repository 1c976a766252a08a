//! Configuration management for the mushroom inference service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Which request surface the server exposes.
///
/// `Validated` enforces field types, numeric ranges and the cap-shape
/// enumeration before normalization. `Naive` accepts loosely-typed input
/// and defers correctness to the normalizer and model.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceVariant {
    #[default]
    Validated,
    Naive,
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Request surface variant to serve
    #[serde(default)]
    pub surface: SurfaceVariant,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// Directory containing preprocessor.onnx, classifier.onnx and schema.json
    pub dir: String,
    /// Number of intra-op threads per ONNX session (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_onnx_threads() -> usize {
    1
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from the default file location
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                surface: SurfaceVariant::Validated,
            },
            artifacts: ArtifactConfig {
                dir: "models/artifacts".to_string(),
                onnx_threads: 1,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.surface, SurfaceVariant::Validated);
        assert_eq!(config.artifacts.dir, "models/artifacts");
        assert_eq!(config.artifacts.onnx_threads, 1);
    }

    #[test]
    fn test_surface_variant_deserialization() {
        let naive: SurfaceVariant = serde_json::from_str("\"naive\"").unwrap();
        assert_eq!(naive, SurfaceVariant::Naive);

        let validated: SurfaceVariant = serde_json::from_str("\"validated\"").unwrap();
        assert_eq!(validated, SurfaceVariant::Validated);

        assert!(serde_json::from_str::<SurfaceVariant>("\"strict\"").is_err());
    }
}
