//! Configuration for the pdfops operations.

use serde::{Deserialize, Serialize};

use crate::ops::Quality;

/// Main configuration, loaded from a JSON file via `--config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpsConfig {
    /// Compression configuration.
    pub compress: CompressConfig,

    /// Image extraction configuration.
    pub images: ImagesConfig,
}

impl Default for OpsConfig {
    fn default() -> Self {
        Self {
            compress: CompressConfig::default(),
            images: ImagesConfig::default(),
        }
    }
}

/// Compression configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressConfig {
    /// Quality level used when `--quality` is not given.
    pub default_quality: Quality,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            default_quality: Quality::Medium,
        }
    }
}

/// Image extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Skip images whose width and height are both below this many
    /// pixels (0 keeps everything).
    pub min_size: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self { min_size: 0 }
    }
}

impl OpsConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_quality_is_medium() {
        let config = OpsConfig::default();
        assert_eq!(config.compress.default_quality, Quality::Medium);
        assert_eq!(config.images.min_size, 0);
    }

    #[test]
    fn round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = OpsConfig::default();
        config.compress.default_quality = Quality::Low;
        config.images.min_size = 16;
        config.save(&path).unwrap();

        let loaded = OpsConfig::from_file(&path).unwrap();
        assert_eq!(loaded.compress.default_quality, Quality::Low);
        assert_eq!(loaded.images.min_size, 16);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: OpsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.compress.default_quality, Quality::Medium);
    }
}
