//! Persistent settings for roisync
//!
//! Stored as JSON under the user's config directory.

use std::fs;
use std::path::{Path, PathBuf};

use roisync_core::EncodeOptions;
use roisync_geometry::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest request body sent in one add request
pub const DEFAULT_MAX_BODY_SIZE: usize = 10_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub max_body_size_bytes: usize,
    /// Fill areal shapes with a translucent stroke colour
    pub fill_shapes: bool,
    /// Stroke colour for objects that have none
    pub default_color: Rgba,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_body_size_bytes: DEFAULT_MAX_BODY_SIZE,
            fill_shapes: false,
            default_color: Rgba::opaque(255, 0, 0),
        }
    }
}

impl SyncConfig {
    /// Load from the default location, falling back to defaults if absent
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_size_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_body_size_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Default config file location
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".config")
            });
        config_dir.join("roisync").join("config.json")
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            fill_shapes: self.fill_shapes,
            default_color: self.default_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = SyncConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, SyncConfig::default());
        assert_eq!(config.max_body_size_bytes, 10_000_000);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"fill_shapes": true}"#).unwrap();

        let config = SyncConfig::load_from(&path).unwrap();
        assert!(config.fill_shapes);
        assert_eq!(config.max_body_size_bytes, DEFAULT_MAX_BODY_SIZE);
        assert_eq!(config.default_color, Rgba::opaque(255, 0, 0));
    }

    #[test]
    fn zero_body_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"max_body_size_bytes": 0}"#).unwrap();
        assert!(matches!(SyncConfig::load_from(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn broken_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(SyncConfig::load_from(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = SyncConfig {
            max_body_size_bytes: 2048,
            fill_shapes: true,
            default_color: Rgba::new(1, 2, 3, 4),
        };
        config.save_to(&path).unwrap();
        assert_eq!(SyncConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn encode_options_follow_config() {
        let config = SyncConfig {
            fill_shapes: true,
            ..SyncConfig::default()
        };
        let options = config.encode_options();
        assert!(options.fill_shapes);
        assert_eq!(options.default_color, Rgba::opaque(255, 0, 0));
    }
}
