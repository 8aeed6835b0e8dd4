//! Configuration management for taggr.
//!
//! Configuration is loaded from a TOML file in the platform config
//! directory with sensible defaults, so the CLI can run without flags
//! once the model and vocabulary locations are set.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Root configuration structure for taggr.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model artifact settings
    pub model: ModelConfig,

    /// Tag vocabulary settings
    pub vocabulary: VocabularyConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Model artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the ONNX tagger model
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("~/.taggr/model.onnx"),
        }
    }
}

/// Tag vocabulary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Path to the tag metadata CSV (name, category, best_threshold)
    pub tags: PathBuf,

    /// Path to the output-map JSON listing tag names in model output order
    pub labels: PathBuf,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            tags: PathBuf::from("~/.taggr/selected_tags.csv"),
            labels: PathBuf::from("~/.taggr/config.json"),
        }
    }
}

/// Resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum image width or height in pixels
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_image_dimension: 16384,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories, falling back to
    /// `~/.taggr/config.toml` if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "taggr", "taggr")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".taggr").join("config.toml")
            })
    }

    /// Get the resolved model path (with ~ expansion).
    pub fn model_path(&self) -> PathBuf {
        expand(&self.model.path)
    }

    /// Get the resolved tag metadata CSV path (with ~ expansion).
    pub fn tags_path(&self) -> PathBuf {
        expand(&self.vocabulary.tags)
    }

    /// Get the resolved output-map JSON path (with ~ expansion).
    pub fn labels_path(&self) -> PathBuf {
        expand(&self.vocabulary.labels)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be greater than 0".to_string(),
            ));
        }
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown logging.level {other:?}"
                )));
            }
        }
        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::tilde(&raw);
    PathBuf::from(expanded.into_owned())
}
