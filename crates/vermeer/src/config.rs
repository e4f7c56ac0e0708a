//! TOML configuration for the whole toolkit.

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};
use vermeer_assets::{CompressionConfig, FetchConfig, PipelineConfig, ValidatorConfig};
use vermeer_cache::MemoryCacheConfig;
use vermeer_error::ConfigError;
use vermeer_models::GeminiConfig;

/// `[cache]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct CacheSettings {
    /// TTL in seconds for fetched bytes and registrations
    #[serde(default = "default_ttl_secs")]
    ttl_secs: u64,
    /// Maximum in-memory entries
    #[serde(default = "default_max_entries")]
    max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_max_entries() -> usize {
    512
}

/// Top-level configuration file.
///
/// Every section and field is optional.
///
/// # Example
///
/// ```toml
/// [cache]
/// ttl_secs = 1800
///
/// [compression]
/// enabled = true
/// quality = 80
///
/// [validator]
/// allowed_schemes = ["https"]
///
/// [gemini]
/// model = "gemini-2.5-flash-image"
/// max_retries = 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct VermeerConfig {
    /// Cache settings
    #[serde(default)]
    cache: CacheSettings,
    /// JPEG compression before upload or inlining
    #[serde(default)]
    compression: CompressionConfig,
    /// URL validation
    #[serde(default)]
    validator: ValidatorConfig,
    /// HTTP fetch limits
    #[serde(default)]
    fetch: FetchConfig,
    /// Remote service
    #[serde(default)]
    gemini: GeminiConfig,
}

impl VermeerConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument]
    pub fn from_file(path: impl AsRef<Path> + std::fmt::Debug) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&contents)?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))
    }

    /// Load `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error only if an existing file is unreadable or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!(path = %path.display(), "No configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Settings for [`vermeer_assets::AssetPipeline`].
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::default()
            .with_cache_ttl_secs(self.cache.ttl_secs)
            .with_compression(self.compression)
            .with_validator(self.validator.clone())
    }

    /// Settings for [`vermeer_cache::MemoryCache`].
    pub fn memory_cache_config(&self) -> MemoryCacheConfig {
        MemoryCacheConfig::default()
            .with_default_ttl_secs(self.cache.ttl_secs)
            .with_max_entries(self.cache.max_entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = VermeerConfig::from_toml("").unwrap();
        assert_eq!(config, VermeerConfig::default());
        assert_eq!(*config.cache().ttl_secs(), 3600);
        assert!(!*config.compression().enabled());
        assert_eq!(config.gemini().api_key_env(), "GEMINI_API_KEY");
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = VermeerConfig::from_toml(
            r#"
            [cache]
            ttl_secs = 60

            [compression]
            enabled = true
            quality = 40

            [validator]
            allowed_schemes = ["https"]

            [fetch]
            max_bytes = 1024

            [gemini]
            model = "custom-model"
            "#,
        )
        .unwrap();

        assert_eq!(*config.cache().ttl_secs(), 60);
        assert_eq!(*config.cache().max_entries(), 512);
        assert_eq!(*config.compression().quality(), 40);
        assert_eq!(config.validator().allowed_schemes(), &vec!["https".to_string()]);
        assert_eq!(
            config.validator().object_storage_schemes(),
            &vec!["gs".to_string(), "s3".to_string()]
        );
        assert_eq!(*config.fetch().max_bytes(), 1024);
        assert_eq!(config.gemini().model(), "custom-model");

        let pipeline = config.pipeline_config();
        assert_eq!(*pipeline.cache_ttl_secs(), 60);
        assert!(*pipeline.compression().enabled());
        assert_eq!(*config.memory_cache_config().default_ttl_secs(), 60);
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = VermeerConfig::from_toml("[cache]\nttl_secs = \"soon\"").unwrap_err();
        assert!(err.message.contains("Failed to parse"));
    }
}
