//! Pipeline configuration.

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pre-transmission JPEG compression settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct CompressionConfig {
    /// Whether fetched images are re-encoded as JPEG before use
    #[serde(default)]
    enabled: bool,
    /// JPEG quality, 1 to 100
    #[serde(default = "default_quality")]
    quality: u8,
}

impl CompressionConfig {
    /// Compression turned on at `quality`, clamped to 1..=100.
    pub fn enabled_with_quality(quality: u8) -> Self {
        Self {
            enabled: true,
            quality: quality.clamp(1, 100),
        }
    }

    /// Quality clamped to the valid JPEG range.
    pub fn effective_quality(&self) -> u8 {
        self.quality.clamp(1, 100)
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            quality: default_quality(),
        }
    }
}

fn default_quality() -> u8 {
    75
}

/// URL validation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct ValidatorConfig {
    /// Schemes accepted for network fetches
    #[serde(default = "default_allowed_schemes")]
    allowed_schemes: Vec<String>,
    /// Schemes treated as object storage and exempt from network checks
    #[serde(default = "default_object_storage_schemes")]
    object_storage_schemes: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            allowed_schemes: default_allowed_schemes(),
            object_storage_schemes: default_object_storage_schemes(),
        }
    }
}

fn default_allowed_schemes() -> Vec<String> {
    vec!["http".to_string(), "https".to_string()]
}

fn default_object_storage_schemes() -> Vec<String> {
    vec!["gs".to_string(), "s3".to_string()]
}

/// HTTP fetch limits for [`crate::ReqwestFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct FetchConfig {
    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    /// Largest accepted payload in bytes
    #[serde(default = "default_max_bytes")]
    max_bytes: usize,
}

impl FetchConfig {
    /// Timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_bytes: default_max_bytes(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_bytes() -> usize {
    20 * 1024 * 1024
}

/// Settings for [`crate::AssetPipeline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct PipelineConfig {
    /// TTL for both cache namespaces
    #[serde(default = "default_cache_ttl_secs")]
    cache_ttl_secs: u64,
    /// Compression settings
    #[serde(default)]
    compression: CompressionConfig,
    /// URL validation settings
    #[serde(default)]
    validator: ValidatorConfig,
}

impl PipelineConfig {
    /// Cache TTL as a duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_cache_ttl_secs(),
            compression: CompressionConfig::default(),
            validator: ValidatorConfig::default(),
        }
    }
}

fn default_cache_ttl_secs() -> u64 {
    3600
}
