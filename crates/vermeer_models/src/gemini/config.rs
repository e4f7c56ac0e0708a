//! Gemini client settings.

use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// Settings for [`crate::GeminiClient`].
///
/// # Examples
///
/// ```
/// use vermeer_models::GeminiConfig;
///
/// let config = GeminiConfig::default().with_max_retries(1);
/// assert_eq!(config.api_key_env(), "GEMINI_API_KEY");
/// assert_eq!(*config.max_retries(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct GeminiConfig {
    /// Model used for generation
    #[serde(default = "default_model")]
    model: String,
    /// API root, without version segment
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    api_key_env: String,
    /// Retries for transient failures
    #[serde(default = "default_max_retries")]
    max_retries: usize,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_max_retries() -> usize {
    3
}

fn default_timeout_secs() -> u64 {
    120
}
