//! Values held by the asset cache.

use serde::{Deserialize, Serialize};
use vermeer_core::RemoteHandle;

/// Key prefix for fetched bytes.
pub const BYTES_PREFIX: &str = "asset_bytes:";

/// Key prefix for remote registrations.
pub const HANDLE_PREFIX: &str = "asset_handle:";

/// Cache key for the bytes fetched from `source_uri`.
pub fn bytes_key(source_uri: &str) -> String {
    format!("{BYTES_PREFIX}{source_uri}")
}

/// Cache key for the registration of `source_uri`.
pub fn handle_key(source_uri: &str) -> String {
    format!("{HANDLE_PREFIX}{source_uri}")
}

/// A cached value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheValue {
    /// Bytes as they will be sent inline (after optional compression)
    Bytes(Vec<u8>),
    /// Remote registration for a source URI
    Handle(RemoteHandle),
}

impl CacheValue {
    /// Short name of the variant, for logging.
    pub fn variant_name(&self) -> &'static str {
        match self {
            CacheValue::Bytes(_) => "bytes",
            CacheValue::Handle(_) => "handle",
        }
    }
}
