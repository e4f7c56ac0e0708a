//! Interpreted generation results.

use serde::{Deserialize, Serialize};

/// The image extracted from a generation response.
///
/// `used_seed` echoes the caller's requested seed at full width, even though
/// the outbound request carried a narrowed copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOutput {
    /// Image bytes as returned by the service
    pub data: Vec<u8>,
    /// MIME type declared by the service
    pub mime_type: String,
    /// Seed the caller requested
    pub used_seed: i64,
}
