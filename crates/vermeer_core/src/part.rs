//! Request fragments sent to the remote generative service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One fragment of a generation request.
///
/// The order of parts in a request is significant to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Part {
    /// Instruction text.
    Text(String),

    /// Image bytes carried directly in the request.
    InlineImage {
        /// Sniffed MIME type, always `image/*`
        mime_type: String,
        /// Raw image bytes
        data: Vec<u8>,
    },

    /// A file previously registered with the remote asset store.
    RemoteHandle {
        /// Externally usable handle URI
        uri: String,
        /// MIME type recorded at registration, if known
        mime_type: Option<String>,
    },
}

impl Part {
    /// Whether this part carries an image, inline or by handle.
    pub fn is_image(&self) -> bool {
        !matches!(self, Part::Text(_))
    }
}

/// A registration with the remote asset store.
///
/// Stored as a single cache entry so the handle URI and the deletion name
/// always expire together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RemoteHandle {
    /// Externally usable handle URI
    uri: String,
    /// Internal name required for deletion
    name: String,
    /// MIME type of the uploaded bytes
    mime_type: String,
    /// When the registration stops being trusted
    expires_at: DateTime<Utc>,
}

impl RemoteHandle {
    /// Create a handle record.
    pub fn new(
        uri: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            expires_at,
        }
    }

    /// Whether the handle is still usable at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Convert into a request part.
    pub fn to_part(&self) -> Part {
        Part::RemoteHandle {
            uri: self.uri.clone(),
            mime_type: Some(self.mime_type.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_handle_liveness() {
        let now = Utc::now();
        let handle = RemoteHandle::new("https://files/1", "files/1", "image/png", now + Duration::seconds(5));
        assert!(handle.is_live(now));
        assert!(!handle.is_live(now + Duration::seconds(5)));
    }

    #[test]
    fn test_handle_to_part() {
        let handle = RemoteHandle::new("https://files/1", "files/1", "image/png", Utc::now());
        assert_eq!(
            handle.to_part(),
            Part::RemoteHandle {
                uri: "https://files/1".to_string(),
                mime_type: Some("image/png".to_string()),
            }
        );
        assert!(handle.to_part().is_image());
        assert!(!Part::Text("hi".to_string()).is_image());
    }
}
