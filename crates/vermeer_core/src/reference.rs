//! Caller-supplied pointers to reference images.

use serde::{Deserialize, Serialize};

/// Where a reference image lives.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssetKind {
    /// Object storage URI such as `gs://bucket/key`
    ObjectStorage,
    /// Anything else, fetched over HTTP(S) after validation
    Http,
}

/// A reference image as supplied by the caller.
///
/// # Examples
///
/// ```
/// use vermeer_core::{AssetKind, AssetReference};
///
/// let schemes = ["gs".to_string(), "s3".to_string()];
/// let gcs = AssetReference::classify("gs://bucket/char.png", &schemes);
/// assert_eq!(gcs.kind(), AssetKind::ObjectStorage);
///
/// let web = AssetReference::classify("https://example.com/a.png", &schemes);
/// assert_eq!(web.kind(), AssetKind::Http);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetReference {
    source_uri: String,
    kind: AssetKind,
}

impl AssetReference {
    /// Classify `source_uri` by its scheme prefix.
    ///
    /// A URI is object storage when it starts with `<scheme>://` for one of
    /// `object_storage_schemes`, compared case-insensitively.
    pub fn classify(source_uri: impl Into<String>, object_storage_schemes: &[String]) -> Self {
        let source_uri = source_uri.into();
        let kind = match source_uri.split_once("://") {
            Some((scheme, _))
                if object_storage_schemes
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(scheme)) =>
            {
                AssetKind::ObjectStorage
            }
            _ => AssetKind::Http,
        };
        Self { source_uri, kind }
    }

    /// The URI exactly as the caller supplied it.
    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    /// How the bytes are fetched.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Whether the reference lives in object storage.
    pub fn is_object_storage(&self) -> bool {
        self.kind == AssetKind::ObjectStorage
    }

    /// Final path segment, used as a display name when registering remotely.
    pub fn file_name(&self) -> &str {
        let without_query = self
            .source_uri
            .split(['?', '#'])
            .next()
            .unwrap_or(&self.source_uri);
        without_query
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(without_query)
    }
}
