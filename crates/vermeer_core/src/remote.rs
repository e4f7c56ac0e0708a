//! Traits for the remote generative service.
//!
//! The generation call and the remote asset store are external collaborators;
//! this module fixes the shape the rest of the workspace programs against.

use crate::{GenerateOptions, GenerationResponse, Part};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vermeer_error::RemoteError;

/// A file accepted by the remote asset store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Externally usable handle URI
    pub uri: String,
    /// Internal name used for deletion
    pub name: String,
}

/// Issues generation calls.
#[async_trait]
pub trait RemoteGenerator: Send + Sync {
    /// Generate content from ordered parts.
    async fn generate(
        &self,
        model: &str,
        parts: &[Part],
        options: &GenerateOptions,
    ) -> Result<GenerationResponse, RemoteError>;
}

/// Registers and removes files with the remote asset store.
#[async_trait]
pub trait RemoteAssetStore: Send + Sync {
    /// Upload bytes and return the handle plus the internal name.
    async fn upload(
        &self,
        data: &[u8],
        mime_type: &str,
        display_name: &str,
    ) -> Result<UploadedFile, RemoteError>;

    /// Delete a previously uploaded file by internal name.
    async fn delete(&self, name: &str) -> Result<(), RemoteError>;
}
