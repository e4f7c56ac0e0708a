//! Error types for the Vermeer image generation toolkit.
//!
//! Each concern owns a `*Error` struct that records where it was raised and a
//! `*ErrorKind` enum that callers match on. [`VermeerError`] aggregates them
//! for the facade crate.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod asset;
mod config;
mod generation;
mod http;
mod interrupt;
mod remote;
mod storage;

pub use asset::{AssetError, AssetErrorKind, AssetResult};
pub use config::ConfigError;
pub use generation::{GenerationError, GenerationErrorKind, GenerationResult};
pub use http::HttpError;
pub use interrupt::Interrupted;
pub use remote::{RemoteError, RemoteErrorKind, RetryableError};
pub use storage::{StorageError, StorageErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum VermeerErrorKind {
    /// Asset acquisition or registration error
    Asset(AssetError),
    /// Response interpretation error
    Generation(GenerationError),
    /// HTTP fetch error
    Http(HttpError),
    /// Object storage error
    Storage(StorageError),
    /// Remote service error
    Remote(RemoteError),
    /// Configuration error
    Config(ConfigError),
}

impl std::fmt::Display for VermeerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VermeerErrorKind::Asset(e) => write!(f, "{}", e),
            VermeerErrorKind::Generation(e) => write!(f, "{}", e),
            VermeerErrorKind::Http(e) => write!(f, "{}", e),
            VermeerErrorKind::Storage(e) => write!(f, "{}", e),
            VermeerErrorKind::Remote(e) => write!(f, "{}", e),
            VermeerErrorKind::Config(e) => write!(f, "{}", e),
        }
    }
}

/// Vermeer error with kind discrimination.
#[derive(Debug)]
pub struct VermeerError(Box<VermeerErrorKind>);

impl VermeerError {
    /// Create a new error from a kind.
    pub fn new(kind: VermeerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VermeerErrorKind {
        &self.0
    }
}

impl std::fmt::Display for VermeerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vermeer Error: {}", self.0)
    }
}

impl std::error::Error for VermeerError {}

impl<T> From<T> for VermeerError
where
    T: Into<VermeerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Vermeer operations.
pub type VermeerResult<T> = std::result::Result<T, VermeerError>;
