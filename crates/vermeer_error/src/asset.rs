//! Asset acquisition and registration error types.

use crate::Interrupted;

/// Specific error conditions for asset handling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum AssetErrorKind {
    /// URL is malformed or points at a restricted network target
    #[display("Rejected reference: {}", _0)]
    RejectedReference(String),
    /// Fetching the bytes or opening the storage object failed
    #[display("Asset unavailable: {}", _0)]
    AssetUnavailable(String),
    /// Bytes do not sniff as an image
    #[display("Unsupported content type: {}", _0)]
    UnsupportedContent(String),
    /// Remote upload or delete call failed
    #[display("Registration failed: {}", _0)]
    RegistrationFailure(String),
    /// No live registration entry exists for the source URI
    #[display("No registered handle for {}", _0)]
    HandleNotFound(String),
    /// The call was cancelled or ran past its deadline
    #[display("Interrupted: {}", _0)]
    Interrupted(Interrupted),
}

impl From<Interrupted> for AssetErrorKind {
    fn from(reason: Interrupted) -> Self {
        AssetErrorKind::Interrupted(reason)
    }
}

/// Asset error with location tracking.
///
/// # Examples
///
/// ```
/// use vermeer_error::{AssetError, AssetErrorKind};
///
/// let err = AssetError::new(AssetErrorKind::HandleNotFound("gs://b/a.png".to_string()));
/// assert!(format!("{}", err).contains("gs://b/a.png"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Asset Error: {} at line {} in {}", kind, line, file)]
pub struct AssetError {
    /// The kind of error that occurred
    pub kind: AssetErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AssetError {
    /// Create a new asset error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AssetErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AssetErrorKind {
        &self.kind
    }
}

impl From<Interrupted> for AssetError {
    #[track_caller]
    fn from(reason: Interrupted) -> Self {
        Self::new(reason.into())
    }
}

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;
