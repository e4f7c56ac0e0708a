//! Response interpretation error types.

use crate::Interrupted;

/// Specific error conditions when interpreting a generation response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The primary candidate stopped for a reason other than normal completion
    #[display("Generation halted with finish reason: {}", _0)]
    GenerationHalted(String),
    /// No candidates, or no image content in the primary candidate
    #[display("Empty response: {}", _0)]
    EmptyResponse(String),
    /// The remote generation call itself failed
    #[display("Remote call failed: {}", _0)]
    Remote(String),
    /// The generation call was cancelled or ran past its deadline
    #[display("Interrupted: {}", _0)]
    Interrupted(Interrupted),
}

/// Generation error with location tracking.
///
/// # Examples
///
/// ```
/// use vermeer_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::GenerationHalted("SAFETY".to_string()));
/// assert!(format!("{}", err).contains("SAFETY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GenerationErrorKind {
        &self.kind
    }
}

impl From<Interrupted> for GenerationError {
    #[track_caller]
    fn from(reason: Interrupted) -> Self {
        Self::new(GenerationErrorKind::Interrupted(reason))
    }
}

/// Result type for response interpretation.
pub type GenerationResult<T> = Result<T, GenerationError>;
