//! Cancellation and deadline interruptions.

/// Why a blocking collaborator call stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Interrupted {
    /// The caller cancelled the request
    #[display("request cancelled")]
    Cancelled,
    /// The request deadline passed
    #[display("deadline exceeded")]
    DeadlineExceeded,
}
