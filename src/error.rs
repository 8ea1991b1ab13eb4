//! Failure taxonomy shared by every fallible contact-sheet operation.

/// Errors surfaced by contact-sheet operations.
///
/// No variant is fatal to the process; every failure is scoped to the
/// request that produced it. A duplicate in-flight request is not an error:
/// the second caller silently joins the pending operation and receives the
/// same eventual result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetError {
    /// An operation requiring a backend round trip was attempted while no
    /// backend is attached. Surfaced immediately, never retried.
    #[error("no backend attached to this contact sheet")]
    NoBackend,

    /// The caller passed a value outside the accepted domain. State is left
    /// unchanged.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A lookup or navigation target is not part of the collection.
    #[error("media not found in this contact sheet")]
    NotFound,

    /// The backend reported a failure for this specific operation, or went
    /// away before answering. Local state is untouched; membership and
    /// order only ever change on confirmed backend success.
    #[error("backend operation failed: {0}")]
    BackendFailure(String),
}
