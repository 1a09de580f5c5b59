use eventreg_core::ChildId;
use eventreg_storage::StorageError;
use thiserror::Error;

/// Conditions that must hold before a run may start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionViolation {
    #[error("no authenticated parent")]
    Unauthenticated,

    #[error("event id is missing")]
    MissingEvent,

    #[error("selected child {0} is not one of the parent's children")]
    UnknownChild(ChildId),
}

/// Fatal errors. Every per-item failure is reported inside the outcome
/// instead.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Precondition violated: {0}")]
    Precondition(#[from] PreconditionViolation),

    #[error("Failed to load existing registrations: {0}")]
    Storage(#[from] StorageError),
}

impl ReconcileError {
    /// Returns `true` if the caller is not authenticated.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::Precondition(PreconditionViolation::Unauthenticated)
        )
    }
}
