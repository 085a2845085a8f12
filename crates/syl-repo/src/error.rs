//! Repository error types for syl-repo.

use syl_core::Id;
use syl_core::enums::EntityKind;
use thiserror::Error;

/// Errors from content repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The addressed record does not exist.
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Id },

    /// A payload references a parent record that does not exist.
    #[error("{kind} {id} referenced by the payload does not exist")]
    MissingParent { kind: EntityKind, id: Id },

    /// The operation would leave the content inconsistent.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The payload is missing a field or carries an out-of-range value.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The operation does not exist for this kind (e.g. listing years by parent).
    #[error("{operation} is not supported for {kind}")]
    Unsupported {
        operation: &'static str,
        kind: EntityKind,
    },

    /// The backend could not be reached.
    #[error("Content repository unavailable: {0}")]
    Unavailable(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
