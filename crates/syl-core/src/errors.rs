//! Cross-cutting error types for syllabus.
//!
//! Domain-specific errors (`ConfigError`, `RepositoryError`, `WorkbenchError`)
//! live in their own crates. Everything converges on `anyhow` in `syl-cli`.

use thiserror::Error;

use crate::entities::Id;
use crate::enums::{EntityKind, LessonStatus};

/// Errors that can be raised by any syllabus crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {kind} {id}")]
    NotFound { kind: EntityKind, id: Id },

    /// A lesson status transition was attempted that is not allowed.
    #[error("Invalid state transition: lesson {id} from {from} to {to}")]
    InvalidTransition {
        id: Id,
        from: LessonStatus,
        to: LessonStatus,
    },

    /// Data failed validation (type, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
