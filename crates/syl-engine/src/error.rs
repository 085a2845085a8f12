//! Error types for syl-engine.

use syl_core::errors::CoreError;
use syl_repo::RepositoryError;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors from the workbench mutation surface.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// The open form failed validation; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The repository call failed. The sink has already been told.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Lookup or state-machine failure before any repository call.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A form operation was requested with no form open.
    #[error("No form is open")]
    NoOpenForm,

    /// The user declined the delete confirmation.
    #[error("Delete cancelled")]
    DeleteCancelled,
}

impl From<ValidationErrors> for WorkbenchError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
