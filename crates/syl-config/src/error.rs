//! Errors raised while loading syllabus settings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or `SYLLABUS_*` variable could not be merged or extracted.
    #[error("Could not load syllabus settings: {0}")]
    Figment(#[from] figment::Error),

    /// A setting parsed but is out of range, e.g. a zero page size.
    #[error("Setting '{field}' is out of range: {reason}")]
    InvalidValue { field: String, reason: String },
}
