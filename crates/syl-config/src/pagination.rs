//! Page sizes for the per-kind tables.

use serde::{Deserialize, Serialize};
use syl_core::enums::EntityKind;

use crate::ConfigError;

const fn default_page_size() -> usize {
    10
}

/// Page size applied to every kind, with optional per-kind overrides.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    #[serde(default)]
    pub years: Option<usize>,
    #[serde(default)]
    pub categories: Option<usize>,
    #[serde(default)]
    pub subject_names: Option<usize>,
    #[serde(default)]
    pub subjects: Option<usize>,
    #[serde(default)]
    pub terms: Option<usize>,
    #[serde(default)]
    pub weeks: Option<usize>,
    #[serde(default)]
    pub lessons: Option<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            years: None,
            categories: None,
            subject_names: None,
            subjects: None,
            terms: None,
            weeks: None,
            lessons: None,
        }
    }
}

impl PaginationConfig {
    /// Effective page size for one kind.
    #[must_use]
    pub fn page_size(&self, kind: EntityKind) -> usize {
        self.override_for(kind).unwrap_or(self.default_page_size)
    }

    const fn override_for(&self, kind: EntityKind) -> Option<usize> {
        match kind {
            EntityKind::Year => self.years,
            EntityKind::Category => self.categories,
            EntityKind::SubjectName => self.subject_names,
            EntityKind::Subject => self.subjects,
            EntityKind::Term => self.terms,
            EntityKind::Week => self.weeks,
            EntityKind::Lesson => self.lessons,
        }
    }

    /// Reject zero page sizes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.default_page_size".into(),
                reason: "must be at least 1".into(),
            });
        }
        for kind in EntityKind::ALL {
            if self.override_for(kind) == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: format!("pagination.{}", section_key(kind)),
                    reason: "must be at least 1".into(),
                });
            }
        }
        Ok(())
    }
}

const fn section_key(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Year => "years",
        EntityKind::Category => "categories",
        EntityKind::SubjectName => "subject_names",
        EntityKind::Subject => "subjects",
        EntityKind::Term => "terms",
        EntityKind::Week => "weeks",
        EntityKind::Lesson => "lessons",
    }
}
