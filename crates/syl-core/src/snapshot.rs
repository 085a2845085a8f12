//! Bulk snapshot of every entity collection.
//!
//! A full reload yields one snapshot; the JSON fixture files read by `syl`
//! use the same shape.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Category, Lesson, Subject, SubjectName, Term, Week, Year};
use crate::enums::EntityKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub years: Vec<Year>,
    pub categories: Vec<Category>,
    pub subject_names: Vec<SubjectName>,
    pub subjects: Vec<Subject>,
    pub terms: Vec<Term>,
    pub weeks: Vec<Week>,
    pub lessons: Vec<Lesson>,
}

impl Snapshot {
    /// Number of entities of one kind.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Year => self.years.len(),
            EntityKind::Category => self.categories.len(),
            EntityKind::SubjectName => self.subject_names.len(),
            EntityKind::Subject => self.subjects.len(),
            EntityKind::Term => self.terms.len(),
            EntityKind::Week => self.weeks.len(),
            EntityKind::Lesson => self.lessons.len(),
        }
    }

    /// Total number of entities across all kinds.
    #[must_use]
    pub fn total(&self) -> usize {
        EntityKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }
}
