//! Subject name update builder.

use serde::Serialize;
use syl_core::drafts::SubjectNameDraft;
use syl_core::entities::SubjectName;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectNameUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SubjectNameUpdate {
    #[must_use]
    pub fn from_draft(draft: &SubjectNameDraft) -> Self {
        Self {
            name: Some(draft.name.trim().to_string()),
        }
    }

    pub fn apply(&self, subject_name: &mut SubjectName) {
        if let Some(ref name) = self.name {
            subject_name.name.clone_from(name);
        }
    }
}

#[derive(Debug, Default)]
pub struct SubjectNameUpdateBuilder(SubjectNameUpdate);

impl SubjectNameUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(SubjectNameUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    #[must_use]
    pub fn build(self) -> SubjectNameUpdate {
        self.0
    }
}
