//! Category update builder.

use serde::Serialize;
use syl_core::drafts::CategoryDraft;
use syl_core::entities::Category;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Option<String>>,
}

impl CategoryUpdate {
    #[must_use]
    pub fn from_draft(draft: &CategoryDraft) -> Self {
        Self {
            name: Some(draft.name.trim().to_string()),
            description: Some(draft.description.clone()),
            color: Some(draft.color.clone()),
        }
    }

    pub fn apply(&self, category: &mut Category) {
        if let Some(ref name) = self.name {
            category.name.clone_from(name);
        }
        if let Some(ref description) = self.description {
            category.description.clone_from(description);
        }
        if let Some(ref color) = self.color {
            category.color.clone_from(color);
        }
    }
}

#[derive(Debug, Default)]
pub struct CategoryUpdateBuilder(CategoryUpdate);

impl CategoryUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(CategoryUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    #[must_use]
    pub fn description(mut self, val: impl Into<String>) -> Self {
        self.0.description = Some(val.into());
        self
    }

    #[must_use]
    pub fn color(mut self, val: Option<String>) -> Self {
        self.0.color = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> CategoryUpdate {
        self.0
    }
}
