//! Year update builder.

use serde::Serialize;
use syl_core::drafts::YearDraft;
use syl_core::entities::Year;

use super::to_count;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_number: Option<u32>,
}

impl YearUpdate {
    #[must_use]
    pub fn from_draft(draft: &YearDraft) -> Self {
        Self {
            year_number: to_count(draft.year_number),
        }
    }

    pub fn apply(&self, year: &mut Year) {
        if let Some(year_number) = self.year_number {
            year.year_number = year_number;
        }
    }
}

#[derive(Debug, Default)]
pub struct YearUpdateBuilder(YearUpdate);

impl YearUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(YearUpdate::default())
    }

    #[must_use]
    pub fn year_number(mut self, val: u32) -> Self {
        self.0.year_number = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> YearUpdate {
        self.0
    }
}
