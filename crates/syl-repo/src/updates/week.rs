//! Week update builder.

use chrono::NaiveDate;
use serde::Serialize;
use syl_core::drafts::WeekDraft;
use syl_core::entities::Week;

use super::to_count;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,
}

impl WeekUpdate {
    #[must_use]
    pub fn from_draft(draft: &WeekDraft) -> Self {
        Self {
            week_number: to_count(draft.week_number),
            start_date: Some(draft.start_date),
        }
    }

    pub fn apply(&self, week: &mut Week) {
        if let Some(week_number) = self.week_number {
            week.week_number = week_number;
        }
        if let Some(start_date) = self.start_date {
            week.start_date = start_date;
        }
    }
}

#[derive(Debug, Default)]
pub struct WeekUpdateBuilder(WeekUpdate);

impl WeekUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(WeekUpdate::default())
    }

    #[must_use]
    pub fn week_number(mut self, val: u32) -> Self {
        self.0.week_number = Some(val);
        self
    }

    #[must_use]
    pub fn start_date(mut self, val: Option<NaiveDate>) -> Self {
        self.0.start_date = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> WeekUpdate {
        self.0
    }
}
