//! Term update builder.

use chrono::NaiveDate;
use serde::Serialize;
use syl_core::drafts::TermDraft;
use syl_core::entities::Term;

use super::to_count;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,
}

impl TermUpdate {
    #[must_use]
    pub fn from_draft(draft: &TermDraft) -> Self {
        Self {
            term_number: to_count(draft.term_number),
            start_date: Some(draft.start_date),
        }
    }

    pub fn apply(&self, term: &mut Term) {
        if let Some(term_number) = self.term_number {
            term.term_number = term_number;
        }
        if let Some(start_date) = self.start_date {
            term.start_date = start_date;
        }
    }
}

#[derive(Debug, Default)]
pub struct TermUpdateBuilder(TermUpdate);

impl TermUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TermUpdate::default())
    }

    #[must_use]
    pub fn term_number(mut self, val: u32) -> Self {
        self.0.term_number = Some(val);
        self
    }

    #[must_use]
    pub fn start_date(mut self, val: Option<NaiveDate>) -> Self {
        self.0.start_date = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> TermUpdate {
        self.0
    }
}
