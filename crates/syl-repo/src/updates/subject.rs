//! Subject update builder.

use chrono::NaiveDate;
use serde::Serialize;
use syl_core::Id;
use syl_core::drafts::SubjectDraft;
use syl_core::entities::Subject;

use super::to_count;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<Option<Id>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl SubjectUpdate {
    #[must_use]
    pub fn from_draft(draft: &SubjectDraft) -> Self {
        Self {
            price: draft.price,
            discount: Some(draft.discount),
            level: Some(draft.level.clone()),
            duration: Some(to_count(draft.duration)),
            teacher_id: Some(draft.teacher_id),
            start_date: Some(draft.start_date),
            description: Some(draft.description.clone()),
        }
    }

    /// A changed teacher invalidates the denormalized teacher name.
    pub fn apply(&self, subject: &mut Subject) {
        if let Some(price) = self.price {
            subject.price = price;
        }
        if let Some(discount) = self.discount {
            subject.discount = discount;
        }
        if let Some(ref level) = self.level {
            subject.level.clone_from(level);
        }
        if let Some(duration) = self.duration {
            subject.duration = duration;
        }
        if let Some(teacher_id) = self.teacher_id {
            if teacher_id != subject.teacher_id {
                subject.teacher_name = None;
            }
            subject.teacher_id = teacher_id;
        }
        if let Some(start_date) = self.start_date {
            subject.start_date = start_date;
        }
        if let Some(ref description) = self.description {
            subject.description.clone_from(description);
        }
    }
}

#[derive(Debug, Default)]
pub struct SubjectUpdateBuilder(SubjectUpdate);

impl SubjectUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(SubjectUpdate::default())
    }

    #[must_use]
    pub fn price(mut self, val: f64) -> Self {
        self.0.price = Some(val);
        self
    }

    #[must_use]
    pub fn discount(mut self, val: Option<f64>) -> Self {
        self.0.discount = Some(val);
        self
    }

    #[must_use]
    pub fn level(mut self, val: Option<String>) -> Self {
        self.0.level = Some(val);
        self
    }

    #[must_use]
    pub fn duration(mut self, val: Option<u32>) -> Self {
        self.0.duration = Some(val);
        self
    }

    #[must_use]
    pub fn teacher_id(mut self, val: Option<Id>) -> Self {
        self.0.teacher_id = Some(val);
        self
    }

    #[must_use]
    pub fn start_date(mut self, val: Option<NaiveDate>) -> Self {
        self.0.start_date = Some(val);
        self
    }

    #[must_use]
    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> SubjectUpdate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_serializes_only_set_fields() {
        let update = SubjectUpdateBuilder::new()
            .price(30.0)
            .discount(None)
            .build();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({ "price": 30.0, "discount": null }));
    }

    #[test]
    fn from_draft_ignores_ancestors() {
        let draft = SubjectDraft {
            year_id: Some(99),
            subject_name_id: Some(98),
            price: Some(12.5),
            duration: Some(40),
            ..SubjectDraft::default()
        };
        let update = SubjectUpdate::from_draft(&draft);
        assert_eq!(update.price, Some(12.5));
        assert_eq!(update.duration, Some(Some(40)));
        let json = serde_json::to_value(&update).unwrap();
        assert!(json.get("yearId").is_none());
        assert!(json.get("subjectNameId").is_none());
    }
}
