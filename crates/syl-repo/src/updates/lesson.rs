//! Lesson update builder.
//!
//! `status` is only set through the approval workflow, never from an edit form.

use serde::Serialize;
use syl_core::drafts::LessonDraft;
use syl_core::entities::Lesson;
use syl_core::enums::LessonStatus;

use super::to_count;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LessonStatus>,
}

impl LessonUpdate {
    #[must_use]
    pub fn from_draft(draft: &LessonDraft) -> Self {
        Self {
            title: Some(draft.title.trim().to_string()),
            description: Some(draft.description.clone()),
            video_url: Some(draft.video_url.clone()),
            pdf_url: Some(draft.pdf_url.clone()),
            order_index: to_count(draft.order_index),
            status: None,
        }
    }

    pub fn apply(&self, lesson: &mut Lesson) {
        if let Some(ref title) = self.title {
            lesson.title.clone_from(title);
        }
        if let Some(ref description) = self.description {
            lesson.description.clone_from(description);
        }
        if let Some(ref video_url) = self.video_url {
            lesson.video_url.clone_from(video_url);
        }
        if let Some(ref pdf_url) = self.pdf_url {
            lesson.pdf_url.clone_from(pdf_url);
        }
        if let Some(order_index) = self.order_index {
            lesson.order_index = order_index;
        }
        if let Some(status) = self.status {
            lesson.status = status;
        }
    }
}

#[derive(Debug, Default)]
pub struct LessonUpdateBuilder(LessonUpdate);

impl LessonUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(LessonUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, val: impl Into<String>) -> Self {
        self.0.title = Some(val.into());
        self
    }

    #[must_use]
    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    #[must_use]
    pub fn video_url(mut self, val: Option<String>) -> Self {
        self.0.video_url = Some(val);
        self
    }

    #[must_use]
    pub fn pdf_url(mut self, val: Option<String>) -> Self {
        self.0.pdf_url = Some(val);
        self
    }

    #[must_use]
    pub fn order_index(mut self, val: u32) -> Self {
        self.0.order_index = Some(val);
        self
    }

    #[must_use]
    pub fn status(mut self, val: LessonStatus) -> Self {
        self.0.status = Some(val);
        self
    }

    #[must_use]
    pub fn build(self) -> LessonUpdate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_draft_never_carries_status() {
        let draft = LessonDraft {
            title: "  Fractions ".into(),
            status: LessonStatus::Published,
            order_index: Some(3),
            ..LessonDraft::default()
        };
        let update = LessonUpdate::from_draft(&draft);
        assert_eq!(update.title.as_deref(), Some("Fractions"));
        assert_eq!(update.order_index, Some(3));
        assert!(update.status.is_none());
    }

    #[test]
    fn apply_changes_only_set_fields() {
        let mut lesson = Lesson {
            id: 1,
            week_id: Some(4),
            subject_id: 10,
            title: "Intro".into(),
            description: Some("old".into()),
            video_url: None,
            pdf_url: None,
            order_index: 0,
            status: LessonStatus::Pending,
        };
        LessonUpdateBuilder::new()
            .status(LessonStatus::Approved)
            .build()
            .apply(&mut lesson);
        assert_eq!(lesson.status, LessonStatus::Approved);
        assert_eq!(lesson.title, "Intro");
        assert_eq!(lesson.description.as_deref(), Some("old"));
    }
}
