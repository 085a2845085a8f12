use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Id;
use crate::enums::LessonStatus;

/// A lesson, attached to a week or directly to a subject ("global" lesson).
///
/// `subject_id` is always recorded. When `week_id` is present, the week's
/// transitive subject must equal `subject_id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: Id,
    #[serde(default)]
    pub week_id: Option<Id>,
    pub subject_id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub order_index: u32,
    #[serde(default)]
    pub status: LessonStatus,
}

impl Lesson {
    /// A global lesson hangs off its subject instead of a week.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        self.week_id.is_none()
    }
}
