//! Kind tags, lesson status, form modes and expansion kinds.
//!
//! `EntityKind` and `ExpandKind` serialize as `snake_case`; `LessonStatus`
//! keeps the upper-case wire names used by the approval workflow.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;
use crate::fields::Field;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The seven entity kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Year,
    Category,
    SubjectName,
    Subject,
    Term,
    Week,
    Lesson,
}

impl EntityKind {
    /// Every kind, in store order.
    pub const ALL: [Self; 7] = [
        Self::Year,
        Self::Category,
        Self::SubjectName,
        Self::Subject,
        Self::Term,
        Self::Week,
        Self::Lesson,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Category => "category",
            Self::SubjectName => "subject_name",
            Self::Subject => "subject",
            Self::Term => "term",
            Self::Week => "week",
            Self::Lesson => "lesson",
        }
    }

    /// Ancestor selector fields shown on the add form of this kind, top-down.
    ///
    /// ```text
    /// subject_name: category
    /// subject:      year, category, subject_name
    /// term:         year, subject
    /// week:         year, subject, term
    /// lesson:       year, subject, term, week
    /// ```
    #[must_use]
    pub const fn ancestor_fields(self) -> &'static [Field] {
        match self {
            Self::Year | Self::Category => &[],
            Self::SubjectName => &[Field::CategoryId],
            Self::Subject => &[Field::YearId, Field::CategoryId, Field::SubjectNameId],
            Self::Term => &[Field::YearId, Field::SubjectId],
            Self::Week => &[Field::YearId, Field::SubjectId, Field::TermId],
            Self::Lesson => &[Field::YearId, Field::SubjectId, Field::TermId, Field::WeekId],
        }
    }

    /// Kind of the direct parent in the repository's `list_by` sense.
    #[must_use]
    pub const fn parent_kind(self) -> Option<Self> {
        match self {
            Self::Year | Self::Category => None,
            Self::SubjectName => Some(Self::Category),
            Self::Subject => Some(Self::Year),
            Self::Term => Some(Self::Subject),
            Self::Week => Some(Self::Term),
            Self::Lesson => Some(Self::Week),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let singular = normalized
            .strip_suffix("ies")
            .map(|stem| format!("{stem}y"))
            .or_else(|| normalized.strip_suffix('s').map(str::to_string))
            .unwrap_or_else(|| normalized.clone());
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized || kind.as_str() == singular)
            .ok_or_else(|| CoreError::Validation(format!("unknown entity kind '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// LessonStatus
// ---------------------------------------------------------------------------

/// Approval status of a lesson.
///
/// ```text
/// CREATED → SUBMITTED → PENDING → APPROVED → PUBLISHED
///                       PENDING → REJECTED → SUBMITTED
///                       PENDING → REVISION_REQUESTED → SUBMITTED
/// APPROVED | PUBLISHED → REVISION_REQUESTED
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonStatus {
    #[default]
    Created,
    Submitted,
    Pending,
    Approved,
    Published,
    Rejected,
    RevisionRequested,
}

impl LessonStatus {
    pub const ALL: [Self; 7] = [
        Self::Created,
        Self::Submitted,
        Self::Pending,
        Self::Approved,
        Self::Published,
        Self::Rejected,
        Self::RevisionRequested,
    ];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Created | Self::Rejected | Self::RevisionRequested => &[Self::Submitted],
            Self::Submitted => &[Self::Pending],
            Self::Pending => &[Self::Approved, Self::Rejected, Self::RevisionRequested],
            Self::Approved => &[Self::Published, Self::RevisionRequested],
            Self::Published => &[Self::RevisionRequested],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether learners can see a lesson in this state.
    #[must_use]
    pub const fn is_visible_to_learners(self) -> bool {
        matches!(self, Self::Published)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Submitted => "SUBMITTED",
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Published => "PUBLISHED",
            Self::Rejected => "REJECTED",
            Self::RevisionRequested => "REVISION_REQUESTED",
        }
    }
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LessonStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| CoreError::Validation(format!("unknown lesson status '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// FormMode
// ---------------------------------------------------------------------------

/// Whether a form creates a new entity or edits an existing one.
///
/// Ancestor IDs are immutable after creation, so edit forms require fewer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    Add,
    Edit,
}

impl FormMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ExpandKind
// ---------------------------------------------------------------------------

/// Tree levels that can be expanded or collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpandKind {
    Subject,
    Term,
    Week,
}

impl ExpandKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Term => "term",
            Self::Week => "week",
        }
    }
}

impl fmt::Display for ExpandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(kind_subject_name, EntityKind, EntityKind::SubjectName, "subject_name");
    test_serde_roundtrip!(kind_lesson, EntityKind, EntityKind::Lesson, "lesson");
    test_serde_roundtrip!(
        status_revision_requested,
        LessonStatus,
        LessonStatus::RevisionRequested,
        "REVISION_REQUESTED"
    );
    test_serde_roundtrip!(status_published, LessonStatus, LessonStatus::Published, "PUBLISHED");
    test_serde_roundtrip!(form_mode_edit, FormMode, FormMode::Edit, "edit");
    test_serde_roundtrip!(expand_week, ExpandKind, ExpandKind::Week, "week");

    #[test]
    fn lesson_valid_transitions() {
        assert!(LessonStatus::Created.can_transition_to(LessonStatus::Submitted));
        assert!(LessonStatus::Submitted.can_transition_to(LessonStatus::Pending));
        assert!(LessonStatus::Pending.can_transition_to(LessonStatus::Approved));
        assert!(LessonStatus::Pending.can_transition_to(LessonStatus::Rejected));
        assert!(LessonStatus::Pending.can_transition_to(LessonStatus::RevisionRequested));
        assert!(LessonStatus::Approved.can_transition_to(LessonStatus::Published));
        assert!(LessonStatus::RevisionRequested.can_transition_to(LessonStatus::Submitted));
    }

    #[test]
    fn lesson_invalid_transitions() {
        assert!(!LessonStatus::Created.can_transition_to(LessonStatus::Published));
        assert!(!LessonStatus::Submitted.can_transition_to(LessonStatus::Approved));
        assert!(!LessonStatus::Rejected.can_transition_to(LessonStatus::Published));
        assert!(!LessonStatus::Published.can_transition_to(LessonStatus::Created));
    }

    #[test]
    fn default_status_is_created() {
        assert_eq!(LessonStatus::default(), LessonStatus::Created);
    }

    #[test]
    fn kind_parses_plural_and_dashed_names() {
        assert_eq!("subjects".parse::<EntityKind>().unwrap(), EntityKind::Subject);
        assert_eq!("subject-name".parse::<EntityKind>().unwrap(), EntityKind::SubjectName);
        assert_eq!("Weeks".parse::<EntityKind>().unwrap(), EntityKind::Week);
        assert_eq!("categories".parse::<EntityKind>().unwrap(), EntityKind::Category);
        assert!("semester".parse::<EntityKind>().is_err());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(
            "revision-requested".parse::<LessonStatus>().unwrap(),
            LessonStatus::RevisionRequested
        );
        assert!("draft".parse::<LessonStatus>().is_err());
    }

    #[test]
    fn ancestor_fields_are_top_down() {
        assert_eq!(
            EntityKind::Lesson.ancestor_fields(),
            &[Field::YearId, Field::SubjectId, Field::TermId, Field::WeekId]
        );
        assert!(EntityKind::Year.ancestor_fields().is_empty());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", EntityKind::SubjectName), "subject_name");
        assert_eq!(format!("{}", LessonStatus::RevisionRequested), "REVISION_REQUESTED");
        assert_eq!(format!("{}", FormMode::Add), "add");
        assert_eq!(format!("{}", ExpandKind::Term), "term");
    }
}
