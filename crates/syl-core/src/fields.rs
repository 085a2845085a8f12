//! Form field identifiers and the values a form can hold.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::Id;

/// A field of an add/edit form, named as on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    YearNumber,
    Name,
    Description,
    Color,
    YearId,
    CategoryId,
    SubjectNameId,
    SubjectId,
    TermId,
    WeekId,
    Price,
    Discount,
    Level,
    Duration,
    TeacherId,
    StartDate,
    TermNumber,
    WeekNumber,
    Title,
    VideoUrl,
    PdfUrl,
    OrderIndex,
    Status,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::YearNumber => "yearNumber",
            Self::Name => "name",
            Self::Description => "description",
            Self::Color => "color",
            Self::YearId => "yearId",
            Self::CategoryId => "categoryId",
            Self::SubjectNameId => "subjectNameId",
            Self::SubjectId => "subjectId",
            Self::TermId => "termId",
            Self::WeekId => "weekId",
            Self::Price => "price",
            Self::Discount => "discount",
            Self::Level => "level",
            Self::Duration => "duration",
            Self::TeacherId => "teacherId",
            Self::StartDate => "startDate",
            Self::TermNumber => "termNumber",
            Self::WeekNumber => "weekNumber",
            Self::Title => "title",
            Self::VideoUrl => "videoUrl",
            Self::PdfUrl => "pdfUrl",
            Self::OrderIndex => "orderIndex",
            Self::Status => "status",
        }
    }

    /// Whether this field holds a reference to an ancestor entity.
    #[must_use]
    pub const fn is_ancestor_ref(self) -> bool {
        matches!(
            self,
            Self::YearId
                | Self::CategoryId
                | Self::SubjectNameId
                | Self::SubjectId
                | Self::TermId
                | Self::WeekId
        )
    }

    /// Fields whose current value stops being meaningful when this ancestor
    /// reference changes. Year and category are independent axes, so neither
    /// invalidates the other.
    #[must_use]
    pub const fn downstream(self) -> &'static [Self] {
        match self {
            Self::YearId => &[Self::SubjectId, Self::TermId, Self::WeekId],
            Self::CategoryId => &[Self::SubjectNameId, Self::SubjectId, Self::TermId, Self::WeekId],
            Self::SubjectId => &[Self::TermId, Self::WeekId],
            Self::TermId => &[Self::WeekId],
            _ => &[],
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current value of a form field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Id(Id),
    Date(NaiveDate),
}

impl FieldValue {
    /// Empty values and blank text count as "not filled in".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::Id(_) | Self::Date(_) => false,
        }
    }

    #[must_use]
    pub const fn as_id(&self) -> Option<Id> {
        match self {
            Self::Id(id) => Some(*id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Option<Id>> for FieldValue {
    fn from(value: Option<Id>) -> Self {
        value.map_or(Self::Empty, Self::Id)
    }
}

impl From<Option<i64>> for FieldValue {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Empty, |number| Self::Number(number as f64))
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Empty, Self::Number)
    }
}

impl From<Option<NaiveDate>> for FieldValue {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Empty, Self::Date)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Option<&str>> for FieldValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, |text| Self::Text(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_empty() {
        assert!(FieldValue::Text("   ".into()).is_empty());
        assert!(FieldValue::Empty.is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
        assert!(!FieldValue::Id(3).is_empty());
    }

    #[test]
    fn field_names_match_wire_names() {
        assert_eq!(Field::WeekId.as_str(), "weekId");
        assert_eq!(
            serde_json::to_string(&Field::SubjectNameId).unwrap(),
            "\"subjectNameId\""
        );
    }

    #[test]
    fn downstream_follows_descent() {
        assert_eq!(Field::SubjectId.downstream(), &[Field::TermId, Field::WeekId]);
        assert!(!Field::YearId.downstream().contains(&Field::CategoryId));
        assert!(Field::WeekId.downstream().is_empty());
        assert!(Field::Title.downstream().is_empty());
        assert!(Field::CategoryId.is_ancestor_ref());
        assert!(!Field::Price.is_ancestor_ref());
    }
}
