//! Typed drafts for the add/edit flow.
//!
//! A draft holds what a form holds: ancestor selections that may still be
//! unset, and raw numbers that have not passed validation yet (hence `i64`
//! where the stored entity uses `u32`). Each variant carries only its own
//! fields; generic form code goes through [`EntityDraft::value`] and
//! [`EntityDraft::set`], which dispatch on the kind tag.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Category, Entity, Id, Lesson, Subject, SubjectName, Term, Week, Year};
use crate::enums::{EntityKind, LessonStatus};
use crate::errors::CoreError;
use crate::fields::{Field, FieldValue};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearDraft {
    pub year_number: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    pub name: String,
    pub description: String,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectNameDraft {
    pub category_id: Option<Id>,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDraft {
    pub year_id: Option<Id>,
    /// Narrows the subject-name candidates; the stored category comes from the subject name.
    pub category_id: Option<Id>,
    pub subject_name_id: Option<Id>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub level: Option<String>,
    pub duration: Option<i64>,
    pub teacher_id: Option<Id>,
    pub start_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TermDraft {
    /// Narrows the subject candidates; not stored.
    pub year_id: Option<Id>,
    pub subject_id: Option<Id>,
    pub term_number: Option<i64>,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeekDraft {
    pub year_id: Option<Id>,
    pub subject_id: Option<Id>,
    pub term_id: Option<Id>,
    pub week_number: Option<i64>,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonDraft {
    pub year_id: Option<Id>,
    pub subject_id: Option<Id>,
    pub term_id: Option<Id>,
    pub week_id: Option<Id>,
    pub title: String,
    pub description: Option<String>,
    pub video_url: Option<String>,
    pub pdf_url: Option<String>,
    pub order_index: Option<i64>,
    pub status: LessonStatus,
}

/// A draft of any entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityDraft {
    Year(YearDraft),
    Category(CategoryDraft),
    SubjectName(SubjectNameDraft),
    Subject(SubjectDraft),
    Term(TermDraft),
    Week(WeekDraft),
    Lesson(LessonDraft),
}

impl EntityDraft {
    /// A blank draft for an add form.
    #[must_use]
    pub fn empty(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Year => Self::Year(YearDraft::default()),
            EntityKind::Category => Self::Category(CategoryDraft::default()),
            EntityKind::SubjectName => Self::SubjectName(SubjectNameDraft::default()),
            EntityKind::Subject => Self::Subject(SubjectDraft::default()),
            EntityKind::Term => Self::Term(TermDraft::default()),
            EntityKind::Week => Self::Week(WeekDraft::default()),
            EntityKind::Lesson => Self::Lesson(LessonDraft::default()),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Year(_) => EntityKind::Year,
            Self::Category(_) => EntityKind::Category,
            Self::SubjectName(_) => EntityKind::SubjectName,
            Self::Subject(_) => EntityKind::Subject,
            Self::Term(_) => EntityKind::Term,
            Self::Week(_) => EntityKind::Week,
            Self::Lesson(_) => EntityKind::Lesson,
        }
    }

    /// The sequence-number field auto-incremented among siblings, if any.
    #[must_use]
    pub const fn sequence_field(&self) -> Option<Field> {
        match self {
            Self::Term(_) => Some(Field::TermNumber),
            Self::Week(_) => Some(Field::WeekNumber),
            _ => None,
        }
    }

    /// Current selection of an ancestor reference field.
    #[must_use]
    pub fn ancestor(&self, field: Field) -> Option<Id> {
        self.value(field).as_id()
    }

    /// Whether `field` belongs to this kind's form.
    #[must_use]
    pub fn has_field(&self, field: Field) -> bool {
        self.fields().contains(&field)
    }

    /// Every field of this kind's form, in display order.
    #[must_use]
    pub const fn fields(&self) -> &'static [Field] {
        match self {
            Self::Year(_) => &[Field::YearNumber],
            Self::Category(_) => &[Field::Name, Field::Description, Field::Color],
            Self::SubjectName(_) => &[Field::CategoryId, Field::Name],
            Self::Subject(_) => &[
                Field::YearId,
                Field::CategoryId,
                Field::SubjectNameId,
                Field::Price,
                Field::Discount,
                Field::Level,
                Field::Duration,
                Field::TeacherId,
                Field::StartDate,
                Field::Description,
            ],
            Self::Term(_) => &[
                Field::YearId,
                Field::SubjectId,
                Field::TermNumber,
                Field::StartDate,
            ],
            Self::Week(_) => &[
                Field::YearId,
                Field::SubjectId,
                Field::TermId,
                Field::WeekNumber,
                Field::StartDate,
            ],
            Self::Lesson(_) => &[
                Field::YearId,
                Field::SubjectId,
                Field::TermId,
                Field::WeekId,
                Field::Title,
                Field::Description,
                Field::VideoUrl,
                Field::PdfUrl,
                Field::OrderIndex,
                Field::Status,
            ],
        }
    }

    /// Read a field. Fields that do not belong to this kind read as empty.
    #[must_use]
    pub fn value(&self, field: Field) -> FieldValue {
        match (self, field) {
            (Self::Year(d), Field::YearNumber) => d.year_number.into(),

            (Self::Category(d), Field::Name) => FieldValue::Text(d.name.clone()),
            (Self::Category(d), Field::Description) => FieldValue::Text(d.description.clone()),
            (Self::Category(d), Field::Color) => d.color.as_deref().into(),

            (Self::SubjectName(d), Field::CategoryId) => d.category_id.into(),
            (Self::SubjectName(d), Field::Name) => FieldValue::Text(d.name.clone()),

            (Self::Subject(d), Field::YearId) => d.year_id.into(),
            (Self::Subject(d), Field::CategoryId) => d.category_id.into(),
            (Self::Subject(d), Field::SubjectNameId) => d.subject_name_id.into(),
            (Self::Subject(d), Field::Price) => d.price.into(),
            (Self::Subject(d), Field::Discount) => d.discount.into(),
            (Self::Subject(d), Field::Level) => d.level.as_deref().into(),
            (Self::Subject(d), Field::Duration) => d.duration.into(),
            (Self::Subject(d), Field::TeacherId) => d.teacher_id.into(),
            (Self::Subject(d), Field::StartDate) => d.start_date.into(),
            (Self::Subject(d), Field::Description) => d.description.as_deref().into(),

            (Self::Term(d), Field::YearId) => d.year_id.into(),
            (Self::Term(d), Field::SubjectId) => d.subject_id.into(),
            (Self::Term(d), Field::TermNumber) => d.term_number.into(),
            (Self::Term(d), Field::StartDate) => d.start_date.into(),

            (Self::Week(d), Field::YearId) => d.year_id.into(),
            (Self::Week(d), Field::SubjectId) => d.subject_id.into(),
            (Self::Week(d), Field::TermId) => d.term_id.into(),
            (Self::Week(d), Field::WeekNumber) => d.week_number.into(),
            (Self::Week(d), Field::StartDate) => d.start_date.into(),

            (Self::Lesson(d), Field::YearId) => d.year_id.into(),
            (Self::Lesson(d), Field::SubjectId) => d.subject_id.into(),
            (Self::Lesson(d), Field::TermId) => d.term_id.into(),
            (Self::Lesson(d), Field::WeekId) => d.week_id.into(),
            (Self::Lesson(d), Field::Title) => FieldValue::Text(d.title.clone()),
            (Self::Lesson(d), Field::Description) => d.description.as_deref().into(),
            (Self::Lesson(d), Field::VideoUrl) => d.video_url.as_deref().into(),
            (Self::Lesson(d), Field::PdfUrl) => d.pdf_url.as_deref().into(),
            (Self::Lesson(d), Field::OrderIndex) => d.order_index.into(),
            (Self::Lesson(d), Field::Status) => FieldValue::Text(d.status.as_str().to_string()),

            _ => FieldValue::Empty,
        }
    }

    /// Write a field, converting form input to the field's type.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the field does not belong to this
    /// kind or the value cannot be converted (e.g. `2.5` for a term number).
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<(), CoreError> {
        let kind = self.kind();
        match (self, field) {
            (Self::Year(d), Field::YearNumber) => d.year_number = int_value(field, &value)?,

            (Self::Category(d), Field::Name) => d.name = text_value(&value),
            (Self::Category(d), Field::Description) => d.description = text_value(&value),
            (Self::Category(d), Field::Color) => d.color = opt_text_value(&value),

            (Self::SubjectName(d), Field::CategoryId) => d.category_id = id_value(field, &value)?,
            (Self::SubjectName(d), Field::Name) => d.name = text_value(&value),

            (Self::Subject(d), Field::YearId) => d.year_id = id_value(field, &value)?,
            (Self::Subject(d), Field::CategoryId) => d.category_id = id_value(field, &value)?,
            (Self::Subject(d), Field::SubjectNameId) => {
                d.subject_name_id = id_value(field, &value)?;
            }
            (Self::Subject(d), Field::Price) => d.price = float_value(field, &value)?,
            (Self::Subject(d), Field::Discount) => d.discount = float_value(field, &value)?,
            (Self::Subject(d), Field::Level) => d.level = opt_text_value(&value),
            (Self::Subject(d), Field::Duration) => d.duration = int_value(field, &value)?,
            (Self::Subject(d), Field::TeacherId) => d.teacher_id = id_value(field, &value)?,
            (Self::Subject(d), Field::StartDate) => d.start_date = date_value(field, &value)?,
            (Self::Subject(d), Field::Description) => d.description = opt_text_value(&value),

            (Self::Term(d), Field::YearId) => d.year_id = id_value(field, &value)?,
            (Self::Term(d), Field::SubjectId) => d.subject_id = id_value(field, &value)?,
            (Self::Term(d), Field::TermNumber) => d.term_number = int_value(field, &value)?,
            (Self::Term(d), Field::StartDate) => d.start_date = date_value(field, &value)?,

            (Self::Week(d), Field::YearId) => d.year_id = id_value(field, &value)?,
            (Self::Week(d), Field::SubjectId) => d.subject_id = id_value(field, &value)?,
            (Self::Week(d), Field::TermId) => d.term_id = id_value(field, &value)?,
            (Self::Week(d), Field::WeekNumber) => d.week_number = int_value(field, &value)?,
            (Self::Week(d), Field::StartDate) => d.start_date = date_value(field, &value)?,

            (Self::Lesson(d), Field::YearId) => d.year_id = id_value(field, &value)?,
            (Self::Lesson(d), Field::SubjectId) => d.subject_id = id_value(field, &value)?,
            (Self::Lesson(d), Field::TermId) => d.term_id = id_value(field, &value)?,
            (Self::Lesson(d), Field::WeekId) => d.week_id = id_value(field, &value)?,
            (Self::Lesson(d), Field::Title) => d.title = text_value(&value),
            (Self::Lesson(d), Field::Description) => d.description = opt_text_value(&value),
            (Self::Lesson(d), Field::VideoUrl) => d.video_url = opt_text_value(&value),
            (Self::Lesson(d), Field::PdfUrl) => d.pdf_url = opt_text_value(&value),
            (Self::Lesson(d), Field::OrderIndex) => d.order_index = int_value(field, &value)?,
            (Self::Lesson(d), Field::Status) => {
                d.status = match &value {
                    FieldValue::Empty => LessonStatus::default(),
                    FieldValue::Text(text) => text.parse()?,
                    other => return Err(mismatch(field, other)),
                };
            }

            _ => {
                return Err(CoreError::Validation(format!(
                    "field {field} does not belong to a {kind} form"
                )));
            }
        }
        Ok(())
    }

    /// Convenience for ancestor fields: `None` clears the selection.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the field does not belong to this kind.
    pub fn set_ancestor(&mut self, field: Field, id: Option<Id>) -> Result<(), CoreError> {
        self.set(field, id.into())
    }
}

impl From<&Year> for EntityDraft {
    fn from(year: &Year) -> Self {
        Self::Year(YearDraft {
            year_number: Some(i64::from(year.year_number)),
        })
    }
}

impl From<&Category> for EntityDraft {
    fn from(category: &Category) -> Self {
        Self::Category(CategoryDraft {
            name: category.name.clone(),
            description: category.description.clone(),
            color: category.color.clone(),
        })
    }
}

impl From<&SubjectName> for EntityDraft {
    fn from(subject_name: &SubjectName) -> Self {
        Self::SubjectName(SubjectNameDraft {
            category_id: Some(subject_name.category_id),
            name: subject_name.name.clone(),
        })
    }
}

impl From<&Subject> for EntityDraft {
    fn from(subject: &Subject) -> Self {
        Self::Subject(SubjectDraft {
            year_id: Some(subject.year_id),
            category_id: subject.category_id,
            subject_name_id: Some(subject.subject_name_id),
            price: Some(subject.price),
            discount: subject.discount,
            level: subject.level.clone(),
            duration: subject.duration.map(i64::from),
            teacher_id: subject.teacher_id,
            start_date: subject.start_date,
            description: subject.description.clone(),
        })
    }
}

impl From<&Term> for EntityDraft {
    fn from(term: &Term) -> Self {
        Self::Term(TermDraft {
            year_id: None,
            subject_id: Some(term.subject_id),
            term_number: Some(i64::from(term.term_number)),
            start_date: term.start_date,
        })
    }
}

impl From<&Week> for EntityDraft {
    fn from(week: &Week) -> Self {
        Self::Week(WeekDraft {
            year_id: None,
            subject_id: None,
            term_id: Some(week.term_id),
            week_number: Some(i64::from(week.week_number)),
            start_date: week.start_date,
        })
    }
}

impl From<&Lesson> for EntityDraft {
    fn from(lesson: &Lesson) -> Self {
        Self::Lesson(LessonDraft {
            year_id: None,
            subject_id: Some(lesson.subject_id),
            term_id: None,
            week_id: lesson.week_id,
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            video_url: lesson.video_url.clone(),
            pdf_url: lesson.pdf_url.clone(),
            order_index: Some(i64::from(lesson.order_index)),
            status: lesson.status,
        })
    }
}

impl From<&Entity> for EntityDraft {
    fn from(entity: &Entity) -> Self {
        match entity {
            Entity::Year(e) => e.into(),
            Entity::Category(e) => e.into(),
            Entity::SubjectName(e) => e.into(),
            Entity::Subject(e) => e.into(),
            Entity::Term(e) => e.into(),
            Entity::Week(e) => e.into(),
            Entity::Lesson(e) => e.into(),
        }
    }
}

fn mismatch(field: Field, value: &FieldValue) -> CoreError {
    CoreError::Validation(format!("{field} cannot hold {value:?}"))
}

fn id_value(field: Field, value: &FieldValue) -> Result<Option<Id>, CoreError> {
    match value {
        FieldValue::Empty => Ok(None),
        FieldValue::Id(id) => Ok(Some(*id)),
        FieldValue::Text(text) if text.trim().is_empty() => Ok(None),
        FieldValue::Text(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| mismatch(field, value)),
        other => Err(mismatch(field, other)),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn int_value(field: Field, value: &FieldValue) -> Result<Option<i64>, CoreError> {
    match value {
        FieldValue::Empty => Ok(None),
        FieldValue::Number(number) if number.fract() == 0.0 && number.is_finite() => {
            Ok(Some(*number as i64))
        }
        FieldValue::Text(text) if text.trim().is_empty() => Ok(None),
        FieldValue::Text(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("{field} must be a whole number"))),
        FieldValue::Number(_) => Err(CoreError::Validation(format!(
            "{field} must be a whole number"
        ))),
        other => Err(mismatch(field, other)),
    }
}

fn float_value(field: Field, value: &FieldValue) -> Result<Option<f64>, CoreError> {
    match value {
        FieldValue::Empty => Ok(None),
        FieldValue::Number(number) => Ok(Some(*number)),
        FieldValue::Text(text) if text.trim().is_empty() => Ok(None),
        FieldValue::Text(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("{field} must be a number"))),
        other => Err(mismatch(field, other)),
    }
}

fn date_value(field: Field, value: &FieldValue) -> Result<Option<NaiveDate>, CoreError> {
    match value {
        FieldValue::Empty => Ok(None),
        FieldValue::Date(date) => Ok(Some(*date)),
        FieldValue::Text(text) if text.trim().is_empty() => Ok(None),
        FieldValue::Text(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("{field} must be a YYYY-MM-DD date"))),
        other => Err(mismatch(field, other)),
    }
}

fn text_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Number(number) => number.to_string(),
        FieldValue::Id(id) => id.to_string(),
        FieldValue::Date(date) => date.to_string(),
        FieldValue::Empty => String::new(),
    }
}

fn opt_text_value(value: &FieldValue) -> Option<String> {
    let text = text_value(value);
    if text.trim().is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_then_value_reads_back() {
        let mut draft = EntityDraft::empty(EntityKind::Term);
        draft.set(Field::SubjectId, FieldValue::Id(10)).unwrap();
        draft.set(Field::TermNumber, FieldValue::Text("3".into())).unwrap();
        draft
            .set(Field::StartDate, FieldValue::Text("2024-09-01".into()))
            .unwrap();

        assert_eq!(draft.ancestor(Field::SubjectId), Some(10));
        assert_eq!(draft.value(Field::TermNumber), FieldValue::Number(3.0));
        assert_eq!(
            draft.value(Field::StartDate),
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 9, 1).unwrap())
        );
    }

    #[test]
    fn foreign_field_is_rejected() {
        let mut draft = EntityDraft::empty(EntityKind::Year);
        let result = draft.set(Field::Title, FieldValue::Text("Intro".into()));
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(draft.value(Field::Title), FieldValue::Empty);
    }

    #[test]
    fn fractional_sequence_number_is_rejected() {
        let mut draft = EntityDraft::empty(EntityKind::Week);
        let result = draft.set(Field::WeekNumber, FieldValue::Number(2.5));
        assert!(result.is_err());
    }

    #[test]
    fn blank_text_clears_optional_fields() {
        let mut draft = EntityDraft::empty(EntityKind::Lesson);
        draft
            .set(Field::VideoUrl, FieldValue::Text("https://cdn/v.mp4".into()))
            .unwrap();
        draft.set(Field::VideoUrl, FieldValue::Text("  ".into())).unwrap();
        assert_eq!(draft.value(Field::VideoUrl), FieldValue::Empty);
    }

    #[test]
    fn lesson_status_parses_from_text() {
        let mut draft = EntityDraft::empty(EntityKind::Lesson);
        draft
            .set(Field::Status, FieldValue::Text("approved".into()))
            .unwrap();
        let EntityDraft::Lesson(lesson) = &draft else {
            panic!("expected lesson draft");
        };
        assert_eq!(lesson.status, LessonStatus::Approved);
    }

    #[test]
    fn edit_draft_from_subject_keeps_ancestors() {
        let subject = Subject {
            id: 10,
            year_id: 2,
            subject_name_id: 5,
            category_id: Some(1),
            subject_name: "Algebra".into(),
            category_name: Some("Mathematics".into()),
            price: 120.0,
            discount: None,
            level: Some("beginner".into()),
            duration: Some(40),
            teacher_id: None,
            teacher_name: None,
            start_date: None,
            description: None,
        };
        let draft = EntityDraft::from(&subject);
        assert_eq!(draft.kind(), EntityKind::Subject);
        assert_eq!(draft.ancestor(Field::YearId), Some(2));
        assert_eq!(draft.ancestor(Field::SubjectNameId), Some(5));
        assert_eq!(draft.value(Field::Duration), FieldValue::Number(40.0));
    }

    #[test]
    fn fields_cover_every_ancestor_selector() {
        for kind in EntityKind::ALL {
            let draft = EntityDraft::empty(kind);
            for field in kind.ancestor_fields() {
                assert!(draft.has_field(*field), "{kind} form lacks {field}");
            }
        }
    }
}
