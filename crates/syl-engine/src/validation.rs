//! Field validation for add/edit forms.
//!
//! Two layers: [`required_fields`] says which fields must be filled for a
//! kind and mode, [`validate`] checks the range or length of a filled value.
//! [`FormValidation`] combines them and only reports a field once it has been
//! touched.

use std::collections::{BTreeMap, BTreeSet};

use syl_config::ValidationRules;
use syl_core::drafts::EntityDraft;
use syl_core::enums::{EntityKind, FormMode};
use syl_core::fields::{Field, FieldValue};
use thiserror::Error;

/// Fields that must be non-empty for `kind` in `mode`.
///
/// Ancestor references are fixed once a record exists, so edit forms never
/// require them.
#[must_use]
pub const fn required_fields(kind: EntityKind, mode: FormMode) -> &'static [Field] {
    match (kind, mode) {
        (EntityKind::Year, _) => &[Field::YearNumber],
        (EntityKind::Category, _) | (EntityKind::SubjectName, FormMode::Edit) => &[Field::Name],
        (EntityKind::SubjectName, FormMode::Add) => &[Field::Name, Field::CategoryId],
        (EntityKind::Subject, FormMode::Add) => &[
            Field::YearId,
            Field::SubjectNameId,
            Field::Price,
            Field::StartDate,
        ],
        (EntityKind::Subject, FormMode::Edit) => &[Field::Price, Field::StartDate],
        (EntityKind::Term, FormMode::Add) => &[Field::SubjectId, Field::TermNumber],
        (EntityKind::Term, FormMode::Edit) => &[Field::TermNumber],
        (EntityKind::Week, FormMode::Add) => &[Field::TermId, Field::WeekNumber],
        (EntityKind::Week, FormMode::Edit) => &[Field::WeekNumber],
        (EntityKind::Lesson, FormMode::Add) => &[Field::WeekId, Field::Title],
        (EntityKind::Lesson, FormMode::Edit) => &[Field::Title],
    }
}

fn label(field: Field) -> &'static str {
    match field {
        Field::YearNumber => "Year number",
        Field::Name => "Name",
        Field::Description => "Description",
        Field::Color => "Color",
        Field::YearId => "Year",
        Field::CategoryId => "Category",
        Field::SubjectNameId => "Subject name",
        Field::SubjectId => "Subject",
        Field::TermId => "Term",
        Field::WeekId => "Week",
        Field::Price => "Price",
        Field::Discount => "Discount",
        Field::Level => "Level",
        Field::Duration => "Duration",
        Field::TeacherId => "Teacher",
        Field::StartDate => "Start date",
        Field::TermNumber => "Term number",
        Field::WeekNumber => "Week number",
        Field::Title => "Title",
        Field::VideoUrl => "Video URL",
        Field::PdfUrl => "PDF URL",
        Field::OrderIndex => "Order index",
        Field::Status => "Status",
    }
}

fn number(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => Some(*n),
        FieldValue::Text(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[allow(clippy::float_cmp)]
fn integer(field: Field, value: &FieldValue) -> Result<f64, String> {
    match number(value) {
        Some(n) if n.fract() == 0.0 => Ok(n),
        Some(_) => Err(format!("{} must be a whole number", label(field))),
        None => Err(format!("{} must be a number", label(field))),
    }
}

fn real(field: Field, value: &FieldValue) -> Result<f64, String> {
    number(value).ok_or_else(|| format!("{} must be a number", label(field)))
}

fn min_chars(what: &str, value: &FieldValue, min: usize) -> Result<(), String> {
    let chars = value.as_text().map_or(0, |text| text.trim().chars().count());
    if chars < min {
        return Err(format!("{what} must be at least {min} characters"));
    }
    Ok(())
}

const fn name_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Category => "Category name",
        EntityKind::SubjectName => "Subject name",
        _ => "Name",
    }
}

#[allow(clippy::float_cmp)]
fn check(
    kind: EntityKind,
    field: Field,
    value: &FieldValue,
    rules: &ValidationRules,
) -> Result<(), String> {
    match field {
        Field::YearNumber => {
            let n = integer(field, value)?;
            #[allow(clippy::cast_precision_loss)]
            let max = rules.year_number_max as f64;
            if n != 0.0 && !(1.0..=max).contains(&n) {
                return Err(format!(
                    "Year number must be between 1 and {} (0 for general courses)",
                    rules.year_number_max
                ));
            }
        }
        Field::Price => {
            if real(field, value)? < 0.0 {
                return Err("Price cannot be negative".into());
            }
        }
        Field::Discount => {
            let n = real(field, value)?;
            if !(0.0..=rules.discount_max).contains(&n) {
                return Err(format!("Discount must be between 0 and {}", rules.discount_max));
            }
        }
        Field::Duration | Field::OrderIndex => {
            if integer(field, value)? < 0.0 {
                return Err(format!("{} cannot be negative", label(field)));
            }
        }
        Field::TermNumber | Field::WeekNumber => {
            if integer(field, value)? < 1.0 {
                return Err(format!("{} must be at least 1", label(field)));
            }
        }
        Field::Title => min_chars(label(field), value, rules.title_min_chars)?,
        Field::Name => min_chars(name_label(kind), value, rules.name_min_chars)?,
        Field::StartDate => {
            if !matches!(value, FieldValue::Date(_)) {
                return Err("Start date must be a date".into());
            }
        }
        f if f.is_ancestor_ref() || f == Field::TeacherId => {
            if value.as_id().is_none() {
                return Err(format!("{} must be selected from the list", label(field)));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Range and length check for one filled-in value. Empty values pass; use
/// [`required_fields`] for presence.
#[must_use]
pub fn validate(
    kind: EntityKind,
    field: Field,
    value: &FieldValue,
    rules: &ValidationRules,
) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    check(kind, field, value, rules).err()
}

/// Presence plus range check for one field of a draft.
#[must_use]
pub fn field_error(
    draft: &EntityDraft,
    mode: FormMode,
    field: Field,
    rules: &ValidationRules,
) -> Option<String> {
    let value = draft.value(field);
    if value.is_empty() && required_fields(draft.kind(), mode).contains(&field) {
        return Some(format!("{} is required", label(field)));
    }
    validate(draft.kind(), field, &value, rules)
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// A blocked submission: one message per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", describe(.0))]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn describe(errors: &BTreeMap<Field, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Touched fields and current errors of the open form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValidation {
    touched: BTreeSet<Field>,
    errors: BTreeMap<Field, String>,
}

impl FormValidation {
    pub fn touch(&mut self, field: Field) {
        self.touched.insert(field);
    }

    #[must_use]
    pub fn is_touched(&self, field: Field) -> bool {
        self.touched.contains(&field)
    }

    /// Re-check every field of the draft. Errors are kept for all fields but
    /// only surfaced for touched ones.
    pub fn recompute(&mut self, draft: &EntityDraft, mode: FormMode, rules: &ValidationRules) {
        self.errors = draft
            .fields()
            .iter()
            .filter_map(|field| field_error(draft, mode, *field, rules).map(|e| (*field, e)))
            .collect();
    }

    /// The error to show for `field`, if it has been touched.
    #[must_use]
    pub fn error(&self, field: Field) -> Option<&str> {
        if !self.is_touched(field) {
            return None;
        }
        self.errors.get(&field).map(String::as_str)
    }

    /// Errors of touched fields.
    #[must_use]
    pub fn visible_errors(&self) -> BTreeMap<Field, String> {
        self.errors
            .iter()
            .filter(|(field, _)| self.touched.contains(field))
            .map(|(field, message)| (*field, message.clone()))
            .collect()
    }

    /// Pre-submit sweep: touch every field of the form, re-check, and report.
    ///
    /// # Errors
    ///
    /// Returns every failing field when the draft cannot be submitted.
    pub fn sweep(
        &mut self,
        draft: &EntityDraft,
        mode: FormMode,
        rules: &ValidationRules,
    ) -> Result<(), ValidationErrors> {
        self.touch_all(draft, mode, rules);
        self.result()
    }

    /// Touch every field of the form and re-check.
    pub fn touch_all(&mut self, draft: &EntityDraft, mode: FormMode, rules: &ValidationRules) {
        self.touched.extend(draft.fields().iter().copied());
        self.recompute(draft, mode, rules);
    }

    /// Current outcome over touched fields.
    ///
    /// # Errors
    ///
    /// Returns the touched fields that fail.
    pub fn result(&self) -> Result<(), ValidationErrors> {
        let errors = self.visible_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}
