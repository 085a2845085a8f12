//! Update builder types for entity mutations.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields are changed by `update`; nullable columns use `Option<Option<_>>` so
//! a patch can clear them. Ancestor references are not patchable: a record
//! keeps its parents for life.
//!
//! `XUpdate::from_draft` turns an edit-form draft into the patch that carries
//! every editable field.

pub mod category;
pub mod lesson;
pub mod subject;
pub mod subject_name;
pub mod term;
pub mod week;
pub mod year;

/// Form numbers arrive as `i64`; stored counters are `u32`.
fn to_count(value: Option<i64>) -> Option<u32> {
    value.and_then(|n| u32::try_from(n).ok())
}
