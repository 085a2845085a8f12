use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Id;

/// A subject taught in one year, named by one `SubjectName`.
///
/// `subject_name`, `category_id` and `category_name` are denormalized display
/// fields. The authoritative category is the one of the `SubjectName`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: Id,
    pub year_id: Id,
    pub subject_name_id: Id,
    #[serde(default)]
    pub category_id: Option<Id>,
    #[serde(default)]
    pub subject_name: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub price: f64,
    /// Discount percentage, 0 to 100.
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub level: Option<String>,
    /// Duration in hours.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub teacher_id: Option<Id>,
    #[serde(default)]
    pub teacher_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
}
