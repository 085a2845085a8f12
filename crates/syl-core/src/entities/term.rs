use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Id;

/// A term of a subject. `term_number` is suggested by auto-increment, not enforced unique.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: Id,
    pub subject_id: Id,
    pub term_number: u32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}
