use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub id: Id,
    pub term_id: Id,
    pub week_number: u32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}
