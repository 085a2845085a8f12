use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Id;

/// A named subject within a category, shared by the subjects of every year.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubjectName {
    pub id: Id,
    pub name: String,
    pub category_id: Id,
}
