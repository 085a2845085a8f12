use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Id;

/// A classification axis for subjects (e.g. sciences, languages).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Display colour, e.g. `#3b82f6`.
    #[serde(default)]
    pub color: Option<String>,
}
