use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Id;

/// Root of the hierarchy. `year_number == 0` holds the general courses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Year {
    pub id: Id,
    pub year_number: u32,
}

impl Year {
    /// Whether this is the reserved "general courses" year.
    #[must_use]
    pub const fn is_general(&self) -> bool {
        self.year_number == 0
    }

    /// Human-readable label for tree rows and selectors.
    #[must_use]
    pub fn label(&self) -> String {
        if self.is_general() {
            "General courses".to_string()
        } else {
            format!("Year {}", self.year_number)
        }
    }
}
