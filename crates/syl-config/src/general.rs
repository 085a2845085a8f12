//! General application configuration.

use serde::{Deserialize, Serialize};

const fn default_confirm_deletes() -> bool {
    true
}

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Ask the notification sink for confirmation before deleting an entity.
    #[serde(default = "default_confirm_deletes")]
    pub confirm_deletes: bool,

    /// Default output format for `syl` (`json`, `table`, `raw`).
    #[serde(default = "default_format")]
    pub default_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            confirm_deletes: default_confirm_deletes(),
            default_format: default_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert!(config.confirm_deletes);
        assert_eq!(config.default_format, "json");
    }
}
