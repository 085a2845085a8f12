//! Numeric limits used by the field validator.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_year_number_max() -> i64 {
    12
}

const fn default_discount_max() -> f64 {
    100.0
}

const fn default_title_min_chars() -> usize {
    3
}

const fn default_name_min_chars() -> usize {
    2
}

/// Range and length rules for form fields.
///
/// Year number 0 is reserved for general courses and always accepted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ValidationRules {
    #[serde(default = "default_year_number_max")]
    pub year_number_max: i64,

    #[serde(default = "default_discount_max")]
    pub discount_max: f64,

    #[serde(default = "default_title_min_chars")]
    pub title_min_chars: usize,

    #[serde(default = "default_name_min_chars")]
    pub name_min_chars: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            year_number_max: default_year_number_max(),
            discount_max: default_discount_max(),
            title_min_chars: default_title_min_chars(),
            name_min_chars: default_name_min_chars(),
        }
    }
}

impl ValidationRules {
    /// Reject limits that would make every value invalid.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.year_number_max < 1 {
            return Err(ConfigError::InvalidValue {
                field: "validation.year_number_max".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !(self.discount_max > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "validation.discount_max".into(),
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form_rules() {
        let rules = ValidationRules::default();
        assert_eq!(rules.year_number_max, 12);
        assert!((rules.discount_max - 100.0).abs() < f64::EPSILON);
        assert_eq!(rules.title_min_chars, 3);
        assert_eq!(rules.name_min_chars, 2);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn non_positive_year_max_is_rejected() {
        let rules = ValidationRules {
            year_number_max: 0,
            ..ValidationRules::default()
        };
        assert!(rules.validate().is_err());
    }
}
