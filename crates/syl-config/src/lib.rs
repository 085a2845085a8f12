//! # syl-config
//!
//! Layered configuration loading for syllabus using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SYLLABUS_*` prefix, `__` as separator)
//! 2. Project-level `.syllabus/config.toml`
//! 3. User-level `~/.config/syllabus/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SYLLABUS_PAGINATION__LESSONS` -> `pagination.lessons`,
//! `SYLLABUS_GENERAL__CONFIRM_DELETES` -> `general.confirm_deletes`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use syl_config::SylConfig;
//! use syl_core::enums::EntityKind;
//!
//! let config = SylConfig::load_with_dotenv().expect("config");
//! println!("lessons per page: {}", config.pagination.page_size(EntityKind::Lesson));
//! ```

mod error;
mod general;
mod pagination;
mod validation;

pub use error::ConfigError;
pub use general::GeneralConfig;
pub use pagination::PaginationConfig;
pub use validation::ValidationRules;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SylConfig {
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub validation: ValidationRules,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl SylConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an already-built figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pagination.validate()?;
        self.validation.validate()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".syllabus/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("SYLLABUS_").split("__"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("syllabus").join("config.toml"))
    }
}
