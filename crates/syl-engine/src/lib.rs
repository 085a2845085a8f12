//! # syl-engine
//!
//! The state engine behind the syllabus editor:
//!
//! - [`store::EntityStore`]: every collection as last fetched, indexed by ID
//! - [`filter::compute_filtered`]: search and selector filtering, with subject
//!   matches propagating up to years and down to lessons
//! - [`cascade::run_cascade`]: single-candidate ancestor inference and
//!   term/week auto-numbering for add forms
//! - [`expansion::ExpansionTracker`], [`pagination`]: tree and table view state
//! - [`validation`]: required fields per kind and mode, range rules, touched state
//! - [`state`]: the immutable [`state::AppState`], its reducer and container
//! - [`workbench::Workbench`]: the mutation surface over a repository and a
//!   notification sink

pub mod cascade;
pub mod error;
pub mod expansion;
pub mod filter;
pub mod pagination;
pub mod state;
pub mod store;
pub mod validation;
pub mod workbench;

pub use error::WorkbenchError;
pub use filter::{FilteredViews, SelectorField, Selectors, compute_filtered};
pub use state::{AppState, Event, FormState, StateContainer};
pub use store::EntityStore;
pub use validation::{FormValidation, ValidationErrors};
pub use workbench::Workbench;
