//! # syl-core
//!
//! Core types shared across all syllabus crates:
//! - Entity structs for the content hierarchy (years, subjects, terms, weeks, lessons)
//!   and its cross-classification axes (categories, subject names)
//! - Kind, status and form-mode enums, including the lesson approval state machine
//! - Typed drafts (`EntityDraft`) used by the add/edit flow
//! - Form field identifiers and values
//! - Bulk snapshots as returned by a full reload
//! - Cross-cutting error types

pub mod drafts;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod fields;
pub mod snapshot;

pub use entities::{Entity, Id, Record};
