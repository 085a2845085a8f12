//! # syl-repo
//!
//! The collaborators the syllabus engine calls into but does not own:
//!
//! - [`repository::EntityRepository`]: list/create/update/delete per entity kind,
//!   bundled as [`repository::ContentRepository`]
//! - [`notify::NotificationSink`]: success/error messages and confirmation prompts
//! - [`updates`]: partial-update builders used as `update` patches
//! - [`memory::InMemoryRepository`]: a snapshot-seeded backend for the CLI and tests

pub mod error;
pub mod memory;
pub mod notify;
pub mod repository;
pub mod updates;

pub use error::RepositoryError;
pub use memory::InMemoryRepository;
pub use notify::{Notification, NotificationSink, RecordingSink, TracingSink};
pub use repository::{ContentRepository, EntityRepository, Persist};
