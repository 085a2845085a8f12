//! The content repository seam.
//!
//! One [`EntityRepository`] per entity kind, each returning futures. A backend
//! that serves all seven kinds is a [`ContentRepository`]; the blanket impl
//! means nothing has to opt in.

use async_trait::async_trait;
use syl_core::Id;
use syl_core::drafts::{
    CategoryDraft, LessonDraft, SubjectDraft, SubjectNameDraft, TermDraft, WeekDraft, YearDraft,
};
use syl_core::entities::{Category, Lesson, Record, Subject, SubjectName, Term, Week, Year};

use crate::error::RepositoryError;
use crate::updates::category::CategoryUpdate;
use crate::updates::lesson::LessonUpdate;
use crate::updates::subject::SubjectUpdate;
use crate::updates::subject_name::SubjectNameUpdate;
use crate::updates::term::TermUpdate;
use crate::updates::week::WeekUpdate;
use crate::updates::year::YearUpdate;

/// A record kind the repository can create and patch.
pub trait Persist: Record {
    /// Payload for `create`.
    type Draft: Send + 'static;
    /// Payload for `update`.
    type Patch: Send + 'static;
}

macro_rules! impl_persist {
    ($($ty:ty => $draft:ty, $patch:ty);+ $(;)?) => {
        $(
            impl Persist for $ty {
                type Draft = $draft;
                type Patch = $patch;
            }
        )+
    };
}

impl_persist!(
    Year => YearDraft, YearUpdate;
    Category => CategoryDraft, CategoryUpdate;
    SubjectName => SubjectNameDraft, SubjectNameUpdate;
    Subject => SubjectDraft, SubjectUpdate;
    Term => TermDraft, TermUpdate;
    Week => WeekDraft, WeekUpdate;
    Lesson => LessonDraft, LessonUpdate;
);

/// CRUD and query operations for one entity kind.
#[async_trait]
pub trait EntityRepository<T: Persist>: Send + Sync {
    /// Every record of this kind.
    async fn list(&self) -> Result<Vec<T>, RepositoryError>;

    /// Records whose direct parent is `parent`: subjects by year, subject
    /// names by category, terms by subject, weeks by term, lessons by week.
    ///
    /// Years and categories have no parent and return
    /// [`RepositoryError::Unsupported`].
    async fn list_by(&self, parent: Id) -> Result<Vec<T>, RepositoryError>;

    async fn create(&self, draft: T::Draft) -> Result<T, RepositoryError>;

    async fn update(&self, id: Id, patch: T::Patch) -> Result<T, RepositoryError>;

    async fn delete(&self, id: Id) -> Result<(), RepositoryError>;
}

/// A backend serving every entity kind.
pub trait ContentRepository:
    EntityRepository<Year>
    + EntityRepository<Category>
    + EntityRepository<SubjectName>
    + EntityRepository<Subject>
    + EntityRepository<Term>
    + EntityRepository<Week>
    + EntityRepository<Lesson>
{
}

impl<R> ContentRepository for R where
    R: EntityRepository<Year>
        + EntityRepository<Category>
        + EntityRepository<SubjectName>
        + EntityRepository<Subject>
        + EntityRepository<Term>
        + EntityRepository<Week>
        + EntityRepository<Lesson>
{
}
