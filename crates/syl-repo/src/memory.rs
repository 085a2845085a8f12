//! In-memory content repository.
//!
//! Holds one table per kind in a [`Snapshot`] behind an async mutex. It
//! behaves like the REST backend where the engine can observe it: IDs are
//! assigned per kind, parents must exist on create, subjects get their
//! denormalized display fields filled in, and records with dependents cannot
//! be deleted. Switching it offline fails every call with
//! [`RepositoryError::Unavailable`].

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use syl_core::drafts::{
    CategoryDraft, LessonDraft, SubjectDraft, SubjectNameDraft, TermDraft, WeekDraft, YearDraft,
};
use syl_core::entities::{Category, Id, Lesson, Subject, SubjectName, Term, Week, Year};
use syl_core::fields::Field;
use syl_core::snapshot::Snapshot;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::RepositoryError;
use crate::repository::{EntityRepository, Persist};

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    tables: Mutex<Snapshot>,
    offline: AtomicBool,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of records, IDs kept as given.
    #[must_use]
    pub fn seeded(snapshot: Snapshot) -> Self {
        Self {
            tables: Mutex::new(snapshot),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// Copy of every table as currently stored.
    pub async fn snapshot(&self) -> Snapshot {
        self.tables.lock().await.clone()
    }

    fn ensure_online(&self) -> Result<(), RepositoryError> {
        if self.is_offline() {
            return Err(RepositoryError::Unavailable(
                "in-memory repository is offline".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-kind table access and payload handling for the in-memory backend.
pub trait Table: Persist {
    fn rows(snapshot: &Snapshot) -> &[Self];

    fn rows_mut(snapshot: &mut Snapshot) -> &mut Vec<Self>;

    /// The direct parent used by `list_by`, if this kind has one.
    fn parent_id(&self) -> Option<Id>;

    fn build(draft: Self::Draft, id: Id, snapshot: &Snapshot) -> Result<Self, RepositoryError>;

    fn apply(&mut self, patch: &Self::Patch) -> Result<(), RepositoryError>;

    /// Number of records that reference `id` as their parent.
    fn dependents(id: Id, snapshot: &Snapshot) -> usize;
}

fn required<T>(value: Option<T>, field: Field) -> Result<T, RepositoryError> {
    value.ok_or_else(|| RepositoryError::InvalidPayload(format!("{field} is required")))
}

fn count(value: i64, field: Field) -> Result<u32, RepositoryError> {
    u32::try_from(value)
        .map_err(|_| RepositoryError::InvalidPayload(format!("{field} out of range: {value}")))
}

fn parent<P: Table>(snapshot: &Snapshot, id: Id) -> Result<&P, RepositoryError> {
    P::rows(snapshot)
        .iter()
        .find(|row| row.id() == id)
        .ok_or(RepositoryError::MissingParent { kind: P::KIND, id })
}

fn non_blank(text: &str, field: Field) -> Result<String, RepositoryError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(RepositoryError::InvalidPayload(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

impl Table for Year {
    fn rows(snapshot: &Snapshot) -> &[Self] {
        &snapshot.years
    }

    fn rows_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.years
    }

    fn parent_id(&self) -> Option<Id> {
        None
    }

    fn build(draft: YearDraft, id: Id, _snapshot: &Snapshot) -> Result<Self, RepositoryError> {
        let year_number = required(draft.year_number, Field::YearNumber)?;
        Ok(Self {
            id,
            year_number: count(year_number, Field::YearNumber)?,
        })
    }

    fn apply(&mut self, patch: &Self::Patch) -> Result<(), RepositoryError> {
        patch.apply(self);
        Ok(())
    }

    fn dependents(id: Id, snapshot: &Snapshot) -> usize {
        snapshot.subjects.iter().filter(|s| s.year_id == id).count()
    }
}

impl Table for Category {
    fn rows(snapshot: &Snapshot) -> &[Self] {
        &snapshot.categories
    }

    fn rows_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.categories
    }

    fn parent_id(&self) -> Option<Id> {
        None
    }

    fn build(draft: CategoryDraft, id: Id, _snapshot: &Snapshot) -> Result<Self, RepositoryError> {
        Ok(Self {
            id,
            name: non_blank(&draft.name, Field::Name)?,
            description: draft.description,
            color: draft.color,
        })
    }

    fn apply(&mut self, patch: &Self::Patch) -> Result<(), RepositoryError> {
        patch.apply(self);
        Ok(())
    }

    fn dependents(id: Id, snapshot: &Snapshot) -> usize {
        snapshot
            .subject_names
            .iter()
            .filter(|n| n.category_id == id)
            .count()
    }
}

impl Table for SubjectName {
    fn rows(snapshot: &Snapshot) -> &[Self] {
        &snapshot.subject_names
    }

    fn rows_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.subject_names
    }

    fn parent_id(&self) -> Option<Id> {
        Some(self.category_id)
    }

    fn build(
        draft: SubjectNameDraft,
        id: Id,
        snapshot: &Snapshot,
    ) -> Result<Self, RepositoryError> {
        let category_id = required(draft.category_id, Field::CategoryId)?;
        parent::<Category>(snapshot, category_id)?;
        Ok(Self {
            id,
            name: non_blank(&draft.name, Field::Name)?,
            category_id,
        })
    }

    fn apply(&mut self, patch: &Self::Patch) -> Result<(), RepositoryError> {
        patch.apply(self);
        Ok(())
    }

    fn dependents(id: Id, snapshot: &Snapshot) -> usize {
        snapshot
            .subjects
            .iter()
            .filter(|s| s.subject_name_id == id)
            .count()
    }
}

impl Table for Subject {
    fn rows(snapshot: &Snapshot) -> &[Self] {
        &snapshot.subjects
    }

    fn rows_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.subjects
    }

    fn parent_id(&self) -> Option<Id> {
        Some(self.year_id)
    }

    fn build(draft: SubjectDraft, id: Id, snapshot: &Snapshot) -> Result<Self, RepositoryError> {
        let year_id = required(draft.year_id, Field::YearId)?;
        parent::<Year>(snapshot, year_id)?;
        let subject_name_id = required(draft.subject_name_id, Field::SubjectNameId)?;
        let subject_name = parent::<SubjectName>(snapshot, subject_name_id)?;
        if let Some(chosen) = draft.category_id.filter(|c| *c != subject_name.category_id) {
            return Err(RepositoryError::Conflict(format!(
                "subject name {subject_name_id} belongs to category {}, not {chosen}",
                subject_name.category_id
            )));
        }
        let category_name = parent::<Category>(snapshot, subject_name.category_id)
            .ok()
            .map(|c| c.name.clone());
        let duration = draft
            .duration
            .map(|d| count(d, Field::Duration))
            .transpose()?;

        Ok(Self {
            id,
            year_id,
            subject_name_id,
            category_id: Some(subject_name.category_id),
            subject_name: subject_name.name.clone(),
            category_name,
            price: required(draft.price, Field::Price)?,
            discount: draft.discount,
            level: draft.level,
            duration,
            teacher_id: draft.teacher_id,
            teacher_name: None,
            start_date: draft.start_date,
            description: draft.description,
        })
    }

    fn apply(&mut self, patch: &Self::Patch) -> Result<(), RepositoryError> {
        patch.apply(self);
        Ok(())
    }

    fn dependents(id: Id, snapshot: &Snapshot) -> usize {
        snapshot.terms.iter().filter(|t| t.subject_id == id).count()
            + snapshot.lessons.iter().filter(|l| l.subject_id == id).count()
    }
}

impl Table for Term {
    fn rows(snapshot: &Snapshot) -> &[Self] {
        &snapshot.terms
    }

    fn rows_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.terms
    }

    fn parent_id(&self) -> Option<Id> {
        Some(self.subject_id)
    }

    fn build(draft: TermDraft, id: Id, snapshot: &Snapshot) -> Result<Self, RepositoryError> {
        let subject_id = required(draft.subject_id, Field::SubjectId)?;
        parent::<Subject>(snapshot, subject_id)?;
        let term_number = required(draft.term_number, Field::TermNumber)?;
        Ok(Self {
            id,
            subject_id,
            term_number: count(term_number, Field::TermNumber)?,
            start_date: draft.start_date,
        })
    }

    fn apply(&mut self, patch: &Self::Patch) -> Result<(), RepositoryError> {
        patch.apply(self);
        Ok(())
    }

    fn dependents(id: Id, snapshot: &Snapshot) -> usize {
        snapshot.weeks.iter().filter(|w| w.term_id == id).count()
    }
}

impl Table for Week {
    fn rows(snapshot: &Snapshot) -> &[Self] {
        &snapshot.weeks
    }

    fn rows_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.weeks
    }

    fn parent_id(&self) -> Option<Id> {
        Some(self.term_id)
    }

    fn build(draft: WeekDraft, id: Id, snapshot: &Snapshot) -> Result<Self, RepositoryError> {
        let term_id = required(draft.term_id, Field::TermId)?;
        parent::<Term>(snapshot, term_id)?;
        let week_number = required(draft.week_number, Field::WeekNumber)?;
        Ok(Self {
            id,
            term_id,
            week_number: count(week_number, Field::WeekNumber)?,
            start_date: draft.start_date,
        })
    }

    fn apply(&mut self, patch: &Self::Patch) -> Result<(), RepositoryError> {
        patch.apply(self);
        Ok(())
    }

    fn dependents(id: Id, snapshot: &Snapshot) -> usize {
        snapshot
            .lessons
            .iter()
            .filter(|l| l.week_id == Some(id))
            .count()
    }
}

impl Table for Lesson {
    fn rows(snapshot: &Snapshot) -> &[Self] {
        &snapshot.lessons
    }

    fn rows_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.lessons
    }

    fn parent_id(&self) -> Option<Id> {
        self.week_id
    }

    fn build(draft: LessonDraft, id: Id, snapshot: &Snapshot) -> Result<Self, RepositoryError> {
        // A lesson under a week belongs to that week's subject.
        let week_subject = match draft.week_id {
            Some(week_id) => {
                let week = parent::<Week>(snapshot, week_id)?;
                Some(parent::<Term>(snapshot, week.term_id)?.subject_id)
            }
            None => None,
        };
        let subject_id = match (draft.subject_id, week_subject) {
            (Some(chosen), Some(derived)) if chosen != derived => {
                return Err(RepositoryError::Conflict(format!(
                    "week belongs to subject {derived}, lesson names subject {chosen}"
                )));
            }
            (chosen, derived) => required(chosen.or(derived), Field::SubjectId)?,
        };
        parent::<Subject>(snapshot, subject_id)?;
        let order_index = draft
            .order_index
            .map(|i| count(i, Field::OrderIndex))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            id,
            week_id: draft.week_id,
            subject_id,
            title: non_blank(&draft.title, Field::Title)?,
            description: draft.description,
            video_url: draft.video_url,
            pdf_url: draft.pdf_url,
            order_index,
            status: draft.status,
        })
    }

    fn apply(&mut self, patch: &Self::Patch) -> Result<(), RepositoryError> {
        let current = self.status;
        if let Some(next) = patch
            .status
            .filter(|next| *next != current && !current.can_transition_to(*next))
        {
            return Err(RepositoryError::Conflict(format!(
                "lesson {} cannot move from {} to {next}",
                self.id, self.status
            )));
        }
        patch.apply(self);
        Ok(())
    }

    fn dependents(_id: Id, _snapshot: &Snapshot) -> usize {
        0
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

#[async_trait]
impl<T: Table> EntityRepository<T> for InMemoryRepository {
    async fn list(&self) -> Result<Vec<T>, RepositoryError> {
        self.ensure_online()?;
        let tables = self.tables.lock().await;
        Ok(T::rows(&tables).to_vec())
    }

    async fn list_by(&self, parent: Id) -> Result<Vec<T>, RepositoryError> {
        self.ensure_online()?;
        if T::KIND.parent_kind().is_none() {
            return Err(RepositoryError::Unsupported {
                operation: "list_by",
                kind: T::KIND,
            });
        }
        let tables = self.tables.lock().await;
        Ok(T::rows(&tables)
            .iter()
            .filter(|row| row.parent_id() == Some(parent))
            .cloned()
            .collect())
    }

    async fn create(&self, draft: T::Draft) -> Result<T, RepositoryError> {
        self.ensure_online()?;
        let mut tables = self.tables.lock().await;
        let id = T::rows(&tables)
            .iter()
            .map(|row| row.id())
            .max()
            .unwrap_or(0)
            + 1;
        let record = T::build(draft, id, &tables)?;
        T::rows_mut(&mut tables).push(record.clone());
        info!(kind = %T::KIND, id, "created");
        Ok(record)
    }

    async fn update(&self, id: Id, patch: T::Patch) -> Result<T, RepositoryError> {
        self.ensure_online()?;
        let mut tables = self.tables.lock().await;
        let row = T::rows_mut(&mut tables)
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or(RepositoryError::NotFound { kind: T::KIND, id })?;
        row.apply(&patch)?;
        info!(kind = %T::KIND, id, "updated");
        Ok(row.clone())
    }

    async fn delete(&self, id: Id) -> Result<(), RepositoryError> {
        self.ensure_online()?;
        let mut tables = self.tables.lock().await;
        let position = T::rows(&tables)
            .iter()
            .position(|row| row.id() == id)
            .ok_or(RepositoryError::NotFound { kind: T::KIND, id })?;
        let dependents = T::dependents(id, &tables);
        if dependents > 0 {
            debug!(kind = %T::KIND, id, dependents, "delete refused");
            return Err(RepositoryError::Conflict(format!(
                "{} {id} still has {dependents} dependent record(s)",
                T::KIND
            )));
        }
        T::rows_mut(&mut tables).remove(position);
        info!(kind = %T::KIND, id, "deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::updates::lesson::LessonUpdateBuilder;
    use pretty_assertions::assert_eq;
    use syl_core::enums::{EntityKind, LessonStatus};

    fn seed() -> Snapshot {
        Snapshot {
            years: vec![Year {
                id: 1,
                year_number: 7,
            }],
            categories: vec![Category {
                id: 1,
                name: "Mathematics".into(),
                description: String::new(),
                color: None,
            }],
            subject_names: vec![SubjectName {
                id: 1,
                name: "Algebra".into(),
                category_id: 1,
            }],
            ..Snapshot::default()
        }
    }

    #[tokio::test]
    async fn create_subject_fills_display_fields() {
        let repo = InMemoryRepository::seeded(seed());
        let subject = EntityRepository::<Subject>::create(
            &repo,
            SubjectDraft {
                year_id: Some(1),
                subject_name_id: Some(1),
                price: Some(20.0),
                ..SubjectDraft::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(subject.id, 1);
        assert_eq!(subject.subject_name, "Algebra");
        assert_eq!(subject.category_id, Some(1));
        assert_eq!(subject.category_name.as_deref(), Some("Mathematics"));
    }

    #[tokio::test]
    async fn create_rejects_missing_parent() {
        let repo = InMemoryRepository::seeded(seed());
        let err = EntityRepository::<Term>::create(
            &repo,
            TermDraft {
                subject_id: Some(42),
                term_number: Some(1),
                ..TermDraft::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::MissingParent {
                kind: EntityKind::Subject,
                id: 42
            }
        ));
    }

    #[tokio::test]
    async fn lesson_status_patch_follows_workflow() {
        let mut snapshot = seed();
        snapshot.lessons.push(Lesson {
            id: 5,
            week_id: None,
            subject_id: 1,
            title: "Intro".into(),
            description: None,
            video_url: None,
            pdf_url: None,
            order_index: 0,
            status: LessonStatus::Created,
        });
        let repo = InMemoryRepository::seeded(snapshot);

        let err = EntityRepository::<Lesson>::update(
            &repo,
            5,
            LessonUpdateBuilder::new()
                .status(LessonStatus::Published)
                .build(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let lesson = EntityRepository::<Lesson>::update(
            &repo,
            5,
            LessonUpdateBuilder::new()
                .status(LessonStatus::Submitted)
                .build(),
        )
        .await
        .unwrap();
        assert_eq!(lesson.status, LessonStatus::Submitted);
    }
}
