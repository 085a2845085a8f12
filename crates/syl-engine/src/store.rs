//! The entity store: every collection as last fetched, with ID indexes.
//!
//! The store is replaced wholesale on reload. The only incremental changes are
//! the optimistic upserts and removals made by the add/edit flow, and
//! per-kind slice replacement from a filtered fetch.

use serde::Serialize;
use std::collections::HashMap;
use syl_core::entities::{Category, Entity, Id, Lesson, Subject, SubjectName, Term, Week, Year};
use syl_core::enums::EntityKind;
use syl_core::fields::Field;
use syl_core::snapshot::Snapshot;
use tracing::debug;

/// All records of one kind, used when a single kind is reloaded.
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    Years(Vec<Year>),
    Categories(Vec<Category>),
    SubjectNames(Vec<SubjectName>),
    Subjects(Vec<Subject>),
    Terms(Vec<Term>),
    Weeks(Vec<Week>),
    Lessons(Vec<Lesson>),
}

impl Collection {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Years(_) => EntityKind::Year,
            Self::Categories(_) => EntityKind::Category,
            Self::SubjectNames(_) => EntityKind::SubjectName,
            Self::Subjects(_) => EntityKind::Subject,
            Self::Terms(_) => EntityKind::Term,
            Self::Weeks(_) => EntityKind::Week,
            Self::Lessons(_) => EntityKind::Lesson,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Years(v) => v.len(),
            Self::Categories(v) => v.len(),
            Self::SubjectNames(v) => v.len(),
            Self::Subjects(v) => v.len(),
            Self::Terms(v) => v.len(),
            Self::Weeks(v) => v.len(),
            Self::Lessons(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolved ancestors of one record. An ancestor whose reference dangles is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lineage {
    pub year: Option<Id>,
    pub category: Option<Id>,
    pub subject_name: Option<Id>,
    pub subject: Option<Id>,
    pub term: Option<Id>,
    pub week: Option<Id>,
}

/// What is wrong with a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Problem {
    /// The referenced record does not exist.
    Dangling,
    /// A lesson's week belongs to a different subject than the lesson names.
    SubjectMismatch,
}

/// A reference in the store that does not hold up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferentialInconsistency {
    pub kind: EntityKind,
    pub id: Id,
    pub field: Field,
    /// The referenced ID (for a subject mismatch, the subject the week leads to).
    pub reference: Id,
    pub problem: Problem,
}

#[derive(Debug, Clone, Default)]
struct Indexes {
    years: HashMap<Id, usize>,
    categories: HashMap<Id, usize>,
    subject_names: HashMap<Id, usize>,
    subjects: HashMap<Id, usize>,
    terms: HashMap<Id, usize>,
    weeks: HashMap<Id, usize>,
    lessons: HashMap<Id, usize>,
}

fn index_of<T>(rows: &[T], id: impl Fn(&T) -> Id) -> HashMap<Id, usize> {
    rows.iter().enumerate().map(|(i, row)| (id(row), i)).collect()
}

/// In-memory mapping from entity kind to its full collection.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    data: Snapshot,
    idx: Indexes,
}

impl EntityStore {
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        let mut store = Self {
            data: snapshot,
            idx: Indexes::default(),
        };
        store.reindex_all();
        store
    }

    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.data
    }

    #[must_use]
    pub fn into_snapshot(self) -> Snapshot {
        self.data
    }

    fn reindex_all(&mut self) {
        for kind in EntityKind::ALL {
            self.reindex(kind);
        }
    }

    fn reindex(&mut self, kind: EntityKind) {
        match kind {
            EntityKind::Year => self.idx.years = index_of(&self.data.years, |e| e.id),
            EntityKind::Category => {
                self.idx.categories = index_of(&self.data.categories, |e| e.id);
            }
            EntityKind::SubjectName => {
                self.idx.subject_names = index_of(&self.data.subject_names, |e| e.id);
            }
            EntityKind::Subject => self.idx.subjects = index_of(&self.data.subjects, |e| e.id),
            EntityKind::Term => self.idx.terms = index_of(&self.data.terms, |e| e.id),
            EntityKind::Week => self.idx.weeks = index_of(&self.data.weeks, |e| e.id),
            EntityKind::Lesson => self.idx.lessons = index_of(&self.data.lessons, |e| e.id),
        }
    }

    // -- collections ---------------------------------------------------------

    #[must_use]
    pub fn years(&self) -> &[Year] {
        &self.data.years
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    #[must_use]
    pub fn subject_names(&self) -> &[SubjectName] {
        &self.data.subject_names
    }

    #[must_use]
    pub fn subjects(&self) -> &[Subject] {
        &self.data.subjects
    }

    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.data.terms
    }

    #[must_use]
    pub fn weeks(&self) -> &[Week] {
        &self.data.weeks
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.data.lessons
    }

    #[must_use]
    pub fn len(&self, kind: EntityKind) -> usize {
        self.data.count(kind)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.total() == 0
    }

    // -- lookups -------------------------------------------------------------

    #[must_use]
    pub fn year(&self, id: Id) -> Option<&Year> {
        self.idx.years.get(&id).and_then(|i| self.data.years.get(*i))
    }

    #[must_use]
    pub fn category(&self, id: Id) -> Option<&Category> {
        self.idx
            .categories
            .get(&id)
            .and_then(|i| self.data.categories.get(*i))
    }

    #[must_use]
    pub fn subject_name(&self, id: Id) -> Option<&SubjectName> {
        self.idx
            .subject_names
            .get(&id)
            .and_then(|i| self.data.subject_names.get(*i))
    }

    #[must_use]
    pub fn subject(&self, id: Id) -> Option<&Subject> {
        self.idx
            .subjects
            .get(&id)
            .and_then(|i| self.data.subjects.get(*i))
    }

    #[must_use]
    pub fn term(&self, id: Id) -> Option<&Term> {
        self.idx.terms.get(&id).and_then(|i| self.data.terms.get(*i))
    }

    #[must_use]
    pub fn week(&self, id: Id) -> Option<&Week> {
        self.idx.weeks.get(&id).and_then(|i| self.data.weeks.get(*i))
    }

    #[must_use]
    pub fn lesson(&self, id: Id) -> Option<&Lesson> {
        self.idx
            .lessons
            .get(&id)
            .and_then(|i| self.data.lessons.get(*i))
    }

    #[must_use]
    pub fn contains(&self, kind: EntityKind, id: Id) -> bool {
        match kind {
            EntityKind::Year => self.idx.years.contains_key(&id),
            EntityKind::Category => self.idx.categories.contains_key(&id),
            EntityKind::SubjectName => self.idx.subject_names.contains_key(&id),
            EntityKind::Subject => self.idx.subjects.contains_key(&id),
            EntityKind::Term => self.idx.terms.contains_key(&id),
            EntityKind::Week => self.idx.weeks.contains_key(&id),
            EntityKind::Lesson => self.idx.lessons.contains_key(&id),
        }
    }

    /// Look up any record as an [`Entity`].
    #[must_use]
    pub fn get(&self, kind: EntityKind, id: Id) -> Option<Entity> {
        match kind {
            EntityKind::Year => self.year(id).cloned().map(Entity::from),
            EntityKind::Category => self.category(id).cloned().map(Entity::from),
            EntityKind::SubjectName => self.subject_name(id).cloned().map(Entity::from),
            EntityKind::Subject => self.subject(id).cloned().map(Entity::from),
            EntityKind::Term => self.term(id).cloned().map(Entity::from),
            EntityKind::Week => self.week(id).cloned().map(Entity::from),
            EntityKind::Lesson => self.lesson(id).cloned().map(Entity::from),
        }
    }

    // -- mutation ------------------------------------------------------------

    /// Replace one kind's slice, leaving the others untouched.
    pub fn replace(&mut self, collection: Collection) {
        let kind = collection.kind();
        match collection {
            Collection::Years(rows) => self.data.years = rows,
            Collection::Categories(rows) => self.data.categories = rows,
            Collection::SubjectNames(rows) => self.data.subject_names = rows,
            Collection::Subjects(rows) => self.data.subjects = rows,
            Collection::Terms(rows) => self.data.terms = rows,
            Collection::Weeks(rows) => self.data.weeks = rows,
            Collection::Lessons(rows) => self.data.lessons = rows,
        }
        self.reindex(kind);
    }

    /// Insert a record, or replace the one with the same ID in place.
    pub fn upsert(&mut self, entity: Entity) {
        let kind = entity.kind();
        let id = entity.id();
        let position = self.position(kind, id);
        match entity {
            Entity::Year(e) => put(&mut self.data.years, position, e),
            Entity::Category(e) => put(&mut self.data.categories, position, e),
            Entity::SubjectName(e) => put(&mut self.data.subject_names, position, e),
            Entity::Subject(e) => put(&mut self.data.subjects, position, e),
            Entity::Term(e) => put(&mut self.data.terms, position, e),
            Entity::Week(e) => put(&mut self.data.weeks, position, e),
            Entity::Lesson(e) => put(&mut self.data.lessons, position, e),
        }
        self.reindex(kind);
    }

    /// Drop a record. Returns whether it was present.
    pub fn remove(&mut self, kind: EntityKind, id: Id) -> bool {
        let Some(position) = self.position(kind, id) else {
            return false;
        };
        match kind {
            EntityKind::Year => {
                self.data.years.remove(position);
            }
            EntityKind::Category => {
                self.data.categories.remove(position);
            }
            EntityKind::SubjectName => {
                self.data.subject_names.remove(position);
            }
            EntityKind::Subject => {
                self.data.subjects.remove(position);
            }
            EntityKind::Term => {
                self.data.terms.remove(position);
            }
            EntityKind::Week => {
                self.data.weeks.remove(position);
            }
            EntityKind::Lesson => {
                self.data.lessons.remove(position);
            }
        }
        self.reindex(kind);
        true
    }

    fn position(&self, kind: EntityKind, id: Id) -> Option<usize> {
        let index = match kind {
            EntityKind::Year => &self.idx.years,
            EntityKind::Category => &self.idx.categories,
            EntityKind::SubjectName => &self.idx.subject_names,
            EntityKind::Subject => &self.idx.subjects,
            EntityKind::Term => &self.idx.terms,
            EntityKind::Week => &self.idx.weeks,
            EntityKind::Lesson => &self.idx.lessons,
        };
        index.get(&id).copied()
    }

    // -- lineage -------------------------------------------------------------

    #[must_use]
    pub fn subject_name_lineage(&self, subject_name: &SubjectName) -> Lineage {
        Lineage {
            category: self.resolve(EntityKind::Category, subject_name.category_id),
            ..Lineage::default()
        }
    }

    /// A subject's category comes from its subject name, falling back to its
    /// own `category_id` when the subject name is missing.
    #[must_use]
    pub fn subject_lineage(&self, subject: &Subject) -> Lineage {
        let subject_name = self.resolve(EntityKind::SubjectName, subject.subject_name_id);
        let category = subject_name
            .and_then(|id| self.subject_name(id))
            .map(|n| n.category_id)
            .or(subject.category_id)
            .and_then(|id| self.resolve(EntityKind::Category, id));
        Lineage {
            year: self.resolve(EntityKind::Year, subject.year_id),
            category,
            subject_name,
            subject: Some(subject.id),
            term: None,
            week: None,
        }
    }

    #[must_use]
    pub fn term_lineage(&self, term: &Term) -> Lineage {
        let mut lineage = self.subject_lineage_by_id(term.subject_id);
        lineage.term = Some(term.id);
        lineage
    }

    #[must_use]
    pub fn week_lineage(&self, week: &Week) -> Lineage {
        let mut lineage = match self.term(week.term_id) {
            Some(term) => self.term_lineage(term),
            None => {
                debug!(kind = %EntityKind::Week, id = week.id, term_id = week.term_id, "dangling term reference");
                Lineage::default()
            }
        };
        lineage.week = Some(week.id);
        lineage
    }

    /// A lesson's subject comes from `subject_id`; its term and week from `week_id`.
    #[must_use]
    pub fn lesson_lineage(&self, lesson: &Lesson) -> Lineage {
        let mut lineage = self.subject_lineage_by_id(lesson.subject_id);
        if let Some(week_id) = lesson.week_id {
            match self.week(week_id) {
                Some(week) => {
                    lineage.week = Some(week.id);
                    lineage.term = self.resolve(EntityKind::Term, week.term_id);
                }
                None => {
                    debug!(kind = %EntityKind::Lesson, id = lesson.id, week_id, "dangling week reference");
                }
            }
        }
        lineage
    }

    fn subject_lineage_by_id(&self, subject_id: Id) -> Lineage {
        self.subject(subject_id).map_or_else(
            || {
                debug!(kind = %EntityKind::Subject, id = subject_id, "dangling subject reference");
                Lineage::default()
            },
            |subject| self.subject_lineage(subject),
        )
    }

    fn resolve(&self, kind: EntityKind, id: Id) -> Option<Id> {
        if self.contains(kind, id) {
            Some(id)
        } else {
            debug!(%kind, id, "dangling reference");
            None
        }
    }

    /// Subject a week belongs to, through its term.
    #[must_use]
    pub fn week_subject(&self, week_id: Id) -> Option<Id> {
        self.week(week_id)
            .and_then(|w| self.term(w.term_id))
            .map(|t| t.subject_id)
    }

    /// Every reference that does not resolve, plus lessons whose week leads
    /// to a different subject than the lesson names.
    #[must_use]
    pub fn check_consistency(&self) -> Vec<ReferentialInconsistency> {
        let mut found = Vec::new();
        let mut dangling = |kind, id, field, reference, present: bool| {
            if !present {
                found.push(ReferentialInconsistency {
                    kind,
                    id,
                    field,
                    reference,
                    problem: Problem::Dangling,
                });
            }
        };

        for n in self.subject_names() {
            let present = self.contains(EntityKind::Category, n.category_id);
            dangling(EntityKind::SubjectName, n.id, Field::CategoryId, n.category_id, present);
        }
        for s in self.subjects() {
            let year = self.contains(EntityKind::Year, s.year_id);
            dangling(EntityKind::Subject, s.id, Field::YearId, s.year_id, year);
            let name = self.contains(EntityKind::SubjectName, s.subject_name_id);
            dangling(EntityKind::Subject, s.id, Field::SubjectNameId, s.subject_name_id, name);
        }
        for t in self.terms() {
            let present = self.contains(EntityKind::Subject, t.subject_id);
            dangling(EntityKind::Term, t.id, Field::SubjectId, t.subject_id, present);
        }
        for w in self.weeks() {
            let present = self.contains(EntityKind::Term, w.term_id);
            dangling(EntityKind::Week, w.id, Field::TermId, w.term_id, present);
        }
        for l in self.lessons() {
            let present = self.contains(EntityKind::Subject, l.subject_id);
            dangling(EntityKind::Lesson, l.id, Field::SubjectId, l.subject_id, present);
            if let Some(week_id) = l.week_id {
                let present = self.contains(EntityKind::Week, week_id);
                dangling(EntityKind::Lesson, l.id, Field::WeekId, week_id, present);
            }
        }

        for l in self.lessons() {
            let Some(week_subject) = l.week_id.and_then(|w| self.week_subject(w)) else {
                continue;
            };
            if week_subject != l.subject_id {
                found.push(ReferentialInconsistency {
                    kind: EntityKind::Lesson,
                    id: l.id,
                    field: Field::WeekId,
                    reference: week_subject,
                    problem: Problem::SubjectMismatch,
                });
            }
        }
        found
    }
}

fn put<T>(rows: &mut Vec<T>, position: Option<usize>, row: T) {
    match position.and_then(|i| rows.get_mut(i)) {
        Some(slot) => *slot = row,
        None => rows.push(row),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use syl_core::enums::LessonStatus;

    fn lesson(id: Id, week_id: Option<Id>, subject_id: Id) -> Lesson {
        Lesson {
            id,
            week_id,
            subject_id,
            title: format!("Lesson {id}"),
            description: None,
            video_url: None,
            pdf_url: None,
            order_index: 0,
            status: LessonStatus::Created,
        }
    }

    fn store() -> EntityStore {
        EntityStore::new(Snapshot {
            years: vec![Year {
                id: 1,
                year_number: 7,
            }],
            subjects: vec![Subject {
                id: 10,
                year_id: 1,
                subject_name_id: 99,
                category_id: None,
                subject_name: "Algebra".into(),
                category_name: None,
                price: 0.0,
                discount: None,
                level: None,
                duration: None,
                teacher_id: None,
                teacher_name: None,
                start_date: None,
                description: None,
            }],
            terms: vec![Term {
                id: 20,
                subject_id: 10,
                term_number: 1,
                start_date: None,
            }],
            weeks: vec![Week {
                id: 30,
                term_id: 20,
                week_number: 1,
                start_date: None,
            }],
            lessons: vec![lesson(40, Some(30), 10), lesson(41, Some(77), 10)],
            ..Snapshot::default()
        })
    }

    #[test]
    fn lesson_lineage_walks_week_chain() {
        let store = store();
        let lineage = store.lesson_lineage(store.lesson(40).unwrap());
        assert_eq!(
            lineage,
            Lineage {
                year: Some(1),
                category: None,
                subject_name: None,
                subject: Some(10),
                term: Some(20),
                week: Some(30),
            }
        );
    }

    #[test]
    fn dangling_week_leaves_term_and_week_unresolved() {
        let store = store();
        let lineage = store.lesson_lineage(store.lesson(41).unwrap());
        assert_eq!(lineage.subject, Some(10));
        assert_eq!(lineage.week, None);
        assert_eq!(lineage.term, None);
    }

    #[test]
    fn upsert_replaces_in_place_and_appends_new() {
        let mut store = store();
        store.upsert(Entity::from(Term {
            id: 20,
            subject_id: 10,
            term_number: 4,
            start_date: None,
        }));
        store.upsert(Entity::from(Term {
            id: 21,
            subject_id: 10,
            term_number: 5,
            start_date: None,
        }));
        let numbers: Vec<u32> = store.terms().iter().map(|t| t.term_number).collect();
        assert_eq!(numbers, vec![4, 5]);
        assert_eq!(store.term(21).map(|t| t.term_number), Some(5));
    }

    #[test]
    fn remove_reindexes() {
        let mut store = store();
        assert!(store.remove(EntityKind::Lesson, 40));
        assert!(!store.remove(EntityKind::Lesson, 40));
        assert_eq!(store.lesson(41).map(|l| l.id), Some(41));
        assert!(store.lesson(40).is_none());
    }

    #[test]
    fn consistency_report_names_each_broken_reference() {
        let mut store = store();
        store.upsert(Entity::from(lesson(42, Some(30), 11)));
        let report = store.check_consistency();

        assert!(report.contains(&ReferentialInconsistency {
            kind: EntityKind::Subject,
            id: 10,
            field: Field::SubjectNameId,
            reference: 99,
            problem: Problem::Dangling,
        }));
        assert!(report.contains(&ReferentialInconsistency {
            kind: EntityKind::Lesson,
            id: 41,
            field: Field::WeekId,
            reference: 77,
            problem: Problem::Dangling,
        }));
        assert!(report.contains(&ReferentialInconsistency {
            kind: EntityKind::Lesson,
            id: 42,
            field: Field::WeekId,
            reference: 10,
            problem: Problem::SubjectMismatch,
        }));
    }
}
