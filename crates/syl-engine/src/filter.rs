//! The filter engine.
//!
//! [`compute_filtered`] is a pure function from `(store, search term,
//! selectors)` to the seven visible collections. Each output is a
//! subsequence of the store's collection in store order.
//!
//! A search term restricts subjects by name. Every other kind in the
//! Year → Lesson descent is visible when it sits on the path of a matching
//! subject: a year with a matching subject under it, a term/week/lesson whose
//! subject matches. Categories and subject names ignore the search term.
//!
//! A selector restricts the kinds below it, transitively, through each
//! record's resolved [`Lineage`]. Records with dangling references do not
//! pass a selector they cannot be traced to and never match a search.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use syl_core::entities::{Category, Entity, Id, Lesson, Subject, SubjectName, Term, Week, Year};
use syl_core::enums::EntityKind;
use syl_core::fields::Field;

use crate::pagination;
use crate::store::{EntityStore, Lineage};

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// A selectable ancestor filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorField {
    Year,
    Category,
    Subject,
    Term,
    Week,
}

impl SelectorField {
    pub const ALL: [Self; 5] = [
        Self::Year,
        Self::Category,
        Self::Subject,
        Self::Term,
        Self::Week,
    ];

    /// Kinds this selector restricts.
    #[must_use]
    pub const fn restricts(self) -> &'static [EntityKind] {
        match self {
            Self::Year => &[
                EntityKind::Subject,
                EntityKind::Term,
                EntityKind::Week,
                EntityKind::Lesson,
            ],
            Self::Category => &[
                EntityKind::Category,
                EntityKind::SubjectName,
                EntityKind::Subject,
                EntityKind::Term,
                EntityKind::Week,
                EntityKind::Lesson,
            ],
            Self::Subject => &[EntityKind::Term, EntityKind::Week, EntityKind::Lesson],
            Self::Term => &[EntityKind::Week, EntityKind::Lesson],
            Self::Week => &[EntityKind::Lesson],
        }
    }

    /// The form field holding the same ancestor.
    #[must_use]
    pub const fn field(self) -> Field {
        match self {
            Self::Year => Field::YearId,
            Self::Category => Field::CategoryId,
            Self::Subject => Field::SubjectId,
            Self::Term => Field::TermId,
            Self::Week => Field::WeekId,
        }
    }

    const fn pick(self, lineage: &Lineage) -> Option<Id> {
        match self {
            Self::Year => lineage.year,
            Self::Category => lineage.category,
            Self::Subject => lineage.subject,
            Self::Term => lineage.term,
            Self::Week => lineage.week,
        }
    }
}

/// Selected ancestor IDs. `None` means "no restriction".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selectors {
    pub year_id: Option<Id>,
    pub category_id: Option<Id>,
    pub subject_id: Option<Id>,
    pub term_id: Option<Id>,
    pub week_id: Option<Id>,
}

impl Selectors {
    #[must_use]
    pub const fn get(&self, field: SelectorField) -> Option<Id> {
        match field {
            SelectorField::Year => self.year_id,
            SelectorField::Category => self.category_id,
            SelectorField::Subject => self.subject_id,
            SelectorField::Term => self.term_id,
            SelectorField::Week => self.week_id,
        }
    }

    pub fn set(&mut self, field: SelectorField, id: Option<Id>) {
        match field {
            SelectorField::Year => self.year_id = id,
            SelectorField::Category => self.category_id = id,
            SelectorField::Subject => self.subject_id = id,
            SelectorField::Term => self.term_id = id,
            SelectorField::Week => self.week_id = id,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        SelectorField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Whether a record of `kind` with this lineage passes every active
    /// selector that restricts `kind`.
    #[must_use]
    pub fn admits(&self, kind: EntityKind, lineage: &Lineage) -> bool {
        SelectorField::ALL.iter().all(|field| {
            match self.get(*field) {
                Some(selected) if field.restricts().contains(&kind) => {
                    field.pick(lineage) == Some(selected)
                }
                _ => true,
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// A normalized search term. Whitespace-only input is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    #[must_use]
    pub fn new(term: &str) -> Self {
        Self(term.trim().to_lowercase())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Case-insensitive substring match on the subject's display name,
    /// falling back to its subject name record when the display name is blank.
    #[must_use]
    pub fn matches_subject(&self, store: &EntityStore, subject: &Subject) -> bool {
        if self.is_empty() {
            return true;
        }
        let display = subject.subject_name.trim();
        let name = if display.is_empty() {
            store
                .subject_name(subject.subject_name_id)
                .map_or("", |n| n.name.as_str())
        } else {
            display
        };
        name.to_lowercase().contains(&self.0)
    }

    /// Whether the subject on this lineage matches. An unresolved subject never does.
    #[must_use]
    pub fn matches_lineage(&self, store: &EntityStore, lineage: &Lineage) -> bool {
        if self.is_empty() {
            return true;
        }
        lineage
            .subject
            .and_then(|id| store.subject(id))
            .is_some_and(|subject| self.matches_subject(store, subject))
    }
}

// ---------------------------------------------------------------------------
// Filtered views
// ---------------------------------------------------------------------------

/// The seven visible collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredViews {
    pub years: Vec<Year>,
    pub categories: Vec<Category>,
    pub subject_names: Vec<SubjectName>,
    pub subjects: Vec<Subject>,
    pub terms: Vec<Term>,
    pub weeks: Vec<Week>,
    pub lessons: Vec<Lesson>,
}

impl FilteredViews {
    #[must_use]
    pub fn len(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Year => self.years.len(),
            EntityKind::Category => self.categories.len(),
            EntityKind::SubjectName => self.subject_names.len(),
            EntityKind::Subject => self.subjects.len(),
            EntityKind::Term => self.terms.len(),
            EntityKind::Week => self.weeks.len(),
            EntityKind::Lesson => self.lessons.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        EntityKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    /// IDs of the visible records of one kind, in order.
    #[must_use]
    pub fn ids(&self, kind: EntityKind) -> Vec<Id> {
        match kind {
            EntityKind::Year => self.years.iter().map(|e| e.id).collect(),
            EntityKind::Category => self.categories.iter().map(|e| e.id).collect(),
            EntityKind::SubjectName => self.subject_names.iter().map(|e| e.id).collect(),
            EntityKind::Subject => self.subjects.iter().map(|e| e.id).collect(),
            EntityKind::Term => self.terms.iter().map(|e| e.id).collect(),
            EntityKind::Week => self.weeks.iter().map(|e| e.id).collect(),
            EntityKind::Lesson => self.lessons.iter().map(|e| e.id).collect(),
        }
    }

    /// One page of one kind, as tagged entities.
    #[must_use]
    pub fn page(&self, kind: EntityKind, number: usize, size: usize) -> Vec<Entity> {
        fn slice<T: Clone + Into<Entity>>(rows: &[T], number: usize, size: usize) -> Vec<Entity> {
            pagination::page(rows, number, size)
                .iter()
                .cloned()
                .map(Into::into)
                .collect()
        }
        match kind {
            EntityKind::Year => slice(&self.years, number, size),
            EntityKind::Category => slice(&self.categories, number, size),
            EntityKind::SubjectName => slice(&self.subject_names, number, size),
            EntityKind::Subject => slice(&self.subjects, number, size),
            EntityKind::Term => slice(&self.terms, number, size),
            EntityKind::Week => slice(&self.weeks, number, size),
            EntityKind::Lesson => slice(&self.lessons, number, size),
        }
    }
}

/// Compute every visible collection.
#[must_use]
pub fn compute_filtered(store: &EntityStore, search: &str, selectors: &Selectors) -> FilteredViews {
    let query = SearchQuery::new(search);

    let matching_years: Option<HashSet<Id>> = (!query.is_empty()).then(|| {
        store
            .subjects()
            .iter()
            .filter(|s| query.matches_subject(store, s))
            .map(|s| s.year_id)
            .collect()
    });

    FilteredViews {
        years: store
            .years()
            .iter()
            .filter(|y| matching_years.as_ref().is_none_or(|ids| ids.contains(&y.id)))
            .cloned()
            .collect(),
        categories: store
            .categories()
            .iter()
            .filter(|c| selectors.category_id.is_none_or(|id| id == c.id))
            .cloned()
            .collect(),
        subject_names: store
            .subject_names()
            .iter()
            .filter(|n| selectors.admits(EntityKind::SubjectName, &store.subject_name_lineage(n)))
            .cloned()
            .collect(),
        subjects: store
            .subjects()
            .iter()
            .filter(|s| {
                query.matches_subject(store, s)
                    && selectors.admits(EntityKind::Subject, &store.subject_lineage(s))
            })
            .cloned()
            .collect(),
        terms: store
            .terms()
            .iter()
            .filter(|t| visible(store, &query, selectors, EntityKind::Term, &store.term_lineage(t)))
            .cloned()
            .collect(),
        weeks: store
            .weeks()
            .iter()
            .filter(|w| visible(store, &query, selectors, EntityKind::Week, &store.week_lineage(w)))
            .cloned()
            .collect(),
        lessons: store
            .lessons()
            .iter()
            .filter(|l| {
                visible(store, &query, selectors, EntityKind::Lesson, &store.lesson_lineage(l))
            })
            .cloned()
            .collect(),
    }
}

fn visible(
    store: &EntityStore,
    query: &SearchQuery,
    selectors: &Selectors,
    kind: EntityKind,
    lineage: &Lineage,
) -> bool {
    query.matches_lineage(store, lineage) && selectors.admits(kind, lineage)
}
