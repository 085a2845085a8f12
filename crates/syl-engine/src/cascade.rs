//! Cascade inference for add forms.
//!
//! Given a draft and the store, fill unset ancestor fields that can only have
//! one value, then auto-number terms and weeks. Runs to a fixed point: each
//! assignment can narrow the candidates of a field below it. Every step fills
//! a previously unset field and nothing is ever cleared, so the loop ends
//! after at most one pass per ancestor field.
//!
//! A field is filled when:
//! - a chosen descendant determines it (week → term → subject → year,
//!   subject name → category), or
//! - exactly one candidate remains after restricting by the ancestors
//!   already chosen.
//!
//! Ambiguity is never resolved: with two candidates the field stays unset.

use serde::Serialize;
use syl_core::drafts::EntityDraft;
use syl_core::entities::Id;
use syl_core::enums::EntityKind;
use syl_core::fields::{Field, FieldValue};
use tracing::debug;

use crate::filter::Selectors;
use crate::store::EntityStore;

/// Candidate IDs per ancestor field of the open form. Fields the form does
/// not have stay empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSets {
    pub years: Vec<Id>,
    pub categories: Vec<Id>,
    pub subject_names: Vec<Id>,
    pub subjects: Vec<Id>,
    pub terms: Vec<Id>,
    pub weeks: Vec<Id>,
}

impl CandidateSets {
    #[must_use]
    pub fn get(&self, field: Field) -> &[Id] {
        match field {
            Field::YearId => &self.years,
            Field::CategoryId => &self.categories,
            Field::SubjectNameId => &self.subject_names,
            Field::SubjectId => &self.subjects,
            Field::TermId => &self.terms,
            Field::WeekId => &self.weeks,
            _ => &[],
        }
    }

    fn slot(&mut self, field: Field) -> Option<&mut Vec<Id>> {
        match field {
            Field::YearId => Some(&mut self.years),
            Field::CategoryId => Some(&mut self.categories),
            Field::SubjectNameId => Some(&mut self.subject_names),
            Field::SubjectId => Some(&mut self.subjects),
            Field::TermId => Some(&mut self.terms),
            Field::WeekId => Some(&mut self.weeks),
            _ => None,
        }
    }
}

/// The draft's chosen ancestors as filter selectors, with `skip` left open.
fn selectors_from(draft: &EntityDraft, skip: Field) -> Selectors {
    let pick = |field: Field| {
        if field == skip {
            None
        } else {
            draft.ancestor(field)
        }
    };
    Selectors {
        year_id: pick(Field::YearId),
        category_id: pick(Field::CategoryId),
        subject_id: pick(Field::SubjectId),
        term_id: pick(Field::TermId),
        week_id: pick(Field::WeekId),
    }
}

/// Records that can fill `field`, given the other ancestors already chosen.
#[must_use]
pub fn candidates_for(store: &EntityStore, draft: &EntityDraft, field: Field) -> Vec<Id> {
    let selectors = selectors_from(draft, field);
    match field {
        Field::YearId => store.years().iter().map(|y| y.id).collect(),
        Field::CategoryId => store.categories().iter().map(|c| c.id).collect(),
        Field::SubjectNameId => store
            .subject_names()
            .iter()
            .filter(|n| selectors.admits(EntityKind::SubjectName, &store.subject_name_lineage(n)))
            .map(|n| n.id)
            .collect(),
        Field::SubjectId => store
            .subjects()
            .iter()
            .filter(|s| selectors.admits(EntityKind::Subject, &store.subject_lineage(s)))
            .map(|s| s.id)
            .collect(),
        Field::TermId => store
            .terms()
            .iter()
            .filter(|t| selectors.admits(EntityKind::Term, &store.term_lineage(t)))
            .map(|t| t.id)
            .collect(),
        Field::WeekId => store
            .weeks()
            .iter()
            .filter(|w| selectors.admits(EntityKind::Week, &store.week_lineage(w)))
            .map(|w| w.id)
            .collect(),
        _ => Vec::new(),
    }
}

/// Candidates for every ancestor field of the draft's form.
#[must_use]
pub fn candidates(store: &EntityStore, draft: &EntityDraft) -> CandidateSets {
    let mut sets = CandidateSets::default();
    for field in draft.kind().ancestor_fields() {
        if let Some(slot) = sets.slot(*field) {
            *slot = candidates_for(store, draft, *field);
        }
    }
    sets
}

/// Next term number under a subject, or week number under a term:
/// `max(existing, default 0) + 1`.
#[must_use]
pub fn next_sequence_number(store: &EntityStore, kind: EntityKind, parent: Id) -> Option<u32> {
    let highest = match kind {
        EntityKind::Term => store
            .terms()
            .iter()
            .filter(|t| t.subject_id == parent)
            .map(|t| t.term_number)
            .max(),
        EntityKind::Week => store
            .weeks()
            .iter()
            .filter(|w| w.term_id == parent)
            .map(|w| w.week_number)
            .max(),
        _ => return None,
    };
    Some(highest.unwrap_or(0).saturating_add(1))
}

fn is_unset(draft: &EntityDraft, field: Field) -> bool {
    draft.has_field(field) && draft.value(field).is_empty()
}

/// An unset field a chosen descendant determines.
fn derive_upward(store: &EntityStore, draft: &EntityDraft) -> Option<(Field, Id)> {
    let rules: [(Field, Field, fn(&EntityStore, Id) -> Option<Id>); 4] = [
        (Field::WeekId, Field::TermId, |s, id| {
            s.week(id).map(|w| w.term_id).filter(|t| s.contains(EntityKind::Term, *t))
        }),
        (Field::TermId, Field::SubjectId, |s, id| {
            s.term(id)
                .map(|t| t.subject_id)
                .filter(|x| s.contains(EntityKind::Subject, *x))
        }),
        (Field::SubjectId, Field::YearId, |s, id| {
            s.subject(id)
                .map(|x| x.year_id)
                .filter(|y| s.contains(EntityKind::Year, *y))
        }),
        (Field::SubjectNameId, Field::CategoryId, |s, id| {
            s.subject_name(id)
                .map(|n| n.category_id)
                .filter(|c| s.contains(EntityKind::Category, *c))
        }),
    ];
    rules.into_iter().find_map(|(from, to, resolve)| {
        if !is_unset(draft, to) {
            return None;
        }
        draft
            .ancestor(from)
            .and_then(|id| resolve(store, id))
            .map(|id| (to, id))
    })
}

/// The topmost unset ancestor field with exactly one candidate.
fn single_candidate(store: &EntityStore, draft: &EntityDraft) -> Option<(Field, Id)> {
    draft
        .kind()
        .ancestor_fields()
        .iter()
        .filter(|field| is_unset(draft, **field))
        .find_map(|field| match candidates_for(store, draft, *field).as_slice() {
            [only] => Some((*field, *only)),
            _ => None,
        })
}

/// Run inference to a fixed point. Returns the fields it filled, in order.
pub fn run_cascade(store: &EntityStore, draft: &mut EntityDraft) -> Vec<Field> {
    let mut assigned = Vec::new();

    while let Some((field, id)) =
        derive_upward(store, draft).or_else(|| single_candidate(store, draft))
    {
        if draft.set_ancestor(field, Some(id)).is_err() {
            break;
        }
        debug!(kind = %draft.kind(), %field, id, "inferred ancestor");
        assigned.push(field);
    }

    if let Some(sequence) = draft.sequence_field().filter(|f| is_unset(draft, *f)) {
        let parent_field = match draft.kind() {
            EntityKind::Term => Field::SubjectId,
            _ => Field::TermId,
        };
        let next = draft
            .ancestor(parent_field)
            .and_then(|parent| next_sequence_number(store, draft.kind(), parent))
            .filter(|number| draft.set(sequence, FieldValue::Number(f64::from(*number))).is_ok());
        if let Some(number) = next {
            debug!(kind = %draft.kind(), field = %sequence, number, "auto-numbered");
            assigned.push(sequence);
        }
    }

    assigned
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use syl_core::entities::{Subject, Term, Week, Year};
    use syl_core::snapshot::Snapshot;

    fn subject(id: Id, year_id: Id) -> Subject {
        Subject {
            id,
            year_id,
            subject_name_id: 1,
            category_id: None,
            subject_name: format!("Subject {id}"),
            category_name: None,
            price: 0.0,
            discount: None,
            level: None,
            duration: None,
            teacher_id: None,
            teacher_name: None,
            start_date: None,
            description: None,
        }
    }

    fn term(id: Id, subject_id: Id, term_number: u32) -> Term {
        Term {
            id,
            subject_id,
            term_number,
            start_date: None,
        }
    }

    #[test]
    fn single_year_and_subject_chain_fills_in() {
        let store = EntityStore::new(Snapshot {
            years: vec![Year {
                id: 1,
                year_number: 7,
            }],
            subjects: vec![subject(10, 1)],
            terms: vec![term(20, 10, 1)],
            ..Snapshot::default()
        });
        let mut draft = EntityDraft::empty(EntityKind::Week);
        let assigned = run_cascade(&store, &mut draft);

        assert_eq!(
            assigned,
            vec![Field::YearId, Field::SubjectId, Field::TermId, Field::WeekNumber]
        );
        assert_eq!(draft.ancestor(Field::TermId), Some(20));
        assert_eq!(draft.value(Field::WeekNumber), FieldValue::Number(1.0));
    }

    #[test]
    fn ambiguity_is_left_alone() {
        let store = EntityStore::new(Snapshot {
            years: vec![Year {
                id: 1,
                year_number: 7,
            }],
            subjects: vec![subject(10, 1), subject(11, 1)],
            ..Snapshot::default()
        });
        let mut draft = EntityDraft::empty(EntityKind::Term);
        let assigned = run_cascade(&store, &mut draft);

        assert_eq!(assigned, vec![Field::YearId]);
        assert_eq!(draft.ancestor(Field::SubjectId), None);
        assert_eq!(draft.value(Field::TermNumber), FieldValue::Empty);
        assert_eq!(candidates(&store, &draft).subjects, vec![10, 11]);
    }

    #[test]
    fn week_choice_derives_term_subject_and_year() {
        let store = EntityStore::new(Snapshot {
            years: vec![
                Year {
                    id: 1,
                    year_number: 7,
                },
                Year {
                    id: 2,
                    year_number: 8,
                },
            ],
            subjects: vec![subject(10, 1), subject(11, 2)],
            terms: vec![term(20, 10, 1), term(21, 11, 1)],
            weeks: vec![
                Week {
                    id: 30,
                    term_id: 21,
                    week_number: 1,
                    start_date: None,
                },
                Week {
                    id: 31,
                    term_id: 20,
                    week_number: 1,
                    start_date: None,
                },
            ],
            ..Snapshot::default()
        });
        let mut draft = EntityDraft::empty(EntityKind::Lesson);
        draft.set_ancestor(Field::WeekId, Some(30)).unwrap();
        run_cascade(&store, &mut draft);

        assert_eq!(draft.ancestor(Field::TermId), Some(21));
        assert_eq!(draft.ancestor(Field::SubjectId), Some(11));
        assert_eq!(draft.ancestor(Field::YearId), Some(2));
    }

    #[test]
    fn existing_sequence_number_is_kept() {
        let store = EntityStore::new(Snapshot {
            subjects: vec![subject(10, 1)],
            terms: vec![term(20, 10, 3)],
            ..Snapshot::default()
        });
        let mut draft = EntityDraft::empty(EntityKind::Term);
        draft.set_ancestor(Field::SubjectId, Some(10)).unwrap();
        draft.set(Field::TermNumber, FieldValue::Number(9.0)).unwrap();
        run_cascade(&store, &mut draft);
        assert_eq!(draft.value(Field::TermNumber), FieldValue::Number(9.0));
    }

    #[test]
    fn next_number_starts_at_one() {
        let store = EntityStore::default();
        assert_eq!(next_sequence_number(&store, EntityKind::Week, 5), Some(1));
        assert_eq!(next_sequence_number(&store, EntityKind::Lesson, 5), None);
    }
}
