//! Behavioural guarantees of the filter, cascade, pagination, validation and
//! expansion engines, checked over a small fixed hierarchy.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use syl_config::{SylConfig, ValidationRules};
use syl_core::drafts::{EntityDraft, LessonDraft};
use syl_core::entities::{Category, Id, Lesson, Subject, SubjectName, Term, Week, Year};
use syl_core::enums::{EntityKind, ExpandKind, FormMode, LessonStatus};
use syl_core::fields::{Field, FieldValue};
use syl_core::snapshot::Snapshot;
use syl_engine::cascade::run_cascade;
use syl_engine::filter::{SearchQuery, SelectorField, Selectors, compute_filtered};
use syl_engine::pagination::{page, total_pages};
use syl_engine::state::{Event, StateContainer};
use syl_engine::store::EntityStore;
use syl_engine::validation::FormValidation;

fn subject(id: Id, year_id: Id, subject_name_id: Id, name: &str) -> Subject {
    Subject {
        id,
        year_id,
        subject_name_id,
        category_id: None,
        subject_name: name.into(),
        category_name: None,
        price: 20.0,
        discount: None,
        level: None,
        duration: None,
        teacher_id: None,
        teacher_name: None,
        start_date: None,
        description: None,
    }
}

const fn term(id: Id, subject_id: Id, term_number: u32) -> Term {
    Term {
        id,
        subject_id,
        term_number,
        start_date: None,
    }
}

const fn week(id: Id, term_id: Id, week_number: u32) -> Week {
    Week {
        id,
        term_id,
        week_number,
        start_date: None,
    }
}

fn lesson(id: Id, subject_id: Id, week_id: Option<Id>, title: &str) -> Lesson {
    Lesson {
        id,
        week_id,
        subject_id,
        title: title.into(),
        description: None,
        video_url: None,
        pdf_url: None,
        order_index: 0,
        status: LessonStatus::Created,
    }
}

/// Three years, two categories, three subjects with terms, weeks and lessons.
fn school() -> Snapshot {
    Snapshot {
        years: vec![
            Year { id: 1, year_number: 0 },
            Year { id: 2, year_number: 7 },
            Year { id: 3, year_number: 8 },
        ],
        categories: vec![
            Category {
                id: 100,
                name: "Mathematics".into(),
                description: String::new(),
                color: None,
            },
            Category {
                id: 101,
                name: "Sciences".into(),
                description: String::new(),
                color: None,
            },
        ],
        subject_names: vec![
            SubjectName { id: 200, name: "Algebra".into(), category_id: 100 },
            SubjectName { id: 201, name: "Biology".into(), category_id: 101 },
        ],
        subjects: vec![
            subject(10, 2, 200, "Algebra"),
            subject(11, 3, 201, "Biology"),
            subject(12, 3, 200, "Algebra II"),
        ],
        terms: vec![term(20, 10, 1), term(21, 10, 2), term(22, 11, 1), term(23, 12, 1)],
        weeks: vec![week(30, 20, 1), week(31, 20, 2), week(32, 22, 1), week(33, 23, 1)],
        lessons: vec![
            lesson(40, 10, Some(30), "Variables"),
            lesson(41, 10, Some(31), "Equations"),
            lesson(42, 11, Some(32), "Cells"),
            lesson(43, 10, None, "Course overview"),
            lesson(44, 12, Some(33), "Matrices"),
        ],
    }
}

// ---------------------------------------------------------------------------
// Search propagation
// ---------------------------------------------------------------------------

#[test]
fn search_scenario_keeps_only_the_year_with_a_match() {
    let store = EntityStore::new(Snapshot {
        years: vec![Year { id: 1, year_number: 0 }, Year { id: 2, year_number: 7 }],
        subjects: vec![subject(10, 2, 5, "Algebra")],
        ..Snapshot::default()
    });
    let views = compute_filtered(&store, "alg", &Selectors::default());
    assert_eq!(views.years, vec![Year { id: 2, year_number: 7 }]);
}

#[rstest]
#[case("alg")]
#[case("ALGEBRA")]
#[case("bio")]
#[case("ii")]
#[case("o")]
#[case("nothing matches this")]
fn matching_subject_brings_its_whole_path(#[case] search: &str) {
    let store = EntityStore::new(school());
    let query = SearchQuery::new(search);
    let views = compute_filtered(&store, search, &Selectors::default());

    for s in store.subjects() {
        let matches = query.matches_subject(&store, s);
        assert_eq!(views.subjects.contains(s), matches, "subject {}", s.id);
        if !matches {
            continue;
        }
        assert!(views.years.iter().any(|y| y.id == s.year_id));
        for t in store.terms().iter().filter(|t| t.subject_id == s.id) {
            assert!(views.terms.contains(t), "term {}", t.id);
            for w in store.weeks().iter().filter(|w| w.term_id == t.id) {
                assert!(views.weeks.contains(w), "week {}", w.id);
            }
        }
        for l in store.lessons().iter().filter(|l| l.subject_id == s.id) {
            assert!(views.lessons.contains(l), "lesson {}", l.id);
        }
    }

    for y in store.years() {
        let has_match = store
            .subjects()
            .iter()
            .any(|s| s.year_id == y.id && query.matches_subject(&store, s));
        assert_eq!(views.years.contains(y), has_match, "year {}", y.id);
    }
}

#[test]
fn search_does_not_touch_categories_or_subject_names() {
    let store = EntityStore::new(school());
    let views = compute_filtered(&store, "zzz", &Selectors::default());
    assert_eq!(views.categories.len(), 2);
    assert_eq!(views.subject_names.len(), 2);
    assert!(views.subjects.is_empty());
}

#[test]
fn output_preserves_store_order() {
    let store = EntityStore::new(school());
    let views = compute_filtered(&store, "alg", &Selectors::default());
    let ids: Vec<Id> = views.lessons.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![40, 41, 43, 44]);
}

#[test]
fn dangling_references_are_excluded_not_fatal() {
    let mut snapshot = school();
    snapshot.weeks.push(week(39, 999, 1));
    snapshot.lessons.push(lesson(49, 999, Some(39), "Orphan"));
    let store = EntityStore::new(snapshot);

    let all = compute_filtered(&store, "", &Selectors::default());
    assert!(all.lessons.iter().any(|l| l.id == 49));

    let searched = compute_filtered(&store, "a", &Selectors::default());
    assert!(searched.lessons.iter().all(|l| l.id != 49));
    assert!(searched.weeks.iter().all(|w| w.id != 39));

    let by_term = compute_filtered(
        &store,
        "",
        &Selectors {
            term_id: Some(20),
            ..Selectors::default()
        },
    );
    assert!(by_term.weeks.iter().all(|w| w.id != 39));
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

#[rstest]
#[case(SelectorField::Year, 3)]
#[case(SelectorField::Category, 100)]
#[case(SelectorField::Subject, 10)]
#[case(SelectorField::Term, 20)]
#[case(SelectorField::Week, 31)]
fn adding_a_selector_never_grows_a_view(#[case] field: SelectorField, #[case] id: Id) {
    let store = EntityStore::new(school());
    for search in ["", "alg"] {
        let baseline = compute_filtered(&store, search, &Selectors::default());
        let mut selectors = Selectors::default();
        selectors.set(field, Some(id));
        let narrowed = compute_filtered(&store, search, &selectors);
        for kind in EntityKind::ALL {
            assert!(
                narrowed.len(kind) <= baseline.len(kind),
                "{kind} grew under {field:?}={id}"
            );
        }
    }
}

#[test]
fn selectors_restrict_descendants_transitively() {
    let store = EntityStore::new(school());
    let views = compute_filtered(
        &store,
        "",
        &Selectors {
            category_id: Some(100),
            ..Selectors::default()
        },
    );
    assert_eq!(views.categories.len(), 1);
    assert_eq!(views.subject_names.iter().map(|n| n.id).collect::<Vec<_>>(), vec![200]);
    assert_eq!(views.subjects.iter().map(|s| s.id).collect::<Vec<_>>(), vec![10, 12]);
    assert_eq!(views.weeks.iter().map(|w| w.id).collect::<Vec<_>>(), vec![30, 31, 33]);
    assert_eq!(views.years.len(), 3);

    let by_week = compute_filtered(
        &store,
        "",
        &Selectors {
            week_id: Some(30),
            ..Selectors::default()
        },
    );
    assert_eq!(by_week.lessons.iter().map(|l| l.id).collect::<Vec<_>>(), vec![40]);
    assert_eq!(by_week.weeks.len(), 4);
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[rstest]
fn pages_concatenate_to_the_collection(#[values(1, 2, 3, 5, 10)] size: usize) {
    let store = EntityStore::new(school());
    let views = compute_filtered(&store, "", &Selectors::default());
    let pages = total_pages(views.lessons.len(), size);

    let mut joined = Vec::new();
    for n in 1..=pages {
        joined.extend_from_slice(page(&views.lessons, n, size));
    }
    assert_eq!(joined, views.lessons);
    assert!(page(&views.lessons, pages + 1, size).is_empty());
}

#[test]
fn empty_collection_has_one_page() {
    let empty: Vec<Lesson> = Vec::new();
    assert_eq!(total_pages(empty.len(), 10), 1);
    assert!(page(&empty, 1, 10).is_empty());
}

// ---------------------------------------------------------------------------
// Cascade
// ---------------------------------------------------------------------------

#[rstest]
#[case(EntityKind::SubjectName)]
#[case(EntityKind::Subject)]
#[case(EntityKind::Term)]
#[case(EntityKind::Week)]
#[case(EntityKind::Lesson)]
fn cascade_reaches_a_fixed_point(#[case] kind: EntityKind) {
    for snapshot in [school(), Snapshot::default()] {
        let store = EntityStore::new(snapshot);
        let mut draft = EntityDraft::empty(kind);
        if draft.has_field(Field::TermId) {
            draft.set_ancestor(Field::TermId, Some(22)).unwrap();
        }
        run_cascade(&store, &mut draft);
        let settled = draft.clone();

        assert!(run_cascade(&store, &mut draft).is_empty());
        assert_eq!(draft, settled);
    }
}

#[test]
fn new_term_gets_the_next_number() {
    let store = EntityStore::new(Snapshot {
        years: vec![Year { id: 1, year_number: 9 }],
        subjects: vec![subject(10, 1, 5, "Physics")],
        terms: vec![term(20, 10, 1), term(21, 10, 2), term(22, 10, 4)],
        ..Snapshot::default()
    });
    let mut draft = EntityDraft::empty(EntityKind::Term);
    draft.set_ancestor(Field::SubjectId, Some(10)).unwrap();
    run_cascade(&store, &mut draft);
    assert_eq!(draft.value(Field::TermNumber), FieldValue::Number(5.0));
}

#[test]
fn lesson_subject_comes_from_its_week() {
    let store = EntityStore::new(school());
    let mut draft = EntityDraft::empty(EntityKind::Lesson);
    draft.set_ancestor(Field::WeekId, Some(32)).unwrap();
    run_cascade(&store, &mut draft);
    assert_eq!(draft.ancestor(Field::SubjectId), Some(11));
    assert_eq!(draft.ancestor(Field::TermId), Some(22));
}

#[test]
fn two_candidates_are_never_picked_between() {
    let store = EntityStore::new(school());
    let mut draft = EntityDraft::empty(EntityKind::Term);
    draft.set_ancestor(Field::YearId, Some(3)).unwrap();
    run_cascade(&store, &mut draft);
    assert_eq!(draft.ancestor(Field::SubjectId), None);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn lesson_week_is_required_only_when_adding() {
    let rules = ValidationRules::default();
    let draft = EntityDraft::Lesson(LessonDraft {
        subject_id: Some(10),
        title: "Variables".into(),
        ..LessonDraft::default()
    });

    let errors = FormValidation::default()
        .sweep(&draft, FormMode::Add, &rules)
        .unwrap_err();
    assert!(errors.contains(Field::WeekId));
    assert!(errors.to_string().contains("weekId"));

    assert!(
        FormValidation::default()
            .sweep(&draft, FormMode::Edit, &rules)
            .is_ok()
    );
}

// ---------------------------------------------------------------------------
// Expansion
// ---------------------------------------------------------------------------

#[test]
fn expansion_never_changes_views_or_pages() {
    let mut container = StateContainer::new(school(), Arc::new(SylConfig::default()));
    container.dispatch(Event::SetSearchTerm("bio".into()));
    let views = Arc::clone(&container.state().views);
    let pages: Vec<_> = EntityKind::ALL
        .into_iter()
        .map(|kind| container.page_view(kind))
        .collect();

    container.dispatch(Event::ToggleExpand(ExpandKind::Term, 20));
    container.dispatch(Event::ToggleExpand(ExpandKind::Term, 9999));
    container.dispatch(Event::ExpandAll);

    assert!(container.state().expansion.is_expanded(ExpandKind::Term, 9999));
    assert_eq!(*container.state().views, *views);
    let after: Vec<_> = EntityKind::ALL
        .into_iter()
        .map(|kind| container.page_view(kind))
        .collect();
    assert_eq!(after, pages);
}
