//! Serde roundtrip and JsonSchema validation tests for wire-facing types.

use chrono::NaiveDate;
use schemars::schema_for;
use syl_core::drafts::{EntityDraft, LessonDraft, TermDraft};
use syl_core::entities::*;
use syl_core::enums::LessonStatus;
use syl_core::snapshot::Snapshot;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn algebra() -> Subject {
    Subject {
        id: 10,
        year_id: 2,
        subject_name_id: 5,
        category_id: Some(1),
        subject_name: "Algebra".into(),
        category_name: Some("Mathematics".into()),
        price: 49.5,
        discount: Some(10.0),
        level: Some("intermediate".into()),
        duration: Some(36),
        teacher_id: Some(77),
        teacher_name: Some("R. Haddad".into()),
        start_date: NaiveDate::from_ymd_opt(2024, 9, 2),
        description: None,
    }
}

roundtrip_and_validate!(year_roundtrip, Year, Year { id: 1, year_number: 0 });

roundtrip_and_validate!(
    category_roundtrip,
    Category,
    Category {
        id: 1,
        name: "Mathematics".into(),
        description: "Numbers and structures".into(),
        color: Some("#2563eb".into()),
    }
);

roundtrip_and_validate!(subject_roundtrip, Subject, algebra());

roundtrip_and_validate!(
    lesson_roundtrip,
    Lesson,
    Lesson {
        id: 500,
        week_id: None,
        subject_id: 10,
        title: "Course overview".into(),
        description: Some("What to expect".into()),
        video_url: None,
        pdf_url: Some("https://cdn.example/overview.pdf".into()),
        order_index: 0,
        status: LessonStatus::RevisionRequested,
    }
);

roundtrip_and_validate!(
    snapshot_roundtrip,
    Snapshot,
    Snapshot {
        years: vec![Year { id: 2, year_number: 7 }],
        subjects: vec![algebra()],
        terms: vec![Term {
            id: 20,
            subject_id: 10,
            term_number: 1,
            start_date: None,
        }],
        ..Snapshot::default()
    }
);

roundtrip_and_validate!(
    lesson_draft_roundtrip,
    EntityDraft,
    EntityDraft::Lesson(LessonDraft {
        week_id: Some(30),
        title: "Linear equations".into(),
        order_index: Some(2),
        ..LessonDraft::default()
    })
);

#[test]
fn entities_use_camel_case_wire_names() {
    let json = serde_json::to_value(algebra()).unwrap();
    assert_eq!(json["yearId"], 2);
    assert_eq!(json["subjectName"], "Algebra");
    assert_eq!(json["startDate"], "2024-09-02");
}

#[test]
fn draft_is_tagged_by_kind() {
    let draft = EntityDraft::Term(TermDraft {
        subject_id: Some(10),
        term_number: Some(5),
        ..TermDraft::default()
    });
    let json = serde_json::to_value(&draft).unwrap();
    assert_eq!(json["kind"], "term");
    assert_eq!(json["termNumber"], 5);
}

#[test]
fn lesson_without_optional_fields_deserializes() {
    let lesson: Lesson =
        serde_json::from_str(r#"{"id":1,"subjectId":10,"title":"Intro"}"#).unwrap();
    assert!(lesson.is_global());
    assert_eq!(lesson.status, LessonStatus::Created);
    assert_eq!(lesson.order_index, 0);
}
