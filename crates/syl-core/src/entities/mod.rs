//! Entity structs for the content hierarchy.
//!
//! The descent is Year → Subject → Term → Week → Lesson. Categories and subject
//! names classify subjects along a second axis and are not hierarchy parents.
//! All structs serialize with camelCase field names to match the REST payloads.

mod category;
mod lesson;
mod subject;
mod subject_name;
mod term;
mod week;
mod year;

pub use category::Category;
pub use lesson::Lesson;
pub use subject::Subject;
pub use subject_name::SubjectName;
pub use term::Term;
pub use week::Week;
pub use year::Year;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::EntityKind;

/// Opaque positive entity identifier assigned by the content repository.
pub type Id = u64;

/// Behaviour shared by every stored entity.
pub trait Record: Clone + Send + Sync + 'static {
    /// The kind tag of this entity type.
    const KIND: EntityKind;

    /// Stable identifier of this entity.
    fn id(&self) -> Id;
}

macro_rules! impl_record {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl Record for $ty {
                const KIND: EntityKind = EntityKind::$kind;

                fn id(&self) -> Id {
                    self.id
                }
            }
        )+
    };
}

impl_record!(
    Year => Year,
    Category => Category,
    SubjectName => SubjectName,
    Subject => Subject,
    Term => Term,
    Week => Week,
    Lesson => Lesson,
);

/// An entity of any kind, tagged on the wire by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Year(Year),
    Category(Category),
    SubjectName(SubjectName),
    Subject(Subject),
    Term(Term),
    Week(Week),
    Lesson(Lesson),
}

impl Entity {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Year(_) => EntityKind::Year,
            Self::Category(_) => EntityKind::Category,
            Self::SubjectName(_) => EntityKind::SubjectName,
            Self::Subject(_) => EntityKind::Subject,
            Self::Term(_) => EntityKind::Term,
            Self::Week(_) => EntityKind::Week,
            Self::Lesson(_) => EntityKind::Lesson,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Id {
        match self {
            Self::Year(e) => e.id,
            Self::Category(e) => e.id,
            Self::SubjectName(e) => e.id,
            Self::Subject(e) => e.id,
            Self::Term(e) => e.id,
            Self::Week(e) => e.id,
            Self::Lesson(e) => e.id,
        }
    }
}

macro_rules! impl_from_entity {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Entity {
                fn from(value: $ty) -> Self {
                    Self::$ty(value)
                }
            }
        )+
    };
}

impl_from_entity!(Year, Category, SubjectName, Subject, Term, Week, Lesson);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_reports_kind_and_id() {
        let entity = Entity::from(Year { id: 4, year_number: 9 });
        assert_eq!(entity.kind(), EntityKind::Year);
        assert_eq!(entity.id(), 4);
        assert_eq!(entity.kind(), <Year as Record>::KIND);
    }

    #[test]
    fn entity_is_tagged_by_kind() {
        let entity = Entity::from(Term {
            id: 3,
            subject_id: 10,
            term_number: 2,
            start_date: None,
        });
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["kind"], "term");
        assert_eq!(json["subjectId"], 10);
    }
}
