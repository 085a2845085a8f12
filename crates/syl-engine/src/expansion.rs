//! Expand/collapse state of the tree.
//!
//! Three independent ID sets. Nothing here reads the filtered views, and the
//! filter engine never reads these sets.

use serde::Serialize;
use std::collections::BTreeSet;
use syl_core::entities::Id;
use syl_core::enums::{EntityKind, ExpandKind};

use crate::store::EntityStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionTracker {
    subjects: BTreeSet<Id>,
    terms: BTreeSet<Id>,
    weeks: BTreeSet<Id>,
}

impl ExpansionTracker {
    const fn set(&self, kind: ExpandKind) -> &BTreeSet<Id> {
        match kind {
            ExpandKind::Subject => &self.subjects,
            ExpandKind::Term => &self.terms,
            ExpandKind::Week => &self.weeks,
        }
    }

    fn set_mut(&mut self, kind: ExpandKind) -> &mut BTreeSet<Id> {
        match kind {
            ExpandKind::Subject => &mut self.subjects,
            ExpandKind::Term => &mut self.terms,
            ExpandKind::Week => &mut self.weeks,
        }
    }

    /// Flip membership. Returns whether the node is now expanded.
    pub fn toggle(&mut self, kind: ExpandKind, id: Id) -> bool {
        let set = self.set_mut(kind);
        if set.remove(&id) {
            false
        } else {
            set.insert(id);
            true
        }
    }

    #[must_use]
    pub fn is_expanded(&self, kind: ExpandKind, id: Id) -> bool {
        self.set(kind).contains(&id)
    }

    #[must_use]
    pub fn expanded(&self, kind: ExpandKind) -> Vec<Id> {
        self.set(kind).iter().copied().collect()
    }

    pub fn expand_all(
        &mut self,
        subjects: impl IntoIterator<Item = Id>,
        terms: impl IntoIterator<Item = Id>,
        weeks: impl IntoIterator<Item = Id>,
    ) {
        self.subjects.extend(subjects);
        self.terms.extend(terms);
        self.weeks.extend(weeks);
    }

    pub fn collapse_all(&mut self) {
        self.subjects.clear();
        self.terms.clear();
        self.weeks.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty() && self.terms.is_empty() && self.weeks.is_empty()
    }

    /// Forget IDs the store no longer holds.
    pub fn prune(&mut self, store: &EntityStore) {
        self.subjects
            .retain(|id| store.contains(EntityKind::Subject, *id));
        self.terms.retain(|id| store.contains(EntityKind::Term, *id));
        self.weeks.retain(|id| store.contains(EntityKind::Week, *id));
    }
}
