//! The pagination engine.
//!
//! Page numbers are 1-based. Every kind has its own cursor; filter and
//! search changes reset all cursors to 1, and navigation outside
//! `[1, total_pages]` is a no-op rather than a clamp.

use serde::Serialize;
use std::collections::BTreeMap;
use syl_core::entities::Entity;
use syl_core::enums::EntityKind;

/// `max(1, ceil(len / page_size))`. A zero page size counts as one.
#[must_use]
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// The `page_number`-th page of `items`. Out-of-range pages are empty.
#[must_use]
pub fn page<T>(items: &[T], page_number: usize, page_size: usize) -> &[T] {
    let size = page_size.max(1);
    let Some(start) = page_number
        .checked_sub(1)
        .and_then(|index| index.checked_mul(size))
    else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(items.len());
    &items[start..end]
}

/// Current page per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursors(BTreeMap<EntityKind, usize>);

impl Default for PageCursors {
    fn default() -> Self {
        Self(EntityKind::ALL.into_iter().map(|kind| (kind, 1)).collect())
    }
}

impl PageCursors {
    #[must_use]
    pub fn current(&self, kind: EntityKind) -> usize {
        self.0.get(&kind).copied().unwrap_or(1)
    }

    /// Move `kind` to `page` if it lies within `[1, total_pages]`.
    /// Returns whether the cursor moved.
    pub fn goto(&mut self, kind: EntityKind, page: usize, total_pages: usize) -> bool {
        if page == 0 || page > total_pages {
            return false;
        }
        self.0.insert(kind, page);
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn reset_kind(&mut self, kind: EntityKind) {
        self.0.insert(kind, 1);
    }
}

/// One rendered page of one kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub kind: EntityKind,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub items: Vec<Entity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 1)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(25, 5, 5)]
    #[case(3, 0, 3)]
    fn total_pages_is_at_least_one(#[case] len: usize, #[case] size: usize, #[case] expected: usize) {
        assert_eq!(total_pages(len, size), expected);
    }

    #[test]
    fn pages_concatenate_to_the_collection() {
        let items: Vec<u32> = (1..=23).collect();
        let size = 5;
        let joined: Vec<u32> = (1..=total_pages(items.len(), size))
            .flat_map(|n| page(&items, n, size).iter().copied())
            .collect();
        assert_eq!(joined, items);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let items = [1, 2, 3];
        assert!(page(&items, 0, 2).is_empty());
        assert!(page(&items, 3, 2).is_empty());
        assert_eq!(page(&items, 2, 2), &[3]);
    }

    #[test]
    fn goto_outside_bounds_is_noop() {
        let mut cursors = PageCursors::default();
        assert!(cursors.goto(EntityKind::Term, 3, 4));
        assert!(!cursors.goto(EntityKind::Term, 5, 4));
        assert!(!cursors.goto(EntityKind::Term, 0, 4));
        assert_eq!(cursors.current(EntityKind::Term), 3);
        assert_eq!(cursors.current(EntityKind::Week), 1);

        cursors.reset();
        assert_eq!(cursors.current(EntityKind::Term), 1);
    }
}
