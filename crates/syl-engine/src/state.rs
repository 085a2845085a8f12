//! The state snapshot, its reducer, and the container that owns it.
//!
//! [`AppState`] is an immutable value. [`reduce`] maps a state and an
//! [`Event`] to the next state without touching the filtered views;
//! [`StateContainer::dispatch`] applies the reducer and then calls
//! [`StateContainer::recompute`] for every event that can change what is
//! visible.

use std::collections::BTreeSet;
use std::sync::Arc;

use syl_config::SylConfig;
use syl_core::drafts::EntityDraft;
use syl_core::entities::{Entity, Id};
use syl_core::enums::{EntityKind, ExpandKind, FormMode};
use syl_core::fields::{Field, FieldValue};
use syl_core::snapshot::Snapshot;
use tracing::{debug, warn};

use crate::cascade::{self, CandidateSets};
use crate::expansion::ExpansionTracker;
use crate::filter::{FilteredViews, SelectorField, Selectors, compute_filtered};
use crate::pagination::{self, PageCursors, PageView};
use crate::store::{Collection, EntityStore};
use crate::validation::FormValidation;

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

/// The open add or edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub mode: FormMode,
    /// ID of the record being edited. `None` in add mode.
    pub editing: Option<Id>,
    pub draft: EntityDraft,
    /// Fields the cascade filled in rather than the user.
    pub auto_filled: BTreeSet<Field>,
    pub validation: FormValidation,
}

impl FormState {
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.draft.kind()
    }

    #[must_use]
    pub fn error(&self, field: Field) -> Option<&str> {
        self.validation.error(field)
    }

    fn revalidate(&mut self, config: &SylConfig) {
        self.validation
            .recompute(&self.draft, self.mode, &config.validation);
    }

    /// Re-run inference after the store or the draft changed. Edit forms
    /// never infer.
    fn infer(&mut self, store: &EntityStore) {
        if self.mode != FormMode::Add {
            return;
        }
        let assigned = cascade::run_cascade(store, &mut self.draft);
        self.auto_filled.extend(assigned);
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<EntityStore>,
    pub search: String,
    pub selectors: Selectors,
    pub expansion: ExpansionTracker,
    pub pages: PageCursors,
    pub form: Option<FormState>,
    pub views: Arc<FilteredViews>,
    pub config: Arc<SylConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(snapshot: Snapshot, config: Arc<SylConfig>) -> Self {
        let store = EntityStore::new(snapshot);
        let views = compute_filtered(&store, "", &Selectors::default());
        Self {
            store: Arc::new(store),
            search: String::new(),
            selectors: Selectors::default(),
            expansion: ExpansionTracker::default(),
            pages: PageCursors::default(),
            form: None,
            views: Arc::new(views),
            config,
        }
    }

    #[must_use]
    pub fn page_size(&self, kind: EntityKind) -> usize {
        self.config.pagination.page_size(kind)
    }

    #[must_use]
    pub fn total_pages(&self, kind: EntityKind) -> usize {
        pagination::total_pages(self.views.len(kind), self.page_size(kind))
    }

    /// The current page of one kind.
    #[must_use]
    pub fn page_view(&self, kind: EntityKind) -> PageView {
        let page = self.pages.current(kind);
        let page_size = self.page_size(kind);
        PageView {
            kind,
            page,
            page_size,
            total_pages: self.total_pages(kind),
            total_items: self.views.len(kind),
            items: self.views.page(kind, page, page_size),
        }
    }

    /// Candidate ancestors for the open form.
    #[must_use]
    pub fn candidates(&self) -> Option<CandidateSets> {
        self.form
            .as_ref()
            .map(|form| cascade::candidates(&self.store, &form.draft))
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SetSearchTerm(String),
    SetSelector(SelectorField, Option<Id>),
    ClearSelectors,
    ToggleExpand(ExpandKind, Id),
    /// Expand every currently visible subject, term and week.
    ExpandAll,
    CollapseAll,
    GotoPage(EntityKind, usize),
    ReplaceStore(Snapshot),
    ReplaceKind(Collection),
    UpsertEntity(Entity),
    RemoveEntity(EntityKind, Id),
    OpenAddForm(EntityKind),
    OpenEditForm(EntityKind, Id),
    EditDraft(Field, FieldValue),
    TouchField(Field),
    /// Touch every field of the open form and re-check it.
    SweepForm,
    CloseForm,
}

impl Event {
    /// Whether the filtered views must be recomputed after this event.
    #[must_use]
    pub const fn changes_views(&self) -> bool {
        matches!(
            self,
            Self::SetSearchTerm(_)
                | Self::SetSelector(..)
                | Self::ClearSelectors
                | Self::ReplaceStore(_)
                | Self::ReplaceKind(_)
                | Self::UpsertEntity(_)
                | Self::RemoveEntity(..)
        )
    }
}

// ---------------------------------------------------------------------------
// Reducer
// ---------------------------------------------------------------------------

/// Compute the next state. Pure: the input state is left untouched and the
/// filtered views are carried over as-is.
#[must_use]
pub fn reduce(state: &AppState, event: Event) -> AppState {
    let mut next = state.clone();
    match event {
        Event::SetSearchTerm(term) => {
            next.search = term;
            next.pages.reset();
        }
        Event::SetSelector(field, id) => {
            next.selectors.set(field, id);
            next.pages.reset();
        }
        Event::ClearSelectors => {
            next.selectors = Selectors::default();
            next.pages.reset();
        }
        Event::ToggleExpand(kind, id) => {
            next.expansion.toggle(kind, id);
        }
        Event::ExpandAll => {
            let views = &state.views;
            next.expansion.expand_all(
                views.ids(EntityKind::Subject),
                views.ids(EntityKind::Term),
                views.ids(EntityKind::Week),
            );
        }
        Event::CollapseAll => next.expansion.collapse_all(),
        Event::GotoPage(kind, page) => {
            let total = state.total_pages(kind);
            if !next.pages.goto(kind, page, total) {
                debug!(%kind, page, total, "page out of range, ignored");
            }
        }
        Event::ReplaceStore(snapshot) => {
            let store = EntityStore::new(snapshot);
            next.expansion.prune(&store);
            next.store = Arc::new(store);
            next.pages.reset();
            refresh_form(&mut next);
        }
        Event::ReplaceKind(collection) => {
            Arc::make_mut(&mut next.store).replace(collection);
            next.pages.reset();
            refresh_form(&mut next);
        }
        Event::UpsertEntity(entity) => {
            Arc::make_mut(&mut next.store).upsert(entity);
            refresh_form(&mut next);
        }
        Event::RemoveEntity(kind, id) => {
            if Arc::make_mut(&mut next.store).remove(kind, id) {
                refresh_form(&mut next);
            }
        }
        Event::OpenAddForm(kind) => next.form = Some(open_add(&next, kind)),
        Event::OpenEditForm(kind, id) => match next.store.get(kind, id) {
            Some(entity) => {
                let mut form = FormState {
                    mode: FormMode::Edit,
                    editing: Some(id),
                    draft: EntityDraft::from(&entity),
                    auto_filled: BTreeSet::new(),
                    validation: FormValidation::default(),
                };
                form.revalidate(&next.config);
                next.form = Some(form);
            }
            None => warn!(%kind, id, "cannot edit a record that is not loaded"),
        },
        Event::EditDraft(field, value) => {
            let store = Arc::clone(&next.store);
            let config = Arc::clone(&next.config);
            if let Some(form) = next.form.as_mut() {
                edit_draft(form, &store, &config, field, value);
            }
        }
        Event::TouchField(field) => {
            let config = Arc::clone(&next.config);
            if let Some(form) = next.form.as_mut() {
                form.validation.touch(field);
                form.revalidate(&config);
            }
        }
        Event::SweepForm => {
            let config = Arc::clone(&next.config);
            if let Some(form) = next.form.as_mut() {
                form.validation
                    .touch_all(&form.draft, form.mode, &config.validation);
            }
        }
        Event::CloseForm => next.form = None,
    }
    next
}

/// A blank add form, with ancestors pre-selected from the active selectors.
fn open_add(state: &AppState, kind: EntityKind) -> FormState {
    let mut draft = EntityDraft::empty(kind);
    for selector in SelectorField::ALL {
        let field = selector.field();
        let chosen = state.selectors.get(selector).filter(|id| {
            draft.has_field(field)
                && ancestor_kind(field).is_some_and(|k| state.store.contains(k, *id))
        });
        if let Some(id) = chosen {
            if let Err(error) = draft.set_ancestor(field, Some(id)) {
                debug!(%kind, %field, %error, "selector not applied to draft");
            }
        }
    }
    let mut form = FormState {
        mode: FormMode::Add,
        editing: None,
        draft,
        auto_filled: BTreeSet::new(),
        validation: FormValidation::default(),
    };
    form.infer(&state.store);
    form.revalidate(&state.config);
    form
}

const fn ancestor_kind(field: Field) -> Option<EntityKind> {
    match field {
        Field::YearId => Some(EntityKind::Year),
        Field::CategoryId => Some(EntityKind::Category),
        Field::SubjectNameId => Some(EntityKind::SubjectName),
        Field::SubjectId => Some(EntityKind::Subject),
        Field::TermId => Some(EntityKind::Term),
        Field::WeekId => Some(EntityKind::Week),
        _ => None,
    }
}

fn edit_draft(
    form: &mut FormState,
    store: &EntityStore,
    config: &SylConfig,
    field: Field,
    value: FieldValue,
) {
    let previous = form.draft.value(field);
    let mut draft = form.draft.clone();
    if let Err(error) = draft.set(field, value) {
        warn!(kind = %form.kind(), %field, %error, "rejected form input");
        return;
    }

    let changed = draft.value(field) != previous;
    form.auto_filled.remove(&field);

    if form.mode == FormMode::Add && field.is_ancestor_ref() && changed {
        // Inferred values, upstream ones included, may rest on the old
        // choice. The cascade below refills whatever still follows.
        for inferred in std::mem::take(&mut form.auto_filled) {
            clear_field(&mut draft, inferred);
        }
        for downstream in field.downstream() {
            if draft.has_field(*downstream) {
                clear_field(&mut draft, *downstream);
            }
        }
    }

    form.draft = draft;
    form.infer(store);
    form.validation.touch(field);
    form.revalidate(config);
}

fn clear_field(draft: &mut EntityDraft, field: Field) {
    if let Err(error) = draft.set(field, FieldValue::Empty) {
        debug!(kind = %draft.kind(), %field, %error, "field not cleared");
    }
}

/// Keep an open add form consistent with a changed store.
fn refresh_form(state: &mut AppState) {
    let store = Arc::clone(&state.store);
    let config = Arc::clone(&state.config);
    if let Some(form) = state.form.as_mut() {
        form.infer(&store);
        form.revalidate(&config);
    }
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

/// Proof that a reload was requested. Results are applied only if no newer
/// reload has been applied since.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReloadTicket(u64);

/// Owns the current [`AppState`].
#[derive(Debug)]
pub struct StateContainer {
    state: AppState,
    issued: u64,
    applied: u64,
}

impl StateContainer {
    #[must_use]
    pub fn new(snapshot: Snapshot, config: Arc<SylConfig>) -> Self {
        Self {
            state: AppState::new(snapshot, config),
            issued: 0,
            applied: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Apply one event.
    pub fn dispatch(&mut self, event: Event) {
        let recompute = event.changes_views();
        self.state = reduce(&self.state, event);
        if recompute {
            self.recompute();
            self.clamp_pages();
        }
    }

    /// Send any cursor left past the last page of its shrunken view back to 1.
    fn clamp_pages(&mut self) {
        for kind in EntityKind::ALL {
            let total = self.state.total_pages(kind);
            if self.state.pages.current(kind) > total {
                debug!(%kind, total, "page cursor past the end, reset");
                self.state.pages.reset_kind(kind);
            }
        }
    }

    /// Rebuild the filtered views from the store, search term and selectors.
    pub fn recompute(&mut self) {
        let views = compute_filtered(&self.state.store, &self.state.search, &self.state.selectors);
        self.state.views = Arc::new(views);
    }

    pub fn issue_ticket(&mut self) -> ReloadTicket {
        self.issued += 1;
        ReloadTicket(self.issued)
    }

    /// Replace the store with a reload result, unless a newer reload has
    /// already been applied. Returns whether the snapshot was applied.
    pub fn apply_reload(&mut self, ticket: ReloadTicket, snapshot: Snapshot) -> bool {
        if ticket.0 < self.applied {
            warn!(
                ticket = ticket.0,
                applied = self.applied,
                "ignoring stale reload"
            );
            return false;
        }
        self.applied = ticket.0;
        self.dispatch(Event::ReplaceStore(snapshot));
        true
    }

    #[must_use]
    pub fn page_view(&self, kind: EntityKind) -> PageView {
        self.state.page_view(kind)
    }
}
