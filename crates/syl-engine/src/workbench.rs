//! The workbench: state container plus its two collaborators.
//!
//! `Workbench` is the single mutation surface handed to a UI or the CLI. It
//! fetches through a [`ContentRepository`], reports outcomes to a
//! [`NotificationSink`], and turns every result into [`Event`]s on its
//! [`StateContainer`].
//!
//! Repository failures are always reported twice: once to the sink as a
//! human-readable message, once to the caller as `WorkbenchError::Repository`.

use std::sync::Arc;

use syl_config::SylConfig;
use syl_core::drafts::EntityDraft;
use syl_core::entities::{
    Category, Entity, Id, Lesson, Subject, SubjectName, Term, Week, Year,
};
use syl_core::enums::{EntityKind, ExpandKind, LessonStatus};
use syl_core::errors::CoreError;
use syl_core::fields::{Field, FieldValue};
use syl_core::snapshot::Snapshot;
use syl_repo::updates::category::CategoryUpdate;
use syl_repo::updates::lesson::{LessonUpdate, LessonUpdateBuilder};
use syl_repo::updates::subject::SubjectUpdate;
use syl_repo::updates::subject_name::SubjectNameUpdate;
use syl_repo::updates::term::TermUpdate;
use syl_repo::updates::week::WeekUpdate;
use syl_repo::updates::year::YearUpdate;
use syl_repo::{ContentRepository, EntityRepository, NotificationSink, RepositoryError};
use tracing::{info, warn};

use crate::cascade::CandidateSets;
use crate::error::WorkbenchError;
use crate::filter::SelectorField;
use crate::pagination::PageView;
use crate::state::{AppState, Event, FormState, StateContainer};
use crate::store::Collection;

/// Drives a [`StateContainer`] from repository results.
pub struct Workbench<R, N> {
    repo: R,
    sink: N,
    container: StateContainer,
}

impl<R: ContentRepository, N: NotificationSink> Workbench<R, N> {
    /// A workbench over an empty store. Call [`Self::load_all`] to fill it.
    #[must_use]
    pub fn new(repo: R, sink: N, config: Arc<SylConfig>) -> Self {
        Self {
            repo,
            sink,
            container: StateContainer::new(Snapshot::default(), config),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        self.container.state()
    }

    #[must_use]
    pub const fn repo(&self) -> &R {
        &self.repo
    }

    #[must_use]
    pub const fn sink(&self) -> &N {
        &self.sink
    }

    /// The current page of one kind.
    #[must_use]
    pub fn page(&self, kind: EntityKind) -> PageView {
        self.container.page_view(kind)
    }

    /// Candidate ancestors for the open form.
    #[must_use]
    pub fn candidates(&self) -> Option<CandidateSets> {
        self.state().candidates()
    }

    #[must_use]
    pub fn form(&self) -> Option<&FormState> {
        self.state().form.as_ref()
    }

    fn config(&self) -> &SylConfig {
        &self.state().config
    }

    async fn report<T>(&self, action: &str, error: RepositoryError) -> Result<T, WorkbenchError> {
        warn!(action, %error, "repository call failed");
        self.sink
            .error(&format!("Could not {action}: {error}"))
            .await;
        Err(error.into())
    }

    // -- loading -------------------------------------------------------------

    /// Fetch all seven collections concurrently and replace the store.
    ///
    /// The store is replaced only if every fetch succeeds; otherwise it keeps
    /// its last snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first repository error after notifying the sink.
    pub async fn load_all(&mut self) -> Result<(), WorkbenchError> {
        let ticket = self.container.issue_ticket();
        let repo = &self.repo;

        let loaded: Result<Snapshot, RepositoryError> = async {
            let (years, categories, subject_names, subjects, terms, weeks, lessons) = tokio::join!(
                EntityRepository::<Year>::list(repo),
                EntityRepository::<Category>::list(repo),
                EntityRepository::<SubjectName>::list(repo),
                EntityRepository::<Subject>::list(repo),
                EntityRepository::<Term>::list(repo),
                EntityRepository::<Week>::list(repo),
                EntityRepository::<Lesson>::list(repo),
            );
            Ok(Snapshot {
                years: years?,
                categories: categories?,
                subject_names: subject_names?,
                subjects: subjects?,
                terms: terms?,
                weeks: weeks?,
                lessons: lessons?,
            })
        }
        .await;

        match loaded {
            Ok(snapshot) => {
                let total = snapshot.total();
                if self.container.apply_reload(ticket, snapshot) {
                    info!(total, "loaded all collections");
                }
                Ok(())
            }
            Err(error) => {
                warn!("bulk load failed, keeping the last snapshot");
                self.report("load content", error).await
            }
        }
    }

    /// Fetch the children of one parent and replace that kind's collection.
    ///
    /// # Errors
    ///
    /// Returns `WorkbenchError::Repository` (after notifying the sink) if the
    /// fetch fails or `kind` has no parent.
    pub async fn load_by(&mut self, kind: EntityKind, parent: Id) -> Result<(), WorkbenchError> {
        let repo = &self.repo;
        let fetched: Result<Collection, RepositoryError> = async {
            Ok(match kind {
                EntityKind::Year => {
                    Collection::Years(EntityRepository::<Year>::list_by(repo, parent).await?)
                }
                EntityKind::Category => Collection::Categories(
                    EntityRepository::<Category>::list_by(repo, parent).await?,
                ),
                EntityKind::SubjectName => Collection::SubjectNames(
                    EntityRepository::<SubjectName>::list_by(repo, parent).await?,
                ),
                EntityKind::Subject => {
                    Collection::Subjects(EntityRepository::<Subject>::list_by(repo, parent).await?)
                }
                EntityKind::Term => {
                    Collection::Terms(EntityRepository::<Term>::list_by(repo, parent).await?)
                }
                EntityKind::Week => {
                    Collection::Weeks(EntityRepository::<Week>::list_by(repo, parent).await?)
                }
                EntityKind::Lesson => {
                    Collection::Lessons(EntityRepository::<Lesson>::list_by(repo, parent).await?)
                }
            })
        }
        .await;

        match fetched {
            Ok(collection) => {
                info!(%kind, parent, count = collection.len(), "loaded filtered collection");
                self.container.dispatch(Event::ReplaceKind(collection));
                Ok(())
            }
            Err(error) => self.report(&format!("load {kind} records"), error).await,
        }
    }

    // -- view state ----------------------------------------------------------

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.container.dispatch(Event::SetSearchTerm(term.into()));
    }

    pub fn set_selector(&mut self, field: SelectorField, id: Option<Id>) {
        self.container.dispatch(Event::SetSelector(field, id));
    }

    pub fn clear_selectors(&mut self) {
        self.container.dispatch(Event::ClearSelectors);
    }

    /// Returns whether the node is now expanded.
    pub fn toggle_expand(&mut self, kind: ExpandKind, id: Id) -> bool {
        self.container.dispatch(Event::ToggleExpand(kind, id));
        self.state().expansion.is_expanded(kind, id)
    }

    pub fn expand_all(&mut self) {
        self.container.dispatch(Event::ExpandAll);
    }

    pub fn collapse_all(&mut self) {
        self.container.dispatch(Event::CollapseAll);
    }

    /// Returns whether the page changed. Out-of-range pages are ignored.
    pub fn goto_page(&mut self, kind: EntityKind, page: usize) -> bool {
        let before = self.state().pages.current(kind);
        self.container.dispatch(Event::GotoPage(kind, page));
        self.state().pages.current(kind) != before
    }

    // -- forms ---------------------------------------------------------------

    pub fn open_add_form(&mut self, kind: EntityKind) {
        self.container.dispatch(Event::OpenAddForm(kind));
    }

    /// # Errors
    ///
    /// Returns `CoreError::NotFound` if the record is not in the store.
    pub fn open_edit_form(&mut self, kind: EntityKind, id: Id) -> Result<(), WorkbenchError> {
        if !self.state().store.contains(kind, id) {
            return Err(CoreError::NotFound { kind, id }.into());
        }
        self.container.dispatch(Event::OpenEditForm(kind, id));
        Ok(())
    }

    /// Change one field of the open form.
    ///
    /// # Errors
    ///
    /// Returns `NoOpenForm`, or `CoreError::Validation` when the value does not
    /// fit the field. The draft is unchanged on error.
    pub fn edit_draft(&mut self, field: Field, value: FieldValue) -> Result<(), WorkbenchError> {
        let form = self.form().ok_or(WorkbenchError::NoOpenForm)?;
        let mut probe = form.draft.clone();
        probe.set(field, value.clone())?;
        self.container.dispatch(Event::EditDraft(field, value));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NoOpenForm` when no form is open.
    pub fn touch_field(&mut self, field: Field) -> Result<(), WorkbenchError> {
        self.form().ok_or(WorkbenchError::NoOpenForm)?;
        self.container.dispatch(Event::TouchField(field));
        Ok(())
    }

    /// Touch every field and report whether the form can be submitted.
    ///
    /// # Errors
    ///
    /// Returns `NoOpenForm` or `Validation` with every failing field.
    pub fn validate_form(&mut self) -> Result<(), WorkbenchError> {
        self.form().ok_or(WorkbenchError::NoOpenForm)?;
        self.container.dispatch(Event::SweepForm);
        let form = self.form().ok_or(WorkbenchError::NoOpenForm)?;
        form.validation.result()?;
        Ok(())
    }

    pub fn close_form(&mut self) {
        self.container.dispatch(Event::CloseForm);
    }

    /// Validate and save the open form: `create` in add mode, `update` with the
    /// editable fields in edit mode. On success the saved record replaces its
    /// store entry and the form closes.
    ///
    /// # Errors
    ///
    /// `NoOpenForm`, `Validation` (nothing sent), or `Repository` (sink notified,
    /// form kept open).
    pub async fn submit_draft(&mut self) -> Result<Entity, WorkbenchError> {
        self.validate_form()?;
        let form = self.form().cloned().ok_or(WorkbenchError::NoOpenForm)?;
        let kind = form.kind();

        let saved = match form.editing {
            None => self.create(form.draft).await,
            Some(id) => self.update(id, &form.draft).await,
        };
        let entity = match saved {
            Ok(entity) => entity,
            Err(error) => return self.report(&format!("save {kind}"), error).await,
        };

        info!(%kind, id = entity.id(), mode = %form.mode, "saved");
        self.container.dispatch(Event::UpsertEntity(entity.clone()));
        self.container.dispatch(Event::CloseForm);
        self.sink.success(&format!("{kind} saved")).await;
        Ok(entity)
    }

    async fn create(&self, draft: EntityDraft) -> Result<Entity, RepositoryError> {
        let repo = &self.repo;
        Ok(match draft {
            EntityDraft::Year(d) => EntityRepository::<Year>::create(repo, d).await?.into(),
            EntityDraft::Category(d) => EntityRepository::<Category>::create(repo, d).await?.into(),
            EntityDraft::SubjectName(d) => {
                EntityRepository::<SubjectName>::create(repo, d).await?.into()
            }
            EntityDraft::Subject(d) => EntityRepository::<Subject>::create(repo, d).await?.into(),
            EntityDraft::Term(d) => EntityRepository::<Term>::create(repo, d).await?.into(),
            EntityDraft::Week(d) => EntityRepository::<Week>::create(repo, d).await?.into(),
            EntityDraft::Lesson(d) => EntityRepository::<Lesson>::create(repo, d).await?.into(),
        })
    }

    async fn update(&self, id: Id, draft: &EntityDraft) -> Result<Entity, RepositoryError> {
        let repo = &self.repo;
        Ok(match draft {
            EntityDraft::Year(d) => {
                EntityRepository::<Year>::update(repo, id, YearUpdate::from_draft(d))
                    .await?
                    .into()
            }
            EntityDraft::Category(d) => {
                EntityRepository::<Category>::update(repo, id, CategoryUpdate::from_draft(d))
                    .await?
                    .into()
            }
            EntityDraft::SubjectName(d) => {
                EntityRepository::<SubjectName>::update(repo, id, SubjectNameUpdate::from_draft(d))
                    .await?
                    .into()
            }
            EntityDraft::Subject(d) => {
                EntityRepository::<Subject>::update(repo, id, SubjectUpdate::from_draft(d))
                    .await?
                    .into()
            }
            EntityDraft::Term(d) => {
                EntityRepository::<Term>::update(repo, id, TermUpdate::from_draft(d))
                    .await?
                    .into()
            }
            EntityDraft::Week(d) => {
                EntityRepository::<Week>::update(repo, id, WeekUpdate::from_draft(d))
                    .await?
                    .into()
            }
            EntityDraft::Lesson(d) => {
                EntityRepository::<Lesson>::update(repo, id, LessonUpdate::from_draft(d))
                    .await?
                    .into()
            }
        })
    }

    // -- deletes and transitions ---------------------------------------------

    /// Delete a record, asking the sink first when `general.confirm_deletes`
    /// is on.
    ///
    /// # Errors
    ///
    /// `DeleteCancelled` if the user declines, `Repository` if the backend
    /// refuses (for instance because the record still has children).
    pub async fn request_delete(&mut self, kind: EntityKind, id: Id) -> Result<(), WorkbenchError> {
        if self.config().general.confirm_deletes
            && !self.sink.confirm(&format!("Delete {kind} {id}?")).await
        {
            info!(%kind, id, "delete cancelled");
            return Err(WorkbenchError::DeleteCancelled);
        }

        let repo = &self.repo;
        let deleted = match kind {
            EntityKind::Year => EntityRepository::<Year>::delete(repo, id).await,
            EntityKind::Category => EntityRepository::<Category>::delete(repo, id).await,
            EntityKind::SubjectName => EntityRepository::<SubjectName>::delete(repo, id).await,
            EntityKind::Subject => EntityRepository::<Subject>::delete(repo, id).await,
            EntityKind::Term => EntityRepository::<Term>::delete(repo, id).await,
            EntityKind::Week => EntityRepository::<Week>::delete(repo, id).await,
            EntityKind::Lesson => EntityRepository::<Lesson>::delete(repo, id).await,
        };
        if let Err(error) = deleted {
            return self.report(&format!("delete {kind} {id}"), error).await;
        }

        info!(%kind, id, "deleted");
        self.container.dispatch(Event::RemoveEntity(kind, id));
        self.sink.success(&format!("{kind} deleted")).await;
        Ok(())
    }

    /// Move a lesson through the approval workflow.
    ///
    /// # Errors
    ///
    /// `CoreError::NotFound` / `CoreError::InvalidTransition` before any
    /// repository call, `Repository` if the update fails.
    pub async fn transition_lesson(
        &mut self,
        id: Id,
        status: LessonStatus,
    ) -> Result<Lesson, WorkbenchError> {
        let current = self
            .state()
            .store
            .lesson(id)
            .map(|lesson| lesson.status)
            .ok_or(CoreError::NotFound {
                kind: EntityKind::Lesson,
                id,
            })?;
        if !current.can_transition_to(status) {
            return Err(CoreError::InvalidTransition {
                id,
                from: current,
                to: status,
            }
            .into());
        }

        let patch = LessonUpdateBuilder::new().status(status).build();
        let lesson = match EntityRepository::<Lesson>::update(&self.repo, id, patch).await {
            Ok(lesson) => lesson,
            Err(error) => return self.report(&format!("move lesson {id} to {status}"), error).await,
        };

        info!(id, from = %current, to = %status, "lesson status changed");
        self.container
            .dispatch(Event::UpsertEntity(Entity::Lesson(lesson.clone())));
        self.sink
            .success(&format!("Lesson moved to {status}"))
            .await;
        Ok(lesson)
    }
}
