//! Action handlers that turn form submissions and row actions into gateway
//! calls.
//!
//! Nothing here keeps state between calls: every list and page is re-read
//! from the store.

use promptbase_db::{Gateway, SortOrder};
use tracing::{debug, info};

use crate::error::WorkflowError;
use crate::form::{Candidate, PromptForm};
use crate::view::{
    format_template, sort_options, EditPanel, Notice, PageView, PromptRow, TemplatePanel,
    ViewState, PAGE_TITLE,
};

pub const ADDED_MESSAGE: &str = "Prompt added successfully!";
pub const UPDATED_MESSAGE: &str = "Prompt updated successfully!";

/// Free-text search plus sort selection for the list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub order: SortOrder,
}

/// Per-row actions offered by the list.
#[derive(Debug, Clone)]
pub enum RowAction {
    Edit(PromptForm),
    Delete,
    ToggleFavorite,
    RenderTemplate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The edit form was submitted; carries its notice.
    Submitted(Notice),
    /// `false` when the row was already gone.
    Deleted(bool),
    /// `false` when the row was already gone.
    FavoriteToggled(bool),
    /// `None` when the row was already gone.
    Template(Option<String>),
}

pub struct Workflow<'g> {
    gateway: &'g Gateway,
}

impl<'g> Workflow<'g> {
    pub fn new(gateway: &'g Gateway) -> Self {
        Self { gateway }
    }

    /// Validate a form and dispatch it. A validation failure is reported as
    /// [`Notice::Error`] and nothing is written.
    pub fn submit(&self, form: PromptForm) -> Result<Notice, WorkflowError> {
        let key = form.form_key();
        match form.validate() {
            Ok(candidate) => self.dispatch(candidate),
            Err(e) => {
                info!(form = %key, "submission rejected: {}", e);
                Ok(Notice::Error(e.to_string()))
            }
        }
    }

    /// Insert a candidate without an id, update one with an id.
    pub fn dispatch(&self, candidate: Candidate) -> Result<Notice, WorkflowError> {
        let store = self.gateway.prompts()?;

        match candidate.id {
            None => {
                let id = store.insert(
                    &candidate.title,
                    &candidate.prompt,
                    candidate.is_favorite,
                )?;
                info!(id, "prompt added");
                Ok(Notice::Success(ADDED_MESSAGE.to_string()))
            }
            Some(id) => {
                let found = store.update(
                    id,
                    &candidate.title,
                    &candidate.prompt,
                    candidate.is_favorite,
                )?;
                if !found {
                    debug!(id, "update matched no prompt");
                }
                Ok(Notice::Success(UPDATED_MESSAGE.to_string()))
            }
        }
    }

    pub fn list(&self, query: &ListQuery) -> Result<Vec<PromptRow>, WorkflowError> {
        let prompts = self.gateway.prompts()?.search(&query.search, query.order)?;
        Ok(prompts.iter().map(PromptRow::from).collect())
    }

    /// `Title: <title>\n---\nContent: <prompt>`, or `None` if the prompt no
    /// longer exists.
    pub fn render_template(&self, id: i64) -> Result<Option<String>, WorkflowError> {
        let prompt = self.gateway.prompts()?.fetch_one(id)?;
        Ok(prompt.as_ref().map(format_template))
    }

    /// Run one row action against the row `id`.
    pub fn handle(&self, action: RowAction, id: i64) -> Result<ActionOutcome, WorkflowError> {
        match action {
            RowAction::Edit(form) => {
                let form = PromptForm {
                    id: Some(id),
                    ..form
                };
                Ok(ActionOutcome::Submitted(self.submit(form)?))
            }
            RowAction::Delete => Ok(ActionOutcome::Deleted(self.gateway.prompts()?.delete(id)?)),
            RowAction::ToggleFavorite => Ok(ActionOutcome::FavoriteToggled(
                self.gateway.prompts()?.toggle_favorite(id)?,
            )),
            RowAction::RenderTemplate => Ok(ActionOutcome::Template(self.render_template(id)?)),
        }
    }

    /// Build the whole page from the current store contents.
    pub fn page(
        &self,
        state: &ViewState,
        notice: Option<Notice>,
    ) -> Result<PageView, WorkflowError> {
        let query = ListQuery {
            search: state.search.clone(),
            order: state.order,
        };
        let rows = self.list(&query)?;

        let (create_form, edit_draft) = match &state.draft {
            Some(draft) if draft.is_new() => (draft.clone(), None),
            Some(draft) => (PromptForm::blank(), Some(draft.clone())),
            None => (PromptForm::blank(), None),
        };

        let editing_id = state
            .editing
            .or_else(|| edit_draft.as_ref().and_then(|d| d.id));
        let editing = match editing_id {
            Some(id) => self.edit_panel(id, edit_draft)?,
            None => None,
        };

        let template = match state.template {
            Some(id) => self
                .render_template(id)?
                .map(|text| TemplatePanel { id, text }),
            None => None,
        };

        Ok(PageView {
            title: PAGE_TITLE,
            create_form_key: create_form.form_key(),
            create_form,
            search: state.search.clone(),
            sort: state.order.value(),
            sort_options: sort_options(state.order),
            rows,
            notice,
            editing,
            template,
        })
    }

    /// The editor for row `id`, prefilled from `draft` when it belongs to this
    /// row and from the store otherwise. `None` when the row is gone.
    fn edit_panel(
        &self,
        id: i64,
        draft: Option<PromptForm>,
    ) -> Result<Option<EditPanel>, WorkflowError> {
        let Some(prompt) = self.gateway.prompts()?.fetch_one(id)? else {
            return Ok(None);
        };

        let form = match draft {
            Some(draft) if draft.id == Some(id) => draft,
            _ => PromptForm::from_prompt(&prompt),
        };

        Ok(Some(EditPanel {
            id,
            form_key: form.form_key(),
            form,
        }))
    }
}
