//! HTML page handlers.
//!
//! Every interaction re-renders the whole page from the store. The search and
//! sort selection travels in the query string, so POST routes take it too and
//! answer with the page for that selection.

use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use serde::Deserialize;

use promptbase_core::{ActionOutcome, Notice, PromptForm, RowAction, ViewState, Workflow};

use super::{internal_error, AppState};

/// Query parameters shared by every page route.
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
    pub search: Option<String>,
    pub sort: Option<String>,
    pub edit: Option<String>,
    pub template: Option<String>,
}

impl ViewParams {
    /// Unknown sort values fall back to the default ordering. Empty or
    /// non-numeric `edit` / `template` ids open nothing.
    pub fn into_state(self) -> ViewState {
        ViewState {
            search: self.search.unwrap_or_default(),
            order: self
                .sort
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            editing: self.edit.as_deref().and_then(parse_id),
            template: self.template.as_deref().and_then(parse_id),
            draft: None,
        }
    }
}

fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Urlencoded body of the create/edit form. An unchecked checkbox is absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormFields {
    pub title: String,
    pub prompt: String,
    pub is_favorite: Option<String>,
}

impl FormFields {
    fn into_form(self, id: Option<i64>) -> PromptForm {
        PromptForm {
            id,
            title: self.title,
            prompt: self.prompt,
            is_favorite: self.is_favorite.is_some(),
        }
    }
}

pub async fn show(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
) -> Result<Html<String>, (StatusCode, String)> {
    render(&state, &params.into_state(), None)
}

/// Submit the create form.
pub async fn create(
    State(state): State<AppState>,
    Query(params): Query<ViewParams>,
    Form(fields): Form<FormFields>,
) -> Result<Html<String>, (StatusCode, String)> {
    let form = fields.into_form(None);
    let notice = Workflow::new(&state.gateway)
        .submit(form.clone())
        .map_err(internal_error)?;

    let mut view = params.into_state();
    if notice.is_error() {
        view.draft = Some(form);
    }

    render(&state, &view, Some(notice))
}

/// Submit a row's inline edit form.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ViewParams>,
    Form(fields): Form<FormFields>,
) -> Result<Html<String>, (StatusCode, String)> {
    let form = fields.into_form(Some(id));
    let outcome = Workflow::new(&state.gateway)
        .handle(RowAction::Edit(form.clone()), id)
        .map_err(internal_error)?;

    let notice = match outcome {
        ActionOutcome::Submitted(notice) => notice,
        other => return Err(unexpected(other)),
    };

    let mut view = params.into_state();
    if notice.is_error() {
        view.editing = Some(id);
        view.draft = Some(form);
    } else {
        view.editing = None;
    }

    render(&state, &view, Some(notice))
}

/// Delete a row immediately; there is no confirmation step.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ViewParams>,
) -> Result<Html<String>, (StatusCode, String)> {
    Workflow::new(&state.gateway)
        .handle(RowAction::Delete, id)
        .map_err(internal_error)?;

    render(&state, &params.into_state(), None)
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<ViewParams>,
) -> Result<Html<String>, (StatusCode, String)> {
    Workflow::new(&state.gateway)
        .handle(RowAction::ToggleFavorite, id)
        .map_err(internal_error)?;

    render(&state, &params.into_state(), None)
}

fn render(
    state: &AppState,
    view: &ViewState,
    notice: Option<Notice>,
) -> Result<Html<String>, (StatusCode, String)> {
    let page = Workflow::new(&state.gateway)
        .page(view, notice)
        .map_err(internal_error)?;
    let html = state.pages.render(&page).map_err(internal_error)?;
    Ok(Html(html))
}

fn unexpected(outcome: ActionOutcome) -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Unexpected action outcome: {:?}", outcome),
    )
}
