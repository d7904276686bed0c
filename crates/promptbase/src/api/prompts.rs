//! JSON API over the prompt store.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use promptbase_core::{Prompt, SortOrder, Workflow};

use super::{internal_error, AppState};

/// Query parameters for listing prompts.
#[derive(Debug, Deserialize)]
pub struct ListPromptsQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Serialize)]
pub struct TemplateResponse {
    pub id: i64,
    pub template: String,
}

pub async fn list_prompts(
    State(state): State<AppState>,
    Query(params): Query<ListPromptsQuery>,
) -> Result<Json<Vec<Prompt>>, (StatusCode, String)> {
    let order: SortOrder = params
        .sort
        .and_then(|s| s.parse().ok())
        .unwrap_or_default();
    let search = params.search.unwrap_or_default();

    let prompts = state
        .gateway
        .prompts()
        .and_then(|store| store.search(&search, order))
        .map_err(internal_error)?;

    Ok(Json(prompts))
}

pub async fn get_prompt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Prompt>, (StatusCode, String)> {
    let prompt = state
        .gateway
        .prompts()
        .and_then(|store| store.fetch_one(id))
        .map_err(internal_error)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Prompt not found".to_string()))?;

    Ok(Json(prompt))
}

pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TemplateResponse>, (StatusCode, String)> {
    let template = Workflow::new(&state.gateway)
        .render_template(id)
        .map_err(internal_error)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Prompt not found".to_string()))?;

    Ok(Json(TemplateResponse { id, template }))
}
