//! What the rendering surface draws for one interaction cycle.

use promptbase_db::{Prompt, SortOrder};
use serde::Serialize;

use crate::form::PromptForm;

pub const PAGE_TITLE: &str = "PromptBase";

/// How creation times are shown in row labels.
pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// User-visible confirmation or error for the last interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(msg) | Notice::Error(msg) => msg,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

/// One entry in the prompt list.
#[derive(Debug, Clone, Serialize)]
pub struct PromptRow {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub is_favorite: bool,
    pub created: String,
    pub label: String,
    pub form_key: String,
}

impl From<&Prompt> for PromptRow {
    fn from(prompt: &Prompt) -> Self {
        let created = prompt.created_at.format(CREATED_FORMAT).to_string();
        Self {
            id: prompt.id,
            title: prompt.title.clone(),
            body: prompt.prompt.clone(),
            is_favorite: prompt.is_favorite,
            label: format!("{} (Created: {})", prompt.title, created),
            created,
            form_key: PromptForm::from_prompt(prompt).form_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SortOption {
    pub label: &'static str,
    pub value: &'static str,
    pub selected: bool,
}

/// Inline editor opened on a row.
#[derive(Debug, Clone, Serialize)]
pub struct EditPanel {
    pub id: i64,
    pub form_key: String,
    pub form: PromptForm,
}

/// Template text rendered for a row.
#[derive(Debug, Clone, Serialize)]
pub struct TemplatePanel {
    pub id: i64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub create_form: PromptForm,
    pub create_form_key: String,
    pub search: String,
    pub sort: &'static str,
    pub sort_options: Vec<SortOption>,
    pub rows: Vec<PromptRow>,
    pub notice: Option<Notice>,
    pub editing: Option<EditPanel>,
    pub template: Option<TemplatePanel>,
}

/// Selection carried between renders. Owned by the rendering surface.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub search: String,
    pub order: SortOrder,
    pub editing: Option<i64>,
    pub template: Option<i64>,
    /// A rejected submission to show again with the user's input.
    pub draft: Option<PromptForm>,
}

pub(crate) fn sort_options(selected: SortOrder) -> Vec<SortOption> {
    SortOrder::ALL
        .iter()
        .map(|order| SortOption {
            label: order.label(),
            value: order.value(),
            selected: *order == selected,
        })
        .collect()
}

/// Format a prompt for copy-out.
pub fn format_template(prompt: &Prompt) -> String {
    format!("Title: {}\n---\nContent: {}", prompt.title, prompt.prompt)
}
