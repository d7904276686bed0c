//! # promptbase-core
//!
//! The prompt workflow: a create/edit form, a searchable and sortable list,
//! and the per-row actions (edit, delete, toggle favorite, render as
//! template), all expressed as plain handlers over a borrowed
//! [`promptbase_db::Gateway`].
//!
//! ## Key Types
//!
//! - [`Workflow`] - Action handlers and page assembly
//! - [`PromptForm`] - Form state and validation
//! - [`PageView`] - Everything one render cycle needs
//! - [`ViewState`] - Search/sort/open-panel selection owned by the surface

mod error;
mod form;
mod view;
mod workflow;

pub use error::{ValidationError, WorkflowError, MISSING_FIELDS_MESSAGE};
pub use form::{Candidate, PromptForm};
pub use view::{
    format_template, EditPanel, Notice, PageView, PromptRow, SortOption, TemplatePanel,
    ViewState, CREATED_FORMAT, PAGE_TITLE,
};
pub use workflow::{ActionOutcome, ListQuery, RowAction, Workflow, ADDED_MESSAGE, UPDATED_MESSAGE};

pub use promptbase_db::{Gateway, GatewayError, Prompt, SortOrder};
