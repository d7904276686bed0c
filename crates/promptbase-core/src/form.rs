//! The create/edit form shared by the page's top form and each row's inline
//! editor.

use promptbase_db::Prompt;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Form state: blank when creating, pre-populated when editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptForm {
    pub id: Option<i64>,
    pub title: String,
    pub prompt: String,
    pub is_favorite: bool,
}

/// A validated submission, ready to hand to dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: Option<i64>,
    pub title: String,
    pub prompt: String,
    pub is_favorite: bool,
}

impl PromptForm {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_prompt(prompt: &Prompt) -> Self {
        Self {
            id: Some(prompt.id),
            title: prompt.title.clone(),
            prompt: prompt.prompt.clone(),
            is_favorite: prompt.is_favorite,
        }
    }

    /// Key that keeps each rendered form instance distinct:
    /// `prompt_form_<id>`, or `prompt_form_new` for the create form.
    pub fn form_key(&self) -> String {
        match self.id {
            Some(id) => format!("prompt_form_{}", id),
            None => "prompt_form_new".to_string(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Reject the submission unless both title and body have content.
    /// Values pass through untrimmed.
    pub fn validate(self) -> Result<Candidate, ValidationError> {
        if self.title.trim().is_empty() || self.prompt.trim().is_empty() {
            return Err(ValidationError::MissingFields);
        }

        Ok(Candidate {
            id: self.id,
            title: self.title,
            prompt: self.prompt,
            is_favorite: self.is_favorite,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn form(title: &str, prompt: &str) -> PromptForm {
        PromptForm {
            id: None,
            title: title.to_string(),
            prompt: prompt.to_string(),
            is_favorite: false,
        }
    }

    #[test]
    fn test_form_key() {
        assert_eq!(PromptForm::blank().form_key(), "prompt_form_new");

        let editing = PromptForm {
            id: Some(7),
            ..form("t", "p")
        };
        assert_eq!(editing.form_key(), "prompt_form_7");
    }

    #[test]
    fn test_validate_accepts_filled_form() {
        let candidate = form("  Greeting ", "Hello, {name}!").validate().unwrap();
        assert_eq!(candidate.id, None);
        assert_eq!(candidate.title, "  Greeting ");
        assert_eq!(candidate.prompt, "Hello, {name}!");
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert_eq!(
            form("", "body").validate(),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            form("title", "").validate(),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            form(" \t", "body").validate(),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_from_prompt_prefills() {
        let now = Utc::now();
        let prompt = Prompt {
            id: 3,
            title: "Saved".to_string(),
            prompt: "body".to_string(),
            is_favorite: true,
            created_at: now,
            updated_at: now,
        };

        let form = PromptForm::from_prompt(&prompt);
        assert_eq!(form.id, Some(3));
        assert_eq!(form.title, "Saved");
        assert!(form.is_favorite);
        assert!(!form.is_new());
    }
}
