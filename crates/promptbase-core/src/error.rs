use promptbase_db::GatewayError;
use thiserror::Error;

/// Message shown when a submission is missing its title or body.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in both the title and prompt content.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in both the title and prompt content.")]
    MissingFields,
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Store error: {0}")]
    Store(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        assert_eq!(
            ValidationError::MissingFields.to_string(),
            MISSING_FIELDS_MESSAGE
        );
    }
}
