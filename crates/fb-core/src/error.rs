//! Error types for template loading and saving.

use crate::validate::ValidationIssue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate field name: {0}")]
    DuplicateFieldName(String),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("You do not have permission to create/update templates.")]
    PermissionDenied,

    #[error("invalid template: {}", summarize(.0))]
    Invalid(Vec<ValidationIssue>),

    #[error("{0}")]
    Sink(String),
}

impl SaveError {
    /// Whether retrying the same save could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SaveError::Sink(_))
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
