//! Errors raised while building a form's props

use thiserror::Error;

/// Rejected form configuration
///
/// Only produced at construction time. Mounted controllers never fail.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("missing required prop `{0}`")]
    MissingProp(&'static str),

    #[error("form id must not be empty")]
    EmptyId,

    #[error("schema must be a JSON object")]
    InvalidSchema,

    #[error("component map must contain at least one field type")]
    EmptyComponentMap,

    #[error("invalid form definition: {0}")]
    Definition(#[from] serde_json::Error),
}
