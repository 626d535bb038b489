use thiserror::Error;

use crate::types::SafetyVerdict;

#[derive(Error, Debug)]
pub enum DraftsmithError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Topic rejected by safety check ({} issue(s))", .0.issues_found.len())]
    UnsafeTopic(SafetyVerdict),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Research plan error: {0}")]
    Plan(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
