//! Service error taxonomy shared by every analyzer backend.

use crate::types::{PipelineStep, UNEXPECTED_ERROR_MESSAGE};
use thiserror::Error;

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// How a call to the extraction or analysis service went wrong.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The request never completed (connection refused, reset, DNS...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service rejected the request ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    /// Anything else: request construction, response decoding.
    #[error("{0}")]
    Unexpected(String),
}

impl ServiceError {
    pub fn rejected(status: u16, detail: Option<String>) -> Self {
        ServiceError::Rejected { status, detail }
    }

    /// Message shown to the user when `step` fails with this error.
    pub fn user_message(&self, step: PipelineStep) -> String {
        match self {
            ServiceError::Rejected {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            ServiceError::Rejected { .. } | ServiceError::Transport(_) => {
                step.fallback_message().to_string()
            }
            ServiceError::Unexpected(message) if !message.is_empty() => message.clone(),
            ServiceError::Unexpected(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    /// HTTP status, when the service answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ServiceError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
