//! Error types for the Postlens SDK

use postlens_core::ServiceError;
use thiserror::Error;

/// Result type alias for Postlens SDK operations
pub type Result<T> = std::result::Result<T, PostlensError>;

/// Errors that can occur when using the Postlens SDK
#[derive(Error, Debug)]
pub enum PostlensError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned an error response
    #[error("API error ({status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Api { status: u16, detail: Option<String> },

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PostlensError {
    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PostlensError::Api { status, .. } => Some(*status),
            PostlensError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The `detail` the service sent back, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            PostlensError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

impl From<PostlensError> for ServiceError {
    fn from(err: PostlensError) -> Self {
        match err {
            PostlensError::Api { status, detail } => ServiceError::Rejected { status, detail },
            // Building the request or decoding a delivered body is not a transport failure.
            PostlensError::Http(e) if e.is_decode() || e.is_builder() => {
                ServiceError::Unexpected(e.to_string())
            }
            PostlensError::Http(e) => ServiceError::Transport(e.to_string()),
            other @ (PostlensError::Json(_) | PostlensError::Url(_) | PostlensError::Config(_)) => {
                ServiceError::Unexpected(other.to_string())
            }
        }
    }
}
