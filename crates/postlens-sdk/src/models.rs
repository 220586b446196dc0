//! Wire models for the Postlens services

use serde::{Deserialize, Serialize};

pub use postlens_core::{AnalysisResult, Extraction, SelectedFile};

/// Body of `POST /api/analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

/// Error body returned by the services on a non-success status.
///
/// Only a string `detail` is meaningful; anything else is treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Extract the `detail` string from a raw response body, if there is one.
    pub fn detail_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .and_then(|d| d.as_str().map(String::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_from_json_body() {
        assert_eq!(
            ErrorBody::detail_from(r#"{"detail": "Unsupported file format."}"#),
            Some("Unsupported file format.".to_string())
        );
    }

    #[test]
    fn test_detail_absent_or_unparseable() {
        assert_eq!(ErrorBody::detail_from(r#"{"message": "nope"}"#), None);
        assert_eq!(ErrorBody::detail_from("<html>Internal Server Error</html>"), None);
        assert_eq!(ErrorBody::detail_from(""), None);
    }

    #[test]
    fn test_non_string_detail_is_ignored() {
        let validation = r#"{"detail": [{"loc": ["body", "text"], "msg": "field required"}]}"#;
        assert_eq!(ErrorBody::detail_from(validation), None);
    }
}
