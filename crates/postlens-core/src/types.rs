use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fallback used when nothing better than "it failed" is known.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

// Selected file

/// A document captured from the picker or a drop.
///
/// Immutable once built: a new selection replaces the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    mime_type: String,
    data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        Ok(Self::new(name, mime_type, data))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Size of the payload in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

// Preview handle

/// Renderable reference to the selected file's bytes.
///
/// Deliberately not `Clone`: the preview manager is the only owner.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    url: String,
}

impl PreviewHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

// Service payloads

/// Body of a successful `POST /api/extract`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    pub extracted_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Extraction {
    pub fn new(extracted_text: impl Into<String>) -> Self {
        Self {
            extracted_text: extracted_text.into(),
            filename: None,
            file_type: None,
            status: None,
        }
    }
}

/// Body of a successful `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub sentiment: String,
    pub improvement_suggestions: Vec<String>,
}

impl AnalysisResult {
    pub fn new(summary: impl Into<String>, sentiment: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            sentiment: sentiment.into(),
            improvement_suggestions: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.improvement_suggestions.push(suggestion.into());
        self
    }
}

// Pipeline status

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    #[default]
    Idle,
    Extracting,
    Analyzing,
    Success,
    Error,
}

impl PipelineStatus {
    /// A request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, PipelineStatus::Extracting | PipelineStatus::Analyzing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStatus::Success | PipelineStatus::Error)
    }

    /// The step that is running, if any.
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            PipelineStatus::Extracting => Some(PipelineStep::Extraction),
            PipelineStatus::Analyzing => Some(PipelineStep::Analysis),
            _ => None,
        }
    }
}

impl std::fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStatus::Idle => write!(f, "idle"),
            PipelineStatus::Extracting => write!(f, "extracting"),
            PipelineStatus::Analyzing => write!(f, "analyzing"),
            PipelineStatus::Success => write!(f, "success"),
            PipelineStatus::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStep {
    Extraction,
    Analysis,
}

impl PipelineStep {
    /// Message shown when the step fails without a usable detail.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            PipelineStep::Extraction => "Failed to extract text from the file.",
            PipelineStep::Analysis => "AI Analysis failed.",
        }
    }

    /// Status the pipeline reports while this step runs.
    pub fn status(&self) -> PipelineStatus {
        match self {
            PipelineStep::Extraction => PipelineStatus::Extracting,
            PipelineStep::Analysis => PipelineStatus::Analyzing,
        }
    }
}

impl std::fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStep::Extraction => write!(f, "extraction"),
            PipelineStep::Analysis => write!(f, "analysis"),
        }
    }
}

// Accept filter

/// Advisory filter for the picker and drop surface.
///
/// Validation proper happens in the extraction service; this only hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptFilter {
    extensions: Vec<String>,
    mime_types: Vec<String>,
}

impl AcceptFilter {
    pub fn new() -> Self {
        Self {
            extensions: vec!["pdf".to_string()],
            mime_types: vec![
                "application/pdf".to_string(),
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
            ],
        }
    }

    pub fn matches(&self, file: &SelectedFile) -> bool {
        let mime = file.mime_type().to_ascii_lowercase();
        if self.mime_types.iter().any(|m| *m == mime) {
            return true;
        }

        file.name().rsplit_once('.').is_some_and(|(_, ext)| {
            self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
        })
    }

    /// The `accept` attribute form, e.g. `.pdf,image/png,image/jpeg`.
    pub fn accept_attribute(&self) -> String {
        self.extensions
            .iter()
            .map(|e| format!(".{}", e))
            .chain(
                self.mime_types
                    .iter()
                    .filter(|m| m.as_str() != "image/jpg" && m.as_str() != "application/pdf")
                    .cloned(),
            )
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for AcceptFilter {
    fn default() -> Self {
        Self::new()
    }
}
