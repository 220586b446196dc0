//! Ports the workflow drives: the remote services and the preview backend.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AnalysisResult, Extraction, PreviewHandle, SelectedFile};

/// The two remote steps of the pipeline.
///
/// Implemented over HTTP by `postlens-sdk`; tests substitute in-memory fakes.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Turn a document into plain text.
    async fn extract(&self, file: &SelectedFile) -> Result<Extraction>;

    /// Summarise previously extracted text.
    async fn analyze(&self, text: &str) -> Result<AnalysisResult>;
}

/// Creates and releases renderable previews of a file.
pub trait PreviewStore: Send + Sync {
    fn create(&self, file: &SelectedFile) -> PreviewHandle;

    /// Release a handle. Revoking an unknown handle is a no-op.
    fn revoke(&self, handle: &PreviewHandle);
}
