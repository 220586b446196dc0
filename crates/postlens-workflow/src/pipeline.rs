//! Two-step analysis pipeline.
//!
//! ```text
//! idle -> extracting -> analyzing -> success
//!              |             |
//!              +--> error <--+
//! ```
//!
//! The analysis request is only issued after extraction succeeded and its
//! text has been stored. Failures never escape: they land in `error` with a
//! single user-facing message. Leaving `success` or `error` takes an explicit
//! [`AnalysisPipeline::reset`].

use postlens_core::{
    AnalysisResult, DocumentAnalyzer, PipelineStatus, PipelineStep, SelectedFile, ServiceError,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

pub struct AnalysisPipeline {
    analyzer: Arc<dyn DocumentAnalyzer>,
    status: watch::Sender<PipelineStatus>,
    extracted_text: Option<String>,
    analysis: Option<AnalysisResult>,
    error_message: Option<String>,
}

impl AnalysisPipeline {
    pub fn new(analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        let (status, _) = watch::channel(PipelineStatus::Idle);
        Self {
            analyzer,
            status,
            extracted_text: None,
            analysis: None,
            error_message: None,
        }
    }

    /// Follow status changes, e.g. to drive a progress indicator.
    pub fn subscribe(&self) -> watch::Receiver<PipelineStatus> {
        self.status.subscribe()
    }

    pub fn status(&self) -> PipelineStatus {
        *self.status.borrow()
    }

    /// Text from the last successful extraction.
    ///
    /// Kept after a later analysis failure.
    pub fn extracted_text(&self) -> Option<&str> {
        self.extracted_text.as_deref()
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    /// Set only while the status is `error`.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Run extraction then analysis for `file`.
    ///
    /// A no-op unless the pipeline is idle and a file is present. Returns the
    /// status the pipeline ends in.
    #[instrument(skip_all, fields(file = file.map(|f| f.name())))]
    pub async fn start(&mut self, file: Option<&SelectedFile>) -> PipelineStatus {
        let Some(file) = file else {
            debug!("Start requested without a selected file; ignoring");
            return self.status();
        };

        if self.status() != PipelineStatus::Idle {
            debug!(status = %self.status(), "Start requested outside idle; ignoring");
            return self.status();
        }

        let text = match self.run_extraction(file).await {
            Ok(text) => text,
            Err(err) => return self.fail(PipelineStep::Extraction, err),
        };

        match self.run_analysis(&text).await {
            Ok(analysis) => {
                self.analysis = Some(analysis);
                self.transition(PipelineStatus::Success);
            }
            Err(err) => return self.fail(PipelineStep::Analysis, err),
        }

        self.status()
    }

    /// Back to `idle` with every derived value cleared.
    pub fn reset(&mut self) {
        self.extracted_text = None;
        self.analysis = None;
        self.error_message = None;
        self.transition(PipelineStatus::Idle);
    }

    async fn run_extraction(&mut self, file: &SelectedFile) -> Result<String, ServiceError> {
        self.transition(PipelineStatus::Extracting);

        let extraction = self.analyzer.extract(file).await?;
        debug!(chars = extraction.extracted_text.len(), "Extraction finished");

        self.extracted_text = Some(extraction.extracted_text.clone());
        Ok(extraction.extracted_text)
    }

    async fn run_analysis(&mut self, text: &str) -> Result<AnalysisResult, ServiceError> {
        self.transition(PipelineStatus::Analyzing);

        let analysis = self.analyzer.analyze(text).await?;
        debug!(
            suggestions = analysis.improvement_suggestions.len(),
            "Analysis finished"
        );

        Ok(analysis)
    }

    fn fail(&mut self, step: PipelineStep, err: ServiceError) -> PipelineStatus {
        let message = err.user_message(step);
        warn!(%step, error = %err, %message, "Pipeline step failed");

        self.error_message = Some(message);
        self.transition(PipelineStatus::Error);
        self.status()
    }

    fn transition(&mut self, next: PipelineStatus) {
        let previous = self.status.send_replace(next);
        if previous != next {
            info!(from = %previous, to = %next, "Pipeline transition");
        }
    }
}

impl std::fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisPipeline")
            .field("status", &self.status())
            .field("extracted_text", &self.extracted_text.as_ref().map(|t| t.len()))
            .field("analysis", &self.analysis)
            .field("error_message", &self.error_message)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use postlens_core::Extraction;
    use std::sync::Mutex;

    /// Scripted analyzer that records each call with the status seen at call time.
    pub(crate) struct FakeAnalyzer {
        extract_result: Result<Extraction, ServiceError>,
        analyze_result: Result<AnalysisResult, ServiceError>,
        observer: Mutex<Option<watch::Receiver<PipelineStatus>>>,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl FakeAnalyzer {
        pub(crate) fn new(
            extract_result: Result<Extraction, ServiceError>,
            analyze_result: Result<AnalysisResult, ServiceError>,
        ) -> Self {
            Self {
                extract_result,
                analyze_result,
                observer: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn succeeding() -> Self {
            Self::new(
                Ok(Extraction::new("Hello world")),
                Ok(AnalysisResult::new("A greeting", "Neutral")
                    .with_suggestion("Add a call to action")),
            )
        }

        pub(crate) fn observe(&self, rx: watch::Receiver<PipelineStatus>) {
            *self.observer.lock().unwrap() = Some(rx);
        }

        fn record(&self, call: String) {
            let seen = self
                .observer
                .lock()
                .unwrap()
                .as_ref()
                .map(|rx| rx.borrow().to_string())
                .unwrap_or_default();
            self.calls.lock().unwrap().push(format!("{}@{}", call, seen));
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DocumentAnalyzer for FakeAnalyzer {
        async fn extract(&self, file: &SelectedFile) -> Result<Extraction, ServiceError> {
            self.record(format!("extract:{}", file.name()));
            self.extract_result.clone()
        }

        async fn analyze(&self, text: &str) -> Result<AnalysisResult, ServiceError> {
            self.record(format!("analyze:{}", text));
            self.analyze_result.clone()
        }
    }

    fn pipeline_with(fake: Arc<FakeAnalyzer>) -> AnalysisPipeline {
        let pipeline = AnalysisPipeline::new(fake.clone());
        fake.observe(pipeline.subscribe());
        pipeline
    }

    fn pdf() -> SelectedFile {
        SelectedFile::new("post.pdf", "application/pdf", vec![0u8; 2 * 1024 * 1024])
    }

    #[tokio::test]
    async fn test_happy_path_runs_steps_in_order() {
        let fake = Arc::new(FakeAnalyzer::succeeding());
        let mut pipeline = pipeline_with(fake.clone());
        let file = pdf();

        assert_eq!(pipeline.status(), PipelineStatus::Idle);
        let status = pipeline.start(Some(&file)).await;

        assert_eq!(status, PipelineStatus::Success);
        assert_eq!(
            fake.calls(),
            vec![
                "extract:post.pdf@extracting".to_string(),
                "analyze:Hello world@analyzing".to_string(),
            ]
        );
        assert_eq!(pipeline.extracted_text(), Some("Hello world"));

        let analysis = pipeline.analysis().unwrap();
        assert_eq!(analysis.summary, "A greeting");
        assert_eq!(analysis.sentiment, "Neutral");
        assert_eq!(analysis.improvement_suggestions, vec!["Add a call to action"]);
        assert!(pipeline.error_message().is_none());
    }

    #[tokio::test]
    async fn test_start_without_file_is_noop() {
        let fake = Arc::new(FakeAnalyzer::succeeding());
        let mut pipeline = pipeline_with(fake.clone());

        let status = pipeline.start(None).await;

        assert_eq!(status, PipelineStatus::Idle);
        assert!(fake.calls().is_empty());
    }

    #[tokio::test]
    async fn test_extraction_failure_never_reaches_analysis() {
        let fake = Arc::new(FakeAnalyzer::new(
            Err(ServiceError::rejected(500, Some("Unsupported file".to_string()))),
            Ok(AnalysisResult::new("unused", "unused")),
        ));
        let mut pipeline = pipeline_with(fake.clone());

        let status = pipeline.start(Some(&pdf())).await;

        assert_eq!(status, PipelineStatus::Error);
        assert_eq!(pipeline.error_message(), Some("Unsupported file"));
        assert_eq!(fake.calls(), vec!["extract:post.pdf@extracting".to_string()]);
        assert!(pipeline.extracted_text().is_none());
        assert!(pipeline.analysis().is_none());
    }

    #[tokio::test]
    async fn test_analysis_failure_keeps_extracted_text() {
        let fake = Arc::new(FakeAnalyzer::new(
            Ok(Extraction::new("Hello world")),
            Err(ServiceError::rejected(500, None)),
        ));
        let mut pipeline = pipeline_with(fake.clone());

        let status = pipeline.start(Some(&pdf())).await;

        assert_eq!(status, PipelineStatus::Error);
        assert_eq!(pipeline.error_message(), Some("AI Analysis failed."));
        assert_eq!(pipeline.extracted_text(), Some("Hello world"));
        assert!(pipeline.analysis().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_uses_step_fallback() {
        let fake = Arc::new(FakeAnalyzer::new(
            Err(ServiceError::Transport("connection refused".to_string())),
            Ok(AnalysisResult::new("unused", "unused")),
        ));
        let mut pipeline = pipeline_with(fake);

        pipeline.start(Some(&pdf())).await;

        assert_eq!(
            pipeline.error_message(),
            Some("Failed to extract text from the file.")
        );
    }

    #[tokio::test]
    async fn test_terminal_states_require_reset() {
        let fake = Arc::new(FakeAnalyzer::succeeding());
        let mut pipeline = pipeline_with(fake.clone());
        let file = pdf();

        pipeline.start(Some(&file)).await;
        let status = pipeline.start(Some(&file)).await;

        assert_eq!(status, PipelineStatus::Success);
        assert_eq!(fake.calls().len(), 2);

        pipeline.reset();
        assert_eq!(pipeline.start(Some(&file)).await, PipelineStatus::Success);
        assert_eq!(fake.calls().len(), 4);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let fake = Arc::new(FakeAnalyzer::new(
            Ok(Extraction::new("Hello world")),
            Err(ServiceError::Unexpected("boom".to_string())),
        ));
        let mut pipeline = pipeline_with(fake);

        pipeline.start(Some(&pdf())).await;
        assert_eq!(pipeline.error_message(), Some("boom"));

        pipeline.reset();

        assert_eq!(pipeline.status(), PipelineStatus::Idle);
        assert!(pipeline.extracted_text().is_none());
        assert!(pipeline.analysis().is_none());
        assert!(pipeline.error_message().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_final_status() {
        let fake = Arc::new(FakeAnalyzer::succeeding());
        let mut pipeline = AnalysisPipeline::new(fake);
        let mut rx = pipeline.subscribe();

        pipeline.start(Some(&pdf())).await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), PipelineStatus::Success);
    }
}
