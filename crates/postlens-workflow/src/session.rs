//! Session controller for a presentation layer.
//!
//! A [`Session`] wires the drag counter, file intake, preview manager and
//! analysis pipeline together and exposes the single state a UI renders
//! through [`Session::view`].

use crate::drag::DragCounter;
use crate::intake::FileIntake;
use crate::pipeline::AnalysisPipeline;
use postlens_core::{
    AnalysisResult, DocumentAnalyzer, PipelineStatus, PipelineStep, PreviewHandle, PreviewStore,
    SelectedFile, UNEXPECTED_ERROR_MESSAGE,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// What the presentation layer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionView<'a> {
    /// Nothing selected; show the drop surface.
    Empty,
    /// A file is selected and the pipeline can be started.
    Ready {
        file: &'a SelectedFile,
        preview: Option<&'a PreviewHandle>,
    },
    /// A request is in flight.
    Working { step: PipelineStep },
    Done {
        analysis: &'a AnalysisResult,
        extracted_text: &'a str,
    },
    /// The pipeline stopped on an error. Text extracted before an analysis
    /// failure is still available.
    Failed {
        message: &'a str,
        extracted_text: Option<&'a str>,
    },
}

impl SessionView<'_> {
    pub fn status_label(&self) -> &'static str {
        match self {
            SessionView::Empty => "empty",
            SessionView::Ready { .. } => "ready",
            SessionView::Working { .. } => "working",
            SessionView::Done { .. } => "done",
            SessionView::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug)]
pub struct Session {
    drag: DragCounter,
    intake: FileIntake,
    pipeline: AnalysisPipeline,
}

impl Session {
    pub fn new(analyzer: Arc<dyn DocumentAnalyzer>, previews: Arc<dyn PreviewStore>) -> Self {
        Self {
            drag: DragCounter::new(),
            intake: FileIntake::new(previews),
            pipeline: AnalysisPipeline::new(analyzer),
        }
    }

    // ===== Drop surface =====

    /// Returns whether the drop surface is highlighted afterwards.
    pub fn drag_enter(&mut self) -> bool {
        self.drag.on_enter()
    }

    pub fn drag_leave(&mut self) -> bool {
        self.drag.on_leave()
    }

    /// Keeps the surface a valid drop target. Never changes state.
    pub fn drag_over(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Files dropped on the surface. Clears the highlight even when nothing
    /// usable was dropped.
    pub fn drop_files<I>(&mut self, files: I) -> Option<&SelectedFile>
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        self.drag.on_drop();
        self.intake.select_file(files, &mut self.pipeline)
    }

    /// Files chosen through the picker.
    pub fn pick_files<I>(&mut self, files: I) -> Option<&SelectedFile>
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        self.intake.select_file(files, &mut self.pipeline)
    }

    // ===== Pipeline =====

    pub async fn start(&mut self) -> PipelineStatus {
        self.pipeline.start(self.intake.current()).await
    }

    /// Start over: no file, no preview, idle pipeline.
    pub fn reset(&mut self) {
        debug!("Session reset");
        self.drag.reset();
        self.intake.reset(&mut self.pipeline);
    }

    pub fn subscribe(&self) -> watch::Receiver<PipelineStatus> {
        self.pipeline.subscribe()
    }

    pub fn status(&self) -> PipelineStatus {
        self.pipeline.status()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.intake.current()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.intake.preview()
    }

    pub fn pipeline(&self) -> &AnalysisPipeline {
        &self.pipeline
    }

    pub fn view(&self) -> SessionView<'_> {
        match self.pipeline.status() {
            PipelineStatus::Idle => match self.intake.current() {
                Some(file) => SessionView::Ready {
                    file,
                    preview: self.intake.preview(),
                },
                None => SessionView::Empty,
            },
            PipelineStatus::Extracting => SessionView::Working {
                step: PipelineStep::Extraction,
            },
            PipelineStatus::Analyzing => SessionView::Working {
                step: PipelineStep::Analysis,
            },
            PipelineStatus::Success => match self.pipeline.analysis() {
                Some(analysis) => SessionView::Done {
                    analysis,
                    extracted_text: self.pipeline.extracted_text().unwrap_or_default(),
                },
                None => SessionView::Failed {
                    message: UNEXPECTED_ERROR_MESSAGE,
                    extracted_text: self.pipeline.extracted_text(),
                },
            },
            PipelineStatus::Error => SessionView::Failed {
                message: self
                    .pipeline
                    .error_message()
                    .unwrap_or(UNEXPECTED_ERROR_MESSAGE),
                extracted_text: self.pipeline.extracted_text(),
            },
        }
    }
}
