//! File intake from the picker or a drop.

use crate::pipeline::AnalysisPipeline;
use crate::preview::PreviewManager;
use postlens_core::{PreviewHandle, PreviewStore, SelectedFile};
use std::sync::Arc;
use tracing::{debug, info};

/// Holds the currently selected file and its preview.
#[derive(Debug)]
pub struct FileIntake {
    current: Option<SelectedFile>,
    preview: PreviewManager,
}

impl FileIntake {
    pub fn new(previews: Arc<dyn PreviewStore>) -> Self {
        Self {
            current: None,
            preview: PreviewManager::new(previews),
        }
    }

    /// Accept the first of `offered` as the new selection.
    ///
    /// Empty input leaves everything untouched. Otherwise the pipeline is
    /// reset, the preview rebound and the new file becomes current.
    pub fn select_file<I>(
        &mut self,
        offered: I,
        pipeline: &mut AnalysisPipeline,
    ) -> Option<&SelectedFile>
    where
        I: IntoIterator<Item = SelectedFile>,
    {
        let mut offered = offered.into_iter();
        let Some(file) = offered.next() else {
            debug!("No file offered; keeping current selection");
            return None;
        };

        let ignored = offered.count();
        if ignored > 0 {
            debug!(ignored, "Only the first offered file is used");
        }

        pipeline.reset();
        self.preview.rebind(&file);

        info!(
            file = %file.name(),
            mime_type = %file.mime_type(),
            size = file.size(),
            "File selected"
        );

        Some(self.current.insert(file))
    }

    /// Drop the selection and its preview, and reset the pipeline.
    pub fn reset(&mut self, pipeline: &mut AnalysisPipeline) {
        self.current = None;
        self.preview.release();
        pipeline.reset();
    }

    pub fn current(&self) -> Option<&SelectedFile> {
        self.current.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.handle()
    }
}
