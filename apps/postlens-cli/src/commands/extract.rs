//! Extraction-only command

use crate::config::Settings;
use crate::output;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use postlens_core::{PipelineStep, SelectedFile, ServiceError};
use std::path::Path;
use std::time::Duration;

pub async fn run(settings: &Settings, path: &Path) -> Result<()> {
    let file = SelectedFile::from_path(path)
        .await
        .with_context(|| format!("Could not read {}", path.display()))?;

    let client = super::build_client(settings)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")?,
    );
    spinner.set_message("Extracting text...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = client.extract(&file).await;
    spinner.finish_and_clear();

    let extraction = result.map_err(|e| {
        let err = ServiceError::from(e);
        tracing::debug!(error = %err, "Extraction failed");
        anyhow::anyhow!(err.user_message(PipelineStep::Extraction))
    })?;

    if !output::print_structured(&extraction, settings.format)? {
        println!("{}", extraction.extracted_text);
    }

    Ok(())
}
