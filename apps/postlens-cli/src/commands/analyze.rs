//! Extract-then-analyze command

use crate::config::Settings;
use crate::output::{self, OutputFormat};
use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use postlens_core::{AcceptFilter, AnalysisResult, PipelineStep, SelectedFile};
use postlens_workflow::{MemoryPreviewStore, Session, SessionView};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// Machine-readable result of a run.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Report<'a> {
    Success {
        file: &'a str,
        #[serde(flatten)]
        analysis: &'a AnalysisResult,
        #[serde(skip_serializing_if = "Option::is_none")]
        extracted_text: Option<&'a str>,
    },
    Error {
        file: &'a str,
        message: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        extracted_text: Option<&'a str>,
    },
}

pub async fn run(settings: &Settings, paths: &[PathBuf], show_text: bool) -> Result<ExitCode> {
    // Extra paths are discarded unread.
    let first = paths.first().context("No file to analyze")?;
    let file = SelectedFile::from_path(first)
        .await
        .with_context(|| format!("Could not read {}", first.display()))?;

    let client = super::build_client(settings)?;
    let mut session = Session::new(Arc::new(client), Arc::new(MemoryPreviewStore::new()));

    let selected = session
        .pick_files([file])
        .context("No file to analyze")?
        .clone();

    if paths.len() > 1 {
        output::info(&format!(
            "Using {}; ignoring {} more file(s)",
            selected.name(),
            paths.len() - 1
        ));
    }

    let filter = AcceptFilter::default();
    if !filter.matches(&selected) {
        output::warning(&format!(
            "{} ({}) is not a PDF, PNG or JPEG; the service may reject it",
            selected.name(),
            selected.mime_type()
        ));
    }

    tracing::debug!(
        file = %selected.name(),
        size = %output::format_size(selected.size()),
        preview = ?session.preview().map(|p| p.url()),
        "Starting analysis"
    );

    let spinner = if settings.format == OutputFormat::Text {
        new_spinner()?
    } else {
        ProgressBar::hidden()
    };

    let follower = {
        let spinner = spinner.clone();
        let mut rx = session.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let status = *rx.borrow_and_update();
                if let Some(step) = status.step() {
                    spinner.set_message(step_message(step));
                }
            }
        })
    };

    session.start().await;

    follower.abort();
    spinner.finish_and_clear();

    render(session.view(), selected.name(), show_text, settings.format)
}

fn new_spinner() -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")?,
    );
    spinner.set_message(step_message(PipelineStep::Extraction));
    spinner.enable_steady_tick(Duration::from_millis(80));
    Ok(spinner)
}

fn step_message(step: PipelineStep) -> &'static str {
    match step {
        PipelineStep::Extraction => "Extracting text...",
        PipelineStep::Analysis => "Analyzing content...",
    }
}

fn render(
    view: SessionView<'_>,
    file: &str,
    show_text: bool,
    format: OutputFormat,
) -> Result<ExitCode> {
    match view {
        SessionView::Done {
            analysis,
            extracted_text,
        } => {
            let extracted_text = Some(extracted_text).filter(|_| show_text);
            let report = Report::Success {
                file,
                analysis,
                extracted_text,
            };
            if !output::print_structured(&report, format)? {
                print_analysis(analysis);
                if let Some(text) = extracted_text {
                    print_extracted_text(text);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        SessionView::Failed {
            message,
            extracted_text,
        } => {
            let extracted_text = extracted_text.filter(|_| show_text);
            let report = Report::Error {
                file,
                message,
                extracted_text,
            };
            if !output::print_structured(&report, format)? {
                output::error(message);
                if let Some(text) = extracted_text {
                    print_extracted_text(text);
                }
            }
            Ok(ExitCode::FAILURE)
        }
        other => anyhow::bail!("Analysis did not run (state: {})", other.status_label()),
    }
}

fn print_analysis(analysis: &AnalysisResult) {
    output::section("Summary");
    println!("{}", analysis.summary);

    println!();
    output::key_value("Sentiment", &analysis.sentiment.cyan().to_string());

    output::section("Suggestions");
    if analysis.improvement_suggestions.is_empty() {
        output::dimmed("  (none)");
    }
    for (i, suggestion) in analysis.improvement_suggestions.iter().enumerate() {
        output::list_item(i + 1, suggestion);
    }
}

fn print_extracted_text(text: &str) {
    output::section("Extracted text");
    if text.trim().is_empty() {
        output::dimmed("(no text found)");
    } else {
        println!("{}", text);
    }
}
