//! Feedback screen: display, export to a text file, and what to do next.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use dialoguer::Select;
use tracing::info;

use rehearse_core::export::FeedbackExport;

use crate::state::ConcreteController;

use super::renderer::InterviewRenderer;

/// What the user picked after reading their feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterFeedback {
    NewInterview,
    Exit,
}

const EXPORT: &str = "Export feedback to a text file";
const NEW_INTERVIEW: &str = "Start a new interview";
const EXIT: &str = "Exit";

/// Show feedback and loop on the post-feedback menu until the user moves on.
pub async fn run_feedback_screen(
    controller: &ConcreteController,
    renderer: &InterviewRenderer,
    export_dir: &Path,
) -> Result<AfterFeedback> {
    if let (Some(persona), Some(feedback)) = (controller.active_persona(), controller.feedback()) {
        renderer.print_feedback(&persona.name, feedback);
    }

    let items = [EXPORT, NEW_INTERVIEW, EXIT];
    loop {
        let selection = Select::new()
            .with_prompt("What next?")
            .items(&items)
            .default(0)
            .interact()?;

        match items[selection] {
            EXPORT => match controller.export_feedback() {
                Ok(export) => {
                    let path = write_export(export_dir, &export).await?;
                    println!(
                        "\n  {} Feedback saved to {}\n",
                        style("✓").green().bold(),
                        style(path.display()).cyan()
                    );
                }
                Err(e) => renderer.print_error(&e),
            },
            NEW_INTERVIEW => return Ok(AfterFeedback::NewInterview),
            _ => return Ok(AfterFeedback::Exit),
        }
    }
}

/// Write the export into `dir`, creating it if needed.
pub async fn write_export(dir: &Path, export: &FeedbackExport) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(&export.file_name);
    tokio::fs::write(&path, &export.content)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Feedback exported");
    Ok(path)
}
