//! Non-interactive subcommands.

use anyhow::{Context, Result};
use quiz_core::model::SubjectName;
use services::CatalogService;
use ui::{StudyOutcome, StudyRequest, TerminalApp};

use crate::cli::StudyArgs;

pub async fn list_subjects(catalog: &CatalogService) -> Result<()> {
    let subjects = catalog.list_subjects().await?;
    if subjects.is_empty() {
        println!("No subjects found.");
    }
    for subject in subjects {
        println!("{subject}");
    }
    Ok(())
}

pub async fn show_progress(catalog: &CatalogService, subject: &SubjectName) -> Result<()> {
    let options = catalog
        .file_options(subject)
        .await
        .with_context(|| format!("reading subject {subject}"))?;
    if options.is_empty() {
        println!("No JSON flashcard files found in {subject}.");
    }
    for option in options {
        println!("{}", option.label());
    }
    Ok(())
}

pub async fn reset(catalog: &CatalogService, subject: &SubjectName) -> Result<()> {
    if catalog.reset_subject(subject).await? {
        println!("Progress for '{subject}' was reset.");
    } else {
        println!("No progress recorded for '{subject}'.");
    }
    Ok(())
}

pub async fn study(app: &TerminalApp, args: StudyArgs) -> Result<()> {
    let request = StudyRequest {
        subject: args.subject,
        file: args.file,
    };
    let outcome = app.run(request).await?;

    if let Some(message) = outcome.message() {
        println!("{message}");
    }
    if let StudyOutcome::Completed(report) = &outcome {
        if let Some(err) = &report.save_error {
            eprintln!("warning: progress was not saved: {err}");
        }
    }
    Ok(())
}
