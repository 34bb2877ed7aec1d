use std::sync::Arc;

use quiz_core::model::{Deck, DeckFileName, DeckScope, Progress, SubjectName};
use storage::repository::{DeckSource, ProgressStore};
use tracing::info;

use crate::error::CatalogError;

/// One entry of the file menu: a deck scope and how much of it is learned.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOption {
    pub scope: DeckScope,
    pub cards: usize,
    pub percentage: f64,
}

impl FileOption {
    /// Menu label, e.g. `All files (42.5% learned)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({:.1}% learned)", self.scope, self.percentage)
    }
}

/// Menu-level queries over the deck library and progress store.
#[derive(Clone)]
pub struct CatalogService {
    decks: Arc<dyn DeckSource>,
    progress: Arc<dyn ProgressStore>,
}

impl CatalogService {
    #[must_use]
    pub fn new(decks: Arc<dyn DeckSource>, progress: Arc<dyn ProgressStore>) -> Self {
        Self { decks, progress }
    }

    /// Subjects available, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the library cannot be listed.
    pub async fn list_subjects(&self) -> Result<Vec<SubjectName>, CatalogError> {
        Ok(self.decks.list_subjects().await?)
    }

    /// Deck files of a subject, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the subject does not exist.
    pub async fn list_files(
        &self,
        subject: &SubjectName,
    ) -> Result<Vec<DeckFileName>, CatalogError> {
        Ok(self.decks.list_files(subject).await?)
    }

    /// `All files` followed by each file, annotated with mastery percentage.
    ///
    /// Returns an empty list when the subject has no deck files.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the subject is missing, a deck is
    /// invalid, or progress cannot be loaded.
    pub async fn file_options(&self, subject: &SubjectName) -> Result<Vec<FileOption>, CatalogError> {
        let files = self.decks.list_files(subject).await?;
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let progress = self.progress.load().await?;
        let mut options = Vec::with_capacity(files.len() + 1);

        let all = self.decks.load_deck(subject, &DeckScope::AllFiles).await?;
        options.push(option_for(&progress, &all));

        for file in files {
            let deck = self.decks.load_deck(subject, &DeckScope::File(file)).await?;
            options.push(option_for(&progress, &deck));
        }
        Ok(options)
    }

    /// Clear a subject's mastery and time. Returns `false` if it had no record.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if progress cannot be loaded or saved.
    pub async fn reset_subject(&self, subject: &SubjectName) -> Result<bool, CatalogError> {
        let reset = self.progress.reset(subject).await?;
        info!(%subject, reset, "reset subject progress");
        Ok(reset)
    }
}

fn option_for(progress: &Progress, deck: &Deck) -> FileOption {
    FileOption {
        scope: deck.scope().clone(),
        cards: deck.len(),
        percentage: progress.percentage_mastered(deck.subject(), deck),
    }
}
