use async_trait::async_trait;
use quiz_core::model::{
    Card, Deck, DeckError, DeckFileName, DeckScope, Progress, SubjectName,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid deck {location}: {source}")]
    InvalidDeck {
        location: String,
        #[source]
        source: DeckError,
    },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Durable per-subject mastery and study time.
///
/// `save` always rewrites the full mapping; concurrent writers are
/// last-writer-wins.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Load every subject's record. Missing backing data yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store exists but cannot be read.
    async fn load(&self) -> Result<Progress, StorageError>;

    /// Persist the full mapping, replacing whatever was stored before.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be written.
    async fn save(&self, progress: &Progress) -> Result<(), StorageError>;

    /// Clear one subject's mastery and time. Returns `false` (and writes
    /// nothing) if the subject has no record yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if loading or saving fails.
    async fn reset(&self, subject: &SubjectName) -> Result<bool, StorageError> {
        let mut progress = self.load().await?;
        if !progress.reset(subject) {
            return Ok(false);
        }
        self.save(&progress).await?;
        Ok(true)
    }

    /// Share of `deck` already mastered for `subject`, in percent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if loading fails.
    async fn percentage_mastered(
        &self,
        subject: &SubjectName,
        deck: &Deck,
    ) -> Result<f64, StorageError> {
        Ok(self.load().await?.percentage_mastered(subject, deck))
    }
}

/// Enumerates subjects and deck files and loads decks from them.
#[async_trait]
pub trait DeckSource: Send + Sync {
    /// Subjects available, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the library cannot be listed.
    async fn list_subjects(&self) -> Result<Vec<SubjectName>, StorageError>;

    /// Deck files of a subject, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the subject does not exist.
    async fn list_files(&self, subject: &SubjectName) -> Result<Vec<DeckFileName>, StorageError>;

    /// Load the cards in scope, in file order. An empty deck is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the subject or file is absent and
    /// `StorageError::InvalidDeck` if a card breaks the card invariants.
    async fn load_deck(
        &self,
        subject: &SubjectName,
        scope: &DeckScope,
    ) -> Result<Deck, StorageError>;
}

type SubjectFiles = BTreeMap<DeckFileName, Vec<Card>>;

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    library: Arc<Mutex<BTreeMap<SubjectName, SubjectFiles>>>,
    progress: Arc<Mutex<Progress>>,
    saves: Arc<AtomicUsize>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) one deck file for a subject.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_file(
        &self,
        subject: SubjectName,
        file: DeckFileName,
        cards: Vec<Card>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .library
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.entry(subject).or_default().insert(file, cards);
        Ok(())
    }

    /// Number of successful `save` calls so far.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProgressStore for InMemoryRepository {
    async fn load(&self) -> Result<Progress, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, progress: &Progress) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = progress.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl DeckSource for InMemoryRepository {
    async fn list_subjects(&self) -> Result<Vec<SubjectName>, StorageError> {
        let guard = self
            .library
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.keys().cloned().collect())
    }

    async fn list_files(&self, subject: &SubjectName) -> Result<Vec<DeckFileName>, StorageError> {
        let guard = self
            .library
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(subject)
            .map(|files| files.keys().cloned().collect())
            .ok_or_else(|| StorageError::NotFound(format!("subject {subject}")))
    }

    async fn load_deck(
        &self,
        subject: &SubjectName,
        scope: &DeckScope,
    ) -> Result<Deck, StorageError> {
        let guard = self
            .library
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let files = guard
            .get(subject)
            .ok_or_else(|| StorageError::NotFound(format!("subject {subject}")))?;

        let cards = match scope {
            DeckScope::AllFiles => files.values().flatten().cloned().collect(),
            DeckScope::File(name) => files
                .get(name)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(format!("deck file {subject}/{name}")))?,
        };
        Ok(Deck::new(subject.clone(), scope.clone(), cards))
    }
}

/// Aggregates the deck library and progress store behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub decks: Arc<dyn DeckSource>,
    pub progress: Arc<dyn ProgressStore>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{CardDraft, MasteryRecord};

    fn subject(name: &str) -> SubjectName {
        SubjectName::new(name).unwrap()
    }

    fn file(name: &str) -> DeckFileName {
        DeckFileName::new(name).unwrap()
    }

    fn card(q: &str) -> Card {
        CardDraft::new(q, ["a", "b"], "a").validate().unwrap()
    }

    #[tokio::test]
    async fn all_files_concatenates_in_file_order() {
        let repo = InMemoryRepository::new();
        repo.insert_file(subject("s"), file("b.json"), vec![card("B1")])
            .unwrap();
        repo.insert_file(subject("s"), file("a.json"), vec![card("A1"), card("A2")])
            .unwrap();

        let deck = repo
            .load_deck(&subject("s"), &DeckScope::AllFiles)
            .await
            .unwrap();
        let questions: Vec<_> = deck.cards().iter().map(Card::question).collect();
        assert_eq!(questions, vec!["A1", "A2", "B1"]);
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let repo = InMemoryRepository::new();
        repo.insert_file(subject("s"), file("a.json"), vec![card("A1")])
            .unwrap();

        let err = repo
            .load_deck(&subject("s"), &DeckScope::File(file("zzz.json")))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = repo.list_files(&subject("nope")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn default_reset_skips_write_for_unknown_subject() {
        let repo = InMemoryRepository::new();
        let mut progress = Progress::new();
        progress.insert(
            subject("a"),
            MasteryRecord::from_persisted(["Q".to_string()], 5),
        );
        repo.save(&progress).await.unwrap();

        assert!(!repo.reset(&subject("b")).await.unwrap());
        assert_eq!(repo.save_count(), 1);

        assert!(repo.reset(&subject("a")).await.unwrap());
        assert_eq!(repo.save_count(), 2);
        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded.get(&subject("a")), Some(&MasteryRecord::new()));
    }
}
