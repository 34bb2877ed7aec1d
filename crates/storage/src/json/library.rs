use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::{
    Card, CardDraft, Deck, DeckError, DeckFileName, DeckScope, SubjectName,
};
use tokio::fs;
use tracing::{debug, warn};

use crate::repository::{DeckSource, StorageError};

const DECK_EXTENSION: &str = ".json";

/// Deck library rooted at a flashcards directory.
#[derive(Debug, Clone)]
pub struct JsonLibrary {
    root: PathBuf,
}

impl JsonLibrary {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn subject_dir(&self, subject: &SubjectName) -> PathBuf {
        self.root.join(subject.as_str())
    }

    fn deck_path(&self, subject: &SubjectName, file: &DeckFileName) -> PathBuf {
        self.subject_dir(subject).join(file.as_str())
    }

    /// Write a deck file, creating the subject directory when needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory or file cannot be written.
    pub async fn write_deck_file(
        &self,
        subject: &SubjectName,
        file: &DeckFileName,
        cards: &[CardDraft],
    ) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(self.subject_dir(subject)).await?;
        let path = self.deck_path(subject, file);
        let body = serde_json::to_vec_pretty(cards)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, body).await?;
        debug!(path = %path.display(), cards = cards.len(), "wrote deck file");
        Ok(path)
    }

    async fn read_cards(&self, path: &Path) -> Result<Vec<Card>, StorageError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(format!("deck file {}", path.display())));
            }
            Err(e) => return Err(e.into()),
        };
        let drafts: Vec<CardDraft> = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Serialization(format!("{}: {e}", path.display())))?;

        drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft.validate().map_err(|source| StorageError::InvalidDeck {
                    location: path.display().to_string(),
                    source: DeckError::InvalidCard { index, source },
                })
            })
            .collect()
    }
}

#[async_trait]
impl DeckSource for JsonLibrary {
    async fn list_subjects(&self) -> Result<Vec<SubjectName>, StorageError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(root = %self.root.display(), "flashcards directory missing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut subjects = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            match SubjectName::new(name) {
                Ok(subject) => subjects.push(subject),
                Err(err) => warn!(%err, "skipping subject directory"),
            }
        }
        subjects.sort();
        Ok(subjects)
    }

    async fn list_files(&self, subject: &SubjectName) -> Result<Vec<DeckFileName>, StorageError> {
        let dir = self.subject_dir(subject);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(format!("subject {subject}")));
            }
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(DECK_EXTENSION) || !entry.file_type().await?.is_file() {
                continue;
            }
            match DeckFileName::new(name) {
                Ok(file) => files.push(file),
                Err(err) => warn!(%err, "skipping deck file"),
            }
        }
        files.sort();
        Ok(files)
    }

    async fn load_deck(
        &self,
        subject: &SubjectName,
        scope: &DeckScope,
    ) -> Result<Deck, StorageError> {
        let cards = match scope {
            DeckScope::AllFiles => {
                let mut cards = Vec::new();
                for file in self.list_files(subject).await? {
                    cards.extend(self.read_cards(&self.deck_path(subject, &file)).await?);
                }
                cards
            }
            DeckScope::File(file) => {
                if fs::metadata(self.subject_dir(subject)).await.is_err() {
                    return Err(StorageError::NotFound(format!("subject {subject}")));
                }
                self.read_cards(&self.deck_path(subject, file)).await?
            }
        };

        debug!(%subject, %scope, cards = cards.len(), "loaded deck");
        Ok(Deck::new(subject.clone(), scope.clone(), cards))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(name: &str) -> SubjectName {
        SubjectName::new(name).unwrap()
    }

    fn file(name: &str) -> DeckFileName {
        DeckFileName::new(name).unwrap()
    }

    #[tokio::test]
    async fn missing_root_lists_no_subjects() {
        let dir = tempfile::tempdir().unwrap();
        let library = JsonLibrary::new(dir.path().join("absent"));
        assert!(library.list_subjects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lists_only_json_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let library = JsonLibrary::new(dir.path());
        let cards = [CardDraft::new("Q", ["a", "b"], "a")];
        library
            .write_deck_file(&subject("math"), &file("z.json"), &cards)
            .await
            .unwrap();
        library
            .write_deck_file(&subject("math"), &file("a.json"), &cards)
            .await
            .unwrap();
        std::fs::write(dir.path().join("math").join("notes.txt"), "ignore me").unwrap();

        let files = library.list_files(&subject("math")).await.unwrap();
        assert_eq!(files, vec![file("a.json"), file("z.json")]);
    }

    #[tokio::test]
    async fn invalid_card_fails_at_load_time() {
        let dir = tempfile::tempdir().unwrap();
        let library = JsonLibrary::new(dir.path());
        library
            .write_deck_file(
                &subject("math"),
                &file("bad.json"),
                &[
                    CardDraft::new("ok", ["a", "b"], "a"),
                    CardDraft::new("broken", ["a", "b"], "c"),
                ],
            )
            .await
            .unwrap();

        let err = library
            .load_deck(&subject("math"), &DeckScope::File(file("bad.json")))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidDeck { .. }));
    }
}
