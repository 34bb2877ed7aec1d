//! Plain-file backend: one directory per subject holding JSON deck files, and
//! a single `progress.json` document at the library root.
//!
//! ```text
//! flashcards/
//! ├── progress.json
//! └── <subject>/
//!     └── <file>.json     # [{"question", "choices", "answer"}, ...]
//! ```

mod library;
mod progress_store;

pub use library::JsonLibrary;
pub use progress_store::{JsonProgressStore, PROGRESS_FILE_NAME};

use std::path::Path;
use std::sync::Arc;

use crate::repository::{DeckSource, ProgressStore, Storage};

impl Storage {
    /// Build a `Storage` where both decks and progress live under `root`.
    #[must_use]
    pub fn json(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let decks: Arc<dyn DeckSource> = Arc::new(JsonLibrary::new(root));
        let progress: Arc<dyn ProgressStore> =
            Arc::new(JsonProgressStore::new(root.join(PROGRESS_FILE_NAME)));
        Self { decks, progress }
    }
}
