use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::json::JsonLibrary;
use crate::repository::{DeckSource, ProgressStore, Storage};

mod mapping;
mod progress_repo;
mod schema;

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Connect to `SQLite` using the given URL.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established or if
    /// enforcing foreign key constraints fails during setup.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA foreign_keys = ON;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the progress tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if a DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), SqliteInitError> {
        schema::ensure_schema(&self.pool).await
    }
}

impl Storage {
    /// Build a `Storage` with decks read from `flashcards_dir` and progress
    /// kept in `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or schema setup fails.
    pub async fn sqlite(
        flashcards_dir: impl AsRef<Path>,
        database_url: &str,
    ) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.ensure_schema().await?;
        let decks: Arc<dyn DeckSource> = Arc::new(JsonLibrary::new(flashcards_dir.as_ref()));
        let progress: Arc<dyn ProgressStore> = Arc::new(repo);
        Ok(Self { decks, progress })
    }
}
