use sqlx::SqlitePool;

use super::SqliteInitError;

/// Creates the progress tables. Idempotent; there is no version tracking.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS subjects (
                name TEXT PRIMARY KEY,
                time_spent_secs INTEGER NOT NULL CHECK (time_spent_secs >= 0)
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS mastered_questions (
                subject TEXT NOT NULL,
                question TEXT NOT NULL,
                PRIMARY KEY (subject, question),
                FOREIGN KEY (subject) REFERENCES subjects(name) ON DELETE CASCADE
            );
        ",
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
