use std::collections::BTreeMap;

use quiz_core::model::{MasteryRecord, Progress, SubjectName};
use sqlx::Row;
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{conn, secs_from_i64, secs_to_i64, ser, subject_from_row};
use crate::repository::{ProgressStore, StorageError};

#[async_trait::async_trait]
impl ProgressStore for SqliteRepository {
    async fn load(&self) -> Result<Progress, StorageError> {
        let subject_rows = sqlx::query("SELECT name, time_spent_secs FROM subjects ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let mut subjects: BTreeMap<SubjectName, (Vec<String>, u64)> = BTreeMap::new();
        for row in &subject_rows {
            let name = subject_from_row(row, "name")?;
            let secs = secs_from_i64(
                "time_spent_secs",
                row.try_get::<i64, _>("time_spent_secs").map_err(ser)?,
            )?;
            subjects.insert(name, (Vec::new(), secs));
        }

        let mastered_rows = sqlx::query("SELECT subject, question FROM mastered_questions")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;
        for row in &mastered_rows {
            let subject = subject_from_row(row, "subject")?;
            let question: String = row.try_get("question").map_err(ser)?;
            let Some((questions, _)) = subjects.get_mut(&subject) else {
                return Err(StorageError::Serialization(format!(
                    "mastered question for unknown subject {subject}"
                )));
            };
            questions.push(question);
        }

        Ok(subjects
            .into_iter()
            .map(|(subject, (questions, secs))| {
                (subject, MasteryRecord::from_persisted(questions, secs))
            })
            .collect())
    }

    async fn save(&self, progress: &Progress) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query("DELETE FROM mastered_questions")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        sqlx::query("DELETE FROM subjects")
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (subject, record) in progress.iter() {
            sqlx::query("INSERT INTO subjects (name, time_spent_secs) VALUES (?1, ?2)")
                .bind(subject.as_str())
                .bind(secs_to_i64("time_spent_secs", record.time_spent_secs())?)
                .execute(&mut *tx)
                .await
                .map_err(conn)?;

            for question in record.mastered() {
                sqlx::query("INSERT INTO mastered_questions (subject, question) VALUES (?1, ?2)")
                    .bind(subject.as_str())
                    .bind(question.as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(conn)?;
            }
        }

        tx.commit().await.map_err(conn)?;
        debug!(subjects = progress.len(), "saved progress to sqlite");
        Ok(())
    }

    async fn reset(&self, subject: &SubjectName) -> Result<bool, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let updated = sqlx::query("UPDATE subjects SET time_spent_secs = 0 WHERE name = ?1")
            .bind(subject.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?
            .rows_affected();
        if updated == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM mastered_questions WHERE subject = ?1")
            .bind(subject.as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        debug!(%subject, "reset subject progress");
        Ok(true)
    }
}
