use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::{MasteryRecord, Progress, SubjectName};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::repository::{ProgressStore, StorageError};

pub const PROGRESS_FILE_NAME: &str = "progress.json";

/// Marker written for every mastered question.
const MASTERED_MARKER: u8 = 1;

/// Persisted shape of one subject inside `progress.json`.
///
/// Mirrors `MasteryRecord` so the domain type stays free of serde concerns.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SubjectEntry {
    #[serde(default)]
    mastered: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    time_spent: u64,
}

impl SubjectEntry {
    fn from_record(record: &MasteryRecord) -> Self {
        Self {
            mastered: record
                .mastered()
                .iter()
                .map(|q| (q.clone(), serde_json::Value::from(MASTERED_MARKER)))
                .collect(),
            time_spent: record.time_spent_secs(),
        }
    }

    fn into_record(self) -> MasteryRecord {
        MasteryRecord::from_persisted(self.mastered.into_keys(), self.time_spent)
    }
}

/// Progress kept in a single pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ProgressStore for JsonProgressStore {
    async fn load(&self) -> Result<Progress, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no progress file yet");
                return Ok(Progress::new());
            }
            Err(e) => return Err(e.into()),
        };

        let raw: BTreeMap<SubjectName, SubjectEntry> = serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Serialization(format!("{}: {e}", self.path.display())))?;

        Ok(raw
            .into_iter()
            .map(|(subject, entry)| (subject, entry.into_record()))
            .collect())
    }

    async fn save(&self, progress: &Progress) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let raw: BTreeMap<&SubjectName, SubjectEntry> = progress
            .iter()
            .map(|(subject, record)| (subject, SubjectEntry::from_record(record)))
            .collect();
        let body = serde_json::to_vec_pretty(&raw)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        // Write beside the target, then swap it in.
        let staging = self.staging_path();
        fs::write(&staging, body).await?;
        fs::rename(&staging, &self.path).await?;

        debug!(path = %self.path.display(), subjects = progress.len(), "saved progress");
        Ok(())
    }
}
