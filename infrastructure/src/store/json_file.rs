//! Directory-backed store: one pretty-printed JSON document per record
//!
//! ```text
//! <directory>/
//!   3f2b...-....json   {"record_id", "created_at", "result": {...}}
//! ```
//!
//! Files are created with `create_new`, so an existing record is never
//! replaced.

use super::{check_record_id, new_record_id};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use survey_application::{RecordId, SimulationStore, StoreError};
use survey_domain::SimulationResult;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

const RECORD_EXTENSION: &str = "json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    record_id: RecordId,
    created_at: String,
    result: SimulationResult,
}

#[derive(Debug, Clone)]
pub struct JsonFileSimulationStore {
    directory: PathBuf,
}

impl JsonFileSimulationStore {
    /// Open a store rooted at `directory`, creating it if needed.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        info!("Simulation records stored in {}", directory.display());
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn record_path(&self, id: &RecordId) -> PathBuf {
        self.directory
            .join(format!("{}.{}", id.as_str(), RECORD_EXTENSION))
    }
}

/// Write a freshly created record file, removing it again if the write
/// fails so no truncated record is left behind.
async fn write_or_discard(
    mut file: tokio::fs::File,
    path: &Path,
    bytes: &[u8],
) -> std::io::Result<()> {
    let written = async {
        file.write_all(bytes).await?;
        file.flush().await
    }
    .await;
    drop(file);

    if let Err(e) = written {
        if let Err(cleanup) = tokio::fs::remove_file(path).await {
            warn!("Could not remove partial record {}: {}", path.display(), cleanup);
        }
        return Err(e);
    }
    Ok(())
}

#[async_trait]
impl SimulationStore for JsonFileSimulationStore {
    async fn save(&self, result: &SimulationResult) -> Result<RecordId, StoreError> {
        let id = new_record_id();
        let record = StoredRecord {
            record_id: id.clone(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            result: result.clone(),
        };
        let json = serde_json::to_vec_pretty(&record)?;

        let path = self.record_path(&id);
        let file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(id));
            }
            Err(e) => return Err(e.into()),
        };
        write_or_discard(file, &path, &json).await?;

        debug!("Wrote record {} to {}", id, path.display());
        Ok(id)
    }

    async fn load(&self, id: &RecordId) -> Result<SimulationResult, StoreError> {
        check_record_id(id)?;
        let path = self.record_path(id);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound(id.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let record: StoredRecord = serde_json::from_slice(&content)?;
        if record.record_id != *id {
            return Err(StoreError::Corrupt(format!(
                "{} holds record {}",
                path.display(),
                record.record_id
            )));
        }
        Ok(record.result)
    }

    async fn list(&self) -> Result<Vec<RecordId>, StoreError> {
        let mut ids = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.directory).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(RecordId::new(stem));
            }
        }
        ids.sort();
        Ok(ids)
    }
}
