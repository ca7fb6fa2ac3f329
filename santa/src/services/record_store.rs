//! File-backed record store
//!
//! Each group lives in one delimited text file. Backups are written next to
//! the original as `<stem>.backup-<UTC timestamp>-<uuid>.<ext>` and opened
//! with `create_new`, so an existing backup can never be overwritten. Updates
//! go to a temporary sibling first and are renamed over the original.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::Roster;
use crate::error::{SantaError, SantaResult};
use crate::traits::RecordStore;

/// Record store over plain files on the local disk
#[derive(Debug, Clone, Default)]
pub struct FileRecordStore;

impl FileRecordStore {
    pub fn new() -> Self {
        Self
    }

    /// Fresh backup path beside `records`
    fn backup_path(records: &Path) -> PathBuf {
        let stem = records
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "records".to_string());
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let unique = uuid::Uuid::new_v4().simple();

        let file_name = match records.extension() {
            Some(ext) => format!("{stem}.backup-{stamp}-{unique}.{}", ext.to_string_lossy()),
            None => format!("{stem}.backup-{stamp}-{unique}"),
        };
        records.with_file_name(file_name)
    }

    fn temp_path(records: &Path) -> PathBuf {
        let name = records
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "records".to_string());
        records.with_file_name(format!(".{name}.{}.tmp", uuid::Uuid::new_v4().simple()))
    }

    async fn write_new_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await?;
        file.write_all(content).await?;
        file.flush().await?;
        file.sync_all().await
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn load(&self, records: &Path) -> SantaResult<Roster> {
        let content = fs::read_to_string(records)
            .await
            .map_err(|e| SantaError::record_store("read", records, e))?;

        let roster = Roster::parse(&content, records)?;
        debug!(path = %records.display(), participants = roster.len(), "📂 Loaded records");
        Ok(roster)
    }

    async fn backup(&self, records: &Path) -> SantaResult<PathBuf> {
        let content = fs::read(records)
            .await
            .map_err(|e| SantaError::record_store("read", records, e))?;

        let backup = Self::backup_path(records);
        Self::write_new_synced(&backup, &content)
            .await
            .map_err(|e| SantaError::record_store("backup", &backup, e))?;

        debug!(path = %backup.display(), bytes = content.len(), "💾 Backed up records");
        Ok(backup)
    }

    async fn persist(&self, records: &Path, roster: &Roster) -> SantaResult<()> {
        let temp = Self::temp_path(records);

        if let Err(e) = Self::write_new_synced(&temp, roster.render().as_bytes()).await {
            let _ = fs::remove_file(&temp).await;
            return Err(SantaError::record_store("write", &temp, e));
        }

        if let Err(e) = fs::rename(&temp, records).await {
            let _ = fs::remove_file(&temp).await;
            return Err(SantaError::record_store("replace", records, e));
        }

        debug!(path = %records.display(), "📝 Updated records");
        Ok(())
    }
}
