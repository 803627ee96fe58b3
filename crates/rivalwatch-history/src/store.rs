//! File-backed history log

use std::path::{Path, PathBuf};

use chrono::Utc;
use rivalwatch_core::{truncate_chars, AnalysisKind, HistoryEntry};
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::HistoryError;

/// Capacity-bounded, newest-first log of completed analyses
///
/// The file is only ever replaced whole: a new version is written next to it
/// and renamed over it, so an interrupted write leaves the previous version
/// intact. Mutations go through one async mutex so concurrent appends never
/// drop each other's entries.
pub struct HistoryLog {
    path: PathBuf,
    capacity: usize,
    write_gate: Mutex<()>,
}

impl HistoryLog {
    /// Open the log at `path`, creating an empty one if it does not exist
    ///
    /// A capacity of 0 keeps nothing; appends still succeed.
    pub async fn open(path: impl Into<PathBuf>, capacity: usize) -> Result<Self, HistoryError> {
        let log = Self {
            path: path.into(),
            capacity,
            write_gate: Mutex::new(()),
        };

        if !fs::try_exists(&log.path).await? {
            info!("Creating history log at {}", log.path.display());
            log.persist(&[]).await?;
        }

        Ok(log)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maximum number of retained entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record a completed analysis at the head of the log
    ///
    /// Summaries longer than their limits are cut silently.
    pub async fn append(
        &self,
        kind: AnalysisKind,
        request_summary: &str,
        response_summary: &str,
        details: Option<Value>,
    ) -> Result<HistoryEntry, HistoryError> {
        let entry = HistoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            kind,
            request_summary: truncate_chars(request_summary, HistoryEntry::REQUEST_SUMMARY_MAX_CHARS),
            response_summary: truncate_chars(response_summary, HistoryEntry::RESPONSE_SUMMARY_MAX_CHARS),
            details,
        };

        let _guard = self.write_gate.lock().await;

        let mut entries = self.load().await?;
        entries.insert(0, entry.clone());
        entries.truncate(self.capacity);
        self.persist(&entries).await?;

        debug!("Recorded {} history entry {} ({} retained)", kind, entry.id, entries.len());
        Ok(entry)
    }

    /// All retained entries, newest first
    pub async fn list(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        self.load().await
    }

    /// Drop every entry, leaving a valid empty log on disk
    pub async fn clear(&self) -> Result<(), HistoryError> {
        let _guard = self.write_gate.lock().await;
        self.persist(&[]).await?;
        info!("History cleared");
        Ok(())
    }

    /// Read the file; missing or unreadable content counts as an empty log
    async fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let raw: Vec<Value> = match serde_json::from_str(&data) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("History file {} is corrupt, treating as empty: {}", self.path.display(), e);
                return Ok(Vec::new());
            }
        };

        Ok(raw
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<HistoryEntry>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable history entry: {}", e);
                    None
                }
            })
            .collect())
    }

    /// Write `entries` to a sibling temp file, then rename it into place
    async fn persist(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec_pretty(entries)?;
        let temp_path = self.path.with_extension("tmp");

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let log = HistoryLog::open(&path, 10).await.unwrap();

        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
        assert!(log.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summaries_are_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::open(dir.path().join("history.json"), 10).await.unwrap();

        let entry = log
            .append(AnalysisKind::Text, &"q".repeat(250), &"ж".repeat(600), None)
            .await
            .unwrap();

        assert_eq!(entry.request_summary.chars().count(), 200);
        assert_eq!(entry.response_summary.chars().count(), 500);
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_empty_and_heals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ not a list").unwrap();

        let log = HistoryLog::open(&path, 10).await.unwrap();
        assert!(log.list().await.unwrap().is_empty());

        log.append(AnalysisKind::Image, "Image: a.png", "banner", None).await.unwrap();
        assert_eq!(log.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_capacity_keeps_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::open(dir.path().join("history.json"), 0).await.unwrap();
        assert_eq!(log.capacity(), 0);

        let entry = log.append(AnalysisKind::Text, "request", "ok", None).await.unwrap();
        assert_eq!(entry.request_summary, "request");
        assert!(log.list().await.unwrap().is_empty());
    }
}
