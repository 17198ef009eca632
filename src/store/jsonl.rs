//! JSON-lines file backend. One [`LowStockRecord`] per line.

use super::backend::StorageBackend;
use super::error::StorageError;
use crate::model::{LowStockDraft, LowStockRecord, RowId};
use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, error, info, warn};

/// Stores rows in an append-only JSON-lines file.
///
/// Only newline-terminated lines count as rows. A failed append is truncated
/// back to the previous length, and an unterminated last line left by a
/// crash is cut off before the next write.
#[derive(Debug)]
pub struct JsonlBackend {
    path: PathBuf,
    next_id: u64,
}

impl JsonlBackend {
    /// Opens `path`, creating it (and its parent directories) if needed.
    ///
    /// Row ids continue after the largest id already in the file.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = open_file(&path).await?;
        drop_torn_tail(&mut file, &path).await?;
        let existing = read_records(&path).await?;

        let next_id = existing.iter().map(|r| r.row_id.0).max().unwrap_or(0) + 1;
        info!(path = %path.display(), rows = existing.len(), next_id, "Opened low-stock file");

        Ok(Self { path, next_id })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn open_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().read(true).append(true).create(true).open(path).await
}

/// Length of the prefix made of complete lines.
fn complete_len(bytes: &[u8]) -> usize {
    bytes.iter().rposition(|b| *b == b'\n').map_or(0, |i| i + 1)
}

/// Cuts an unterminated last line. Returns the resulting file length.
async fn drop_torn_tail(file: &mut File, path: &Path) -> Result<u64, StorageError> {
    let len = file.metadata().await?.len();
    if len == 0 {
        return Ok(0);
    }

    file.seek(SeekFrom::Start(len - 1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    if last[0] == b'\n' {
        return Ok(len);
    }

    let bytes = fs::read(path).await?;
    let keep = complete_len(&bytes) as u64;
    warn!(path = %path.display(), dropped = len - keep, "Dropping incomplete last line");
    file.set_len(keep).await?;
    file.sync_data().await?;
    Ok(keep)
}

async fn write_batch(file: &mut File, batch: &[u8]) -> std::io::Result<()> {
    file.write_all(batch).await?;
    file.flush().await?;
    file.sync_data().await
}

async fn roll_back(file: &File, len: u64) -> std::io::Result<()> {
    file.set_len(len).await?;
    file.sync_data().await
}

async fn read_records(path: &Path) -> Result<Vec<LowStockRecord>, StorageError> {
    let bytes = fs::read(path).await?;
    let end = complete_len(&bytes);
    if end < bytes.len() {
        warn!(path = %path.display(), bytes = bytes.len() - end, "Ignoring incomplete last line");
    }

    String::from_utf8_lossy(&bytes[..end])
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| StorageError::Decode {
                line: index + 1,
                reason: e.to_string(),
            })
        })
        .collect()
}

#[async_trait]
impl StorageBackend for JsonlBackend {
    async fn append(&mut self, drafts: Vec<LowStockDraft>) -> Result<Vec<LowStockRecord>, StorageError> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<_> = drafts
            .into_iter()
            .enumerate()
            .map(|(offset, draft)| draft.into_record(RowId(self.next_id + offset as u64)))
            .collect();

        // Encode the whole batch before touching the file.
        let mut buffer = String::new();
        for record in &records {
            let line = serde_json::to_string(record).map_err(|e| StorageError::Encode(e.to_string()))?;
            buffer.push_str(&line);
            buffer.push('\n');
        }

        let mut file = open_file(&self.path).await?;
        let start = drop_torn_tail(&mut file, &self.path).await?;

        if let Err(e) = write_batch(&mut file, buffer.as_bytes()).await {
            warn!(path = %self.path.display(), error = %e, "Append failed, rolling back");
            if let Err(rollback) = roll_back(&file, start).await {
                // Rows may be on disk; never hand their ids out again.
                error!(path = %self.path.display(), error = %rollback, "Rollback failed");
                self.next_id += records.len() as u64;
            }
            return Err(e.into());
        }

        self.next_id += records.len() as u64;
        debug!(path = %self.path.display(), rows = records.len(), "Appended");
        Ok(records)
    }

    async fn flush(&mut self) -> Result<(), StorageError> {
        let file = File::create(&self.path).await?;
        file.sync_all().await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<LowStockRecord>, StorageError> {
        read_records(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CustomerId;

    fn draft(customer: u64, sku: &str, qty: f64) -> LowStockDraft {
        LowStockDraft {
            customer_id: CustomerId(customer),
            sku: sku.to_string(),
            source_name: "default".to_string(),
            source_qty: qty,
        }
    }

    #[tokio::test]
    async fn test_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("low_stock.jsonl");

        let mut backend = JsonlBackend::open(&path).await.unwrap();
        backend
            .append(vec![draft(1, "ABC", 3.0), draft(2, "XYZ", 0.0)])
            .await
            .unwrap();
        drop(backend);

        let mut reopened = JsonlBackend::open(&path).await.unwrap();
        let rows = reopened.list_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sku, "ABC");
        assert_eq!(rows[1].customer_id, CustomerId(2));

        let next = reopened.append(vec![draft(1, "ABC", 3.0)]).await.unwrap();
        assert_eq!(next[0].row_id, RowId(3));
        assert_eq!(reopened.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_flush_truncates_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonlBackend::open(dir.path().join("rows.jsonl")).await.unwrap();
        backend.append(vec![draft(1, "ABC", 1.0)]).await.unwrap();

        backend.flush().await.unwrap();
        assert!(backend.list_all().await.unwrap().is_empty());
        backend.flush().await.unwrap();
        assert!(backend.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");
        std::fs::write(&path, "not json\n").unwrap();

        let result = JsonlBackend::open(&path).await;
        assert!(matches!(result, Err(StorageError::Decode { line: 1, .. })));
    }

    #[tokio::test]
    async fn test_empty_append_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = JsonlBackend::open(dir.path().join("rows.jsonl")).await.unwrap();

        assert!(backend.append(Vec::new()).await.unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(backend.path()).unwrap(), "");
    }

    const TORN: &str = "{\"row_id\":2,\"customer_id\":1,\"sku\":\"AB";

    fn tear(path: &Path) {
        use std::io::Write;
        let mut file = std::fs::OpenOptions::new().append(true).open(path).unwrap();
        file.write_all(TORN.as_bytes()).unwrap();
    }

    #[tokio::test]
    async fn test_torn_tail_is_ignored_then_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");
        let mut backend = JsonlBackend::open(&path).await.unwrap();
        backend.append(vec![draft(1, "ABC", 1.0)]).await.unwrap();

        tear(&path);
        assert_eq!(backend.list_all().await.unwrap().len(), 1);

        let appended = backend.append(vec![draft(2, "XYZ", 0.0)]).await.unwrap();
        assert_eq!(appended[0].row_id, RowId(2));

        let rows = backend.list_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].sku, "XYZ");
        assert!(!std::fs::read_to_string(&path).unwrap().contains(TORN));
    }

    #[tokio::test]
    async fn test_open_cuts_torn_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");
        let mut backend = JsonlBackend::open(&path).await.unwrap();
        backend.append(vec![draft(1, "ABC", 1.0)]).await.unwrap();
        drop(backend);

        tear(&path);

        let mut reopened = JsonlBackend::open(&path).await.unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().ends_with('\n'));
        assert_eq!(reopened.count().await.unwrap(), 1);

        let next = reopened.append(vec![draft(1, "ABC", 1.0)]).await.unwrap();
        assert_eq!(next[0].row_id, RowId(2));
    }

    #[tokio::test]
    async fn test_roll_back_restores_previous_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");
        let mut backend = JsonlBackend::open(&path).await.unwrap();
        backend.append(vec![draft(1, "ABC", 1.0)]).await.unwrap();
        let before = std::fs::read(&path).unwrap();

        let mut file = open_file(&path).await.unwrap();
        file.write_all(b"{\"row_id\":2}\n").await.unwrap();
        file.write_all(TORN.as_bytes()).await.unwrap();
        file.flush().await.unwrap();

        roll_back(&file, before.len() as u64).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(backend.count().await.unwrap(), 1);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_failed_write_is_reported() {
        let mut backend = JsonlBackend {
            path: PathBuf::from("/dev/full"),
            next_id: 1,
        };

        let result = backend.append(vec![draft(1, "ABC", 1.0)]).await;

        assert!(matches!(result, Err(StorageError::Io(_))));
    }
}
