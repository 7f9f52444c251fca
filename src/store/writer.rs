use crate::error::{LogkeepError, Result};
use crate::store::codec::{self, FILE_DATE_FORMAT};
use crate::store::counter::TypeCounter;
use crate::store::entry::LogEntry;
use crate::store::level::Level;
use crate::store::locks::FileLockPool;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs::{DirBuilder, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Permission bits for level directories (owner rwx only)
#[cfg(unix)]
const LEVEL_DIR_MODE: u32 = 0o700;

/// Path of the file an entry is appended to:
/// `<root>/<LEVEL>/<YYYY-MM-DD>-<severity>.txt`
pub fn entry_file_path(
    root: &Path,
    level: Level,
    created_at: &DateTime<Utc>,
    severity: u8,
) -> PathBuf {
    root.join(level.directory()).join(format!(
        "{}-{}.txt",
        created_at.format(FILE_DATE_FORMAT),
        severity
    ))
}

/// Create the directory for a level if it does not exist yet
pub async fn ensure_level_dir(root: &Path, level: Level) -> Result<PathBuf> {
    let dir = root.join(level.directory());

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(LEVEL_DIR_MODE);

    builder.create(&dir).await.map_err(|e| {
        LogkeepError::StorageIo(format!(
            "Failed to create level directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    Ok(dir)
}

/// Append one entry to its file under the file's write lock
///
/// Returns the entry as stored, with `created_at` set. The per-level
/// counter is only bumped once the line has been flushed.
pub async fn write_entry(
    root: &Path,
    locks: &FileLockPool,
    counter: &TypeCounter,
    entry: &LogEntry,
    created_at: DateTime<Utc>,
) -> Result<LogEntry> {
    if !entry.level.is_stored() {
        return Err(LogkeepError::InvalidLevel(entry.level.code()));
    }

    ensure_level_dir(root, entry.level).await?;

    let path = entry_file_path(root, entry.level, &created_at, entry.severity);
    let line = codec::encode_line(entry, &created_at);

    let guard = locks.acquire_write(&path).await;
    let result = append_line(&path, line.as_bytes()).await;
    locks.release_write(guard);
    result?;

    tracing::debug!(
        path = %path.display(),
        bytes = line.len(),
        "Appended log entry"
    );

    counter.increment(entry.level);

    Ok(LogEntry {
        created_at: Some(created_at),
        ..entry.clone()
    })
}

/// Open `path` for append and write `data` through a buffered writer
async fn append_line(path: &Path, data: &[u8]) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| {
            LogkeepError::StorageIo(format!("Failed to open {}: {}", path.display(), e))
        })?;

    let mut writer = BufWriter::new(file);
    writer.write_all(data).await.map_err(|e| {
        LogkeepError::StorageIo(format!("Failed to write to {}: {}", path.display(), e))
    })?;

    // Flush before the lock is released so readers never see a partial line
    writer.flush().await.map_err(|e| {
        LogkeepError::StorageIo(format!("Failed to flush {}: {}", path.display(), e))
    })?;

    Ok(())
}
