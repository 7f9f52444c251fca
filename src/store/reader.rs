use crate::error::{LogkeepError, Result};
use crate::store::codec;
use crate::store::entry::{LogEntry, LogQuery};
use crate::store::level::Level;
use crate::store::locks::FileLockPool;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Run a query against every file in the query's level scope
///
/// A query without `created_at` returns nothing and touches no files.
/// Files that cannot be opened and lines that cannot be decoded are skipped;
/// only a failure to list a level directory fails the whole read.
pub async fn read_entries(
    root: &Path,
    locks: &FileLockPool,
    query: &LogQuery,
) -> Result<Vec<LogEntry>> {
    if query.created_at.is_none() {
        return Ok(Vec::new());
    }

    let mut found = Vec::new();

    for level in query.level.search_scope() {
        for path in list_level_files(root, level).await? {
            let guard = locks.acquire_read(&path).await;
            let scanned = scan_file(&path, level, query).await;
            locks.release_read(guard);

            match scanned {
                Ok(entries) => found.extend(entries),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable log file");
                }
            }
        }
    }

    Ok(found)
}

/// List every file under a level directory, recursing into subdirectories
///
/// Entries are sorted by name within each directory. A level directory that
/// does not exist yet has no files.
pub async fn list_level_files(root: &Path, level: Level) -> Result<Vec<PathBuf>> {
    let level_dir = root.join(level.directory());
    let mut files = Vec::new();
    let mut pending = vec![level_dir.clone()];

    while let Some(dir) = pending.pop() {
        let mut read_dir = match tokio::fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound && dir == level_dir => {
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(LogkeepError::StorageIo(format!(
                    "Failed to list {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut subdirs = Vec::new();
        let mut dir_files = Vec::new();
        while let Some(item) = read_dir.next_entry().await.map_err(|e| {
            LogkeepError::StorageIo(format!("Failed to list {}: {}", dir.display(), e))
        })? {
            let file_type = item.file_type().await.map_err(|e| {
                LogkeepError::StorageIo(format!(
                    "Failed to stat {}: {}",
                    item.path().display(),
                    e
                ))
            })?;

            if file_type.is_dir() {
                subdirs.push(item.path());
            } else {
                dir_files.push(item.path());
            }
        }

        dir_files.sort();
        files.extend(dir_files);

        // Reverse so the stack pops subdirectories in name order
        subdirs.sort();
        pending.extend(subdirs.into_iter().rev());
    }

    Ok(files)
}

/// Decode a single file line by line, keeping the entries the query matches
///
/// Lines that are not valid UTF-8 or do not decode are skipped.
pub async fn scan_file(path: &Path, level: Level, query: &LogQuery) -> Result<Vec<LogEntry>> {
    let file = File::open(path).await.map_err(|e| {
        LogkeepError::StorageIo(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let mut segments = BufReader::new(file).split(b'\n');
    let mut matches = Vec::new();
    let mut line_number = 0usize;

    while let Some(raw) = segments.next_segment().await.map_err(|e| {
        LogkeepError::StorageIo(format!("Failed to read {}: {}", path.display(), e))
    })? {
        line_number += 1;

        let decoded = std::str::from_utf8(&raw)
            .map_err(|_| LogkeepError::MalformedLine("line is not UTF-8".to_string()))
            .and_then(|line| codec::decode_line(line, level));

        match decoded {
            Ok(entry) if query.matches(&entry) => matches.push(entry),
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(
                    path = %path.display(),
                    line = line_number,
                    error = %e,
                    "Skipping malformed line"
                );
            }
        }
    }

    Ok(matches)
}
