// Store module - Level/date partitioned log storage with per-file locking

mod clock;
mod codec;
mod counter;
mod entry;
mod level;
mod locks;
mod reader;
mod writer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{decode_line, encode_line, escape, format_timestamp, parse_timestamp, unescape};
pub use counter::TypeCounter;
pub use entry::{is_valid_severity, LogEntry, LogQuery, MAX_SEVERITY, MIN_SEVERITY};
pub use level::{directory_for, level_name, Level, MAX_LOG_LEVEL, MIN_LOG_LEVEL};
pub use locks::{FileLockPool, FileReadGuard, FileWriteGuard};
pub use reader::{list_level_files, read_entries, scan_file};
pub use writer::{ensure_level_dir, entry_file_path, write_entry};

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// LogStore writes entries to and queries entries from a storage root
///
/// Cloning a store is cheap; clones share the lock pool, the counter and
/// the clock, so every clone mediates access to the same files.
#[derive(Clone)]
pub struct LogStore {
    root: PathBuf,
    locks: Arc<FileLockPool>,
    counter: Arc<TypeCounter>,
    clock: Arc<dyn Clock>,
}

impl LogStore {
    /// Open a store at `root` with fresh components and the system clock
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_components(
            root,
            Arc::new(FileLockPool::new()),
            Arc::new(TypeCounter::new()),
            Arc::new(SystemClock),
        )
    }

    /// Open a store with explicitly provided components
    pub fn with_components<P: AsRef<Path>>(
        root: P,
        locks: Arc<FileLockPool>,
        counter: Arc<TypeCounter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let root = root.as_ref().to_path_buf();
        tracing::info!(root = %root.display(), "Opened log store");

        Self {
            root,
            locks,
            counter,
            clock,
        }
    }

    /// Store an entry, stamping `created_at` from the store's clock
    ///
    /// # Returns
    /// * `Ok(LogEntry)` - The entry as written
    /// * `Err(LogkeepError::InvalidLevel)` - The entry's level is `All`
    /// * `Err(LogkeepError::StorageIo)` - Directory, open, write or flush failed
    pub async fn write(&self, entry: &LogEntry) -> Result<LogEntry> {
        let created_at = self.clock.now();
        write_entry(&self.root, &self.locks, &self.counter, entry, created_at).await
    }

    /// Return every stored entry matching the query
    pub async fn read(&self, query: &LogQuery) -> Result<Vec<LogEntry>> {
        read_entries(&self.root, &self.locks, query).await
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn counter(&self) -> &TypeCounter {
        &self.counter
    }

    pub fn locks(&self) -> &FileLockPool {
        &self.locks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LogkeepError;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn fixed_store(root: &Path) -> (LogStore, FixedClock) {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let store = LogStore::with_components(
            root,
            Arc::new(FileLockPool::new()),
            Arc::new(TypeCounter::new()),
            Arc::new(clock.clone()),
        );
        (store, clock)
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let (store, _clock) = fixed_store(temp_dir.path());

        let stored = store
            .write(&LogEntry::new(Level::Info, 3, "boot", "svc-a"))
            .await
            .unwrap();

        let query = LogQuery::at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
            .level(Level::Info);
        let found = store.read(&query).await.unwrap();

        assert_eq!(found, vec![stored]);
    }

    #[tokio::test]
    async fn test_invalid_level_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = LogStore::new(temp_dir.path());

        let result = store.write(&LogEntry::new(Level::All, 3, "x", "y")).await;
        assert!(matches!(result, Err(LogkeepError::InvalidLevel(0))));
        assert_eq!(store.counter().snapshot().values().sum::<u64>(), 0);
    }

    #[tokio::test]
    async fn test_clones_share_components() {
        let temp_dir = TempDir::new().unwrap();
        let (store, _clock) = fixed_store(temp_dir.path());
        let clone = store.clone();

        clone
            .write(&LogEntry::new(Level::Debug, 1, "a", "b"))
            .await
            .unwrap();

        assert_eq!(store.counter().get("DEBUG"), 1);
        assert_eq!(store.locks().len(), 1);
    }

    #[tokio::test]
    async fn test_timestamp_distinguishes_entries() {
        let temp_dir = TempDir::new().unwrap();
        let (store, clock) = fixed_store(temp_dir.path());

        store
            .write(&LogEntry::new(Level::Warn, 2, "first", "svc"))
            .await
            .unwrap();
        clock.advance(chrono::Duration::seconds(1));
        store
            .write(&LogEntry::new(Level::Warn, 2, "second", "svc"))
            .await
            .unwrap();

        let query = LogQuery::at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 6).unwrap());
        let found = store.read(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "second");
    }
}
