use parking_lot::RwLock as MapLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// Shared guard over a log file. Dropping it releases the read lock.
pub type FileReadGuard = OwnedRwLockReadGuard<()>;

/// Exclusive guard over a log file. Dropping it releases the write lock.
pub type FileWriteGuard = OwnedRwLockWriteGuard<()>;

/// FileLockPool hands out one read/write lock per log file path
///
/// Locks are created on first reference and live for as long as the pool.
/// The map itself sits behind a narrower synchronous lock that is only held
/// for the lookup or insert, never while a file lock is awaited.
#[derive(Debug, Default)]
pub struct FileLockPool {
    locks: MapLock<HashMap<PathBuf, Arc<RwLock<()>>>>,
}

impl FileLockPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the shared lock for `path`, waiting for any writer to finish
    pub async fn acquire_read(&self, path: &Path) -> FileReadGuard {
        self.lock_for(path).read_owned().await
    }

    /// Acquire the exclusive lock for `path`, waiting for readers and writers
    pub async fn acquire_write(&self, path: &Path) -> FileWriteGuard {
        self.lock_for(path).write_owned().await
    }

    /// Release a shared lock.
    pub fn release_read(&self, guard: FileReadGuard) {
        drop(guard);
    }

    /// Release an exclusive lock.
    pub fn release_write(&self, guard: FileWriteGuard) {
        drop(guard);
    }

    /// Number of distinct paths that have a lock
    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.read().is_empty()
    }

    /// Get or create the lock for a path
    fn lock_for(&self, path: &Path) -> Arc<RwLock<()>> {
        if let Some(lock) = self.locks.read().get(path) {
            return Arc::clone(lock);
        }

        // Re-check under the write lock: another caller may have inserted
        // between the two acquisitions.
        let mut locks = self.locks.write();
        Arc::clone(locks.entry(path.to_path_buf()).or_default())
    }
}
