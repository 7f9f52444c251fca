use crate::store::level::Level;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-level count of successfully written entries
///
/// One atomic per stored level, so concurrent increments never lose an
/// update and reads never block writers.
#[derive(Debug, Default)]
pub struct TypeCounter {
    counts: [AtomicU64; 5],
}

impl TypeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one written entry. `All` is not a stored level and is ignored.
    pub fn increment(&self, level: Level) {
        if let Some(slot) = Self::slot(level) {
            self.counts[slot].fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Count for a level name; unknown names report 0
    pub fn get(&self, level_name: &str) -> u64 {
        level_name
            .parse::<Level>()
            .map(|level| self.get_level(level))
            .unwrap_or(0)
    }

    pub fn get_level(&self, level: Level) -> u64 {
        Self::slot(level)
            .map(|slot| self.counts[slot].load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Current counts for every stored level
    pub fn snapshot(&self) -> BTreeMap<Level, u64> {
        Level::STORED
            .iter()
            .map(|&level| (level, self.get_level(level)))
            .collect()
    }

    fn slot(level: Level) -> Option<usize> {
        if level.is_stored() {
            Some(level.code() as usize - 1)
        } else {
            None
        }
    }
}
