// Clock abstraction used to stamp entries at write time

use chrono::{DateTime, SubsecRound, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Source of `created_at` timestamps for written entries
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to whole seconds to match the on-disk precision
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }
}

/// Clock that returns a settable instant
#[derive(Debug, Clone)]
pub struct FixedClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(at.trunc_subsecs(0))),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.current.lock() = at.trunc_subsecs(0);
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut current = self.current.lock();
        *current += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}
