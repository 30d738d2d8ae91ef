//! Time sources for cooldown bookkeeping.
//!
//! The analyzer only ever asks for "now" in milliseconds. [`SystemClock`]
//! answers with wall-clock Unix time; [`ManualClock`] is set explicitly and
//! drives file replay and tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Millisecond time source.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds.
    fn now_ms(&self) -> i64;
}

/// Wall-clock time as Unix milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same time, so a caller can keep a handle while the
/// analyzer owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicI64>,
}

impl ManualClock {
    /// Clock starting at `start_ms`.
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Arc::new(AtomicI64::new(start_ms)),
        }
    }

    /// Jump to `ms`.
    pub fn set(&self, ms: i64) {
        self.now.store(ms, Ordering::Relaxed);
    }

    /// Move forward by `ms`.
    pub fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::Relaxed)
    }
}
