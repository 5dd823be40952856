//! Local id generation.
//!
//! Records created through the store get a millisecond timestamp as their id.
//! The remote origin hands out small integers, so the two spaces only collide
//! if a clock is badly wrong.

use crate::{Timestamp, UserId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of the current time in milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> Timestamp;
}

/// Wall clock. On wasm32 the time comes from `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_millis(&self) -> Timestamp {
        js_sys::Date::now() as Timestamp
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_millis(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as Timestamp)
            .unwrap_or_default()
    }
}

/// A clock stuck at one instant. Handy in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now_millis(&self) -> Timestamp {
        self.0
    }
}

/// Hands out strictly increasing ids derived from a [`Clock`].
///
/// If the clock has not moved past the last id, the next id is `last + 1`, so
/// two creations within the same millisecond still get distinct ids.
pub struct LocalIds {
    clock: Arc<dyn Clock>,
    last: AtomicU64,
}

impl LocalIds {
    /// Create a generator over the given clock.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }

    /// Allocate the next id.
    pub fn next(&self) -> UserId {
        let now = self.clock.now_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

impl Default for LocalIds {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for LocalIds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalIds")
            .field("last", &self.last.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
