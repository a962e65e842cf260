// Clock Port - join and service-start timestamps

/// Source of wall-clock time for queue timestamps
///
/// `QueueEntry::joined_at` and `started_at` come from here, so tests can
/// pin or step the clock.
pub trait TimeProvider: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

/// Wall clock (UTC)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    /// Settable clock that advances 1s on every read, so consecutive joins
    /// get distinct timestamps
    pub struct MockTimeProvider {
        now: AtomicI64,
    }

    impl MockTimeProvider {
        pub fn new(start: i64) -> Self {
            Self {
                now: AtomicI64::new(start),
            }
        }

        /// Jump to `now`; may move backwards to simulate clock skew
        pub fn set(&self, now: i64) {
            self.now.store(now, Ordering::SeqCst);
        }
    }

    impl TimeProvider for MockTimeProvider {
        fn now_millis(&self) -> i64 {
            self.now.fetch_add(1_000, Ordering::SeqCst)
        }
    }
}
