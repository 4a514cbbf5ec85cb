//! Per-user admission control.
//!
//! One timestamp per identity: a request is admitted when at least
//! `60s / limit` has passed since that identity's last admitted request.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;

/// Minimum spacing between two admitted requests at `limit` requests/minute.
pub fn min_spacing(limit: NonZeroU32) -> Duration {
    Duration::microseconds(60_000_000 / i64::from(limit.get()))
}

/// Process-wide requests/minute, changed by admins at runtime.
pub struct GlobalRateLimit {
    per_minute: AtomicU32,
}

impl GlobalRateLimit {
    pub fn new(per_minute: NonZeroU32) -> Self {
        Self {
            per_minute: AtomicU32::new(per_minute.get()),
        }
    }

    pub fn get(&self) -> NonZeroU32 {
        // Only non-zero values are ever stored
        NonZeroU32::new(self.per_minute.load(Ordering::Acquire)).unwrap_or(NonZeroU32::MIN)
    }

    pub fn set(&self, per_minute: NonZeroU32) {
        self.per_minute.store(per_minute.get(), Ordering::Release);
    }
}

/// Last admitted request per identity.
///
/// Entries are never evicted.
#[derive(Default)]
pub struct RateLimiter {
    last_admitted: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-record under a single lock acquisition.
    pub fn admit_at(&self, identity: &str, limit: NonZeroU32, now: DateTime<Utc>) -> bool {
        let spacing = min_spacing(limit);
        let mut state = self.last_admitted.lock();

        if let Some(last) = state.get(identity) {
            let elapsed = now.signed_duration_since(*last);
            if elapsed < spacing {
                debug!(
                    identity,
                    elapsed_ms = elapsed.num_milliseconds(),
                    spacing_ms = spacing.num_milliseconds(),
                    "Admission refused"
                );
                return false;
            }
        }

        state.insert(identity.to_string(), now);
        true
    }
}
