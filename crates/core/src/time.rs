use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};

/// A clock abstraction for deterministic time in services and tests.
///
/// `Manual` clocks share their instant between clones, so a test can hold one
/// handle and advance the time seen by a controller that owns another.
#[derive(Debug, Clone, Default)]
pub enum Clock {
    #[default]
    Default,
    Manual(Arc<AtomicI64>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a manually driven clock starting at the given timestamp.
    #[must_use]
    pub fn manual(at: DateTime<Utc>) -> Self {
        Self::Manual(Arc::new(AtomicI64::new(at.timestamp_millis())))
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Manual(millis) => {
                DateTime::<Utc>::from_timestamp_millis(millis.load(Ordering::Acquire))
                    .unwrap_or_default()
            }
        }
    }

    /// If this is a manual clock, advance it (and every clone) by `delta`.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&self, delta: Duration) {
        if let Clock::Manual(millis) = self {
            millis.fetch_add(delta.num_milliseconds(), Ordering::AcqRel);
        }
    }

    /// If this is a manual clock, jump it to `at`.
    pub fn set(&self, at: DateTime<Utc>) {
        if let Clock::Manual(millis) = self {
            millis.store(at.timestamp_millis(), Ordering::Release);
        }
    }

    /// Seconds left of a `duration_minutes` window opened at `started_at`.
    #[must_use]
    pub fn remaining_seconds(&self, started_at: DateTime<Utc>, duration_minutes: u32) -> u64 {
        remaining_seconds(started_at, duration_minutes, self.now())
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Clock::Default)
    }
}

/// Remaining whole seconds of a timed window, derived only from its start.
///
/// `floor(max(0, duration_minutes * 60 - (now - started_at) / 1000))`. A start
/// in the future never yields more than the full duration.
#[must_use]
pub fn remaining_seconds(
    started_at: DateTime<Utc>,
    duration_minutes: u32,
    now: DateTime<Utc>,
) -> u64 {
    let total_ms = i64::from(duration_minutes) * 60_000;
    let elapsed_ms = now
        .signed_duration_since(started_at)
        .num_milliseconds()
        .max(0);
    let left_ms = total_ms.saturating_sub(elapsed_ms).max(0);
    u64::try_from(left_ms / 1000).unwrap_or(0)
}

/// True while strictly less than `duration_minutes` have elapsed since `started_at`.
#[must_use]
pub fn within_window(started_at: DateTime<Utc>, duration_minutes: u32, now: DateTime<Utc>) -> bool {
    let total_ms = i64::from(duration_minutes) * 60_000;
    let elapsed_ms = now.signed_duration_since(started_at).num_milliseconds();
    elapsed_ms < total_ms
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a manual `Clock` starting at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::manual(fixed_now())
}
