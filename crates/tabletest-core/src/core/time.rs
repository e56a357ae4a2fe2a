// crates/tabletest-core/src/core/time.rs
// ============================================================================
// Module: Tabletest Time Model
// Description: Canonical timestamp representations for step events.
// Purpose: Provide deterministic, replayable time values across reports.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Step events embed explicit time values so report replay stays
//! deterministic. The core never reads wall-clock time directly; hosts
//! supply a [`TimeSource`], and the default [`LogicalClock`] issues
//! monotonic logical values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp recorded on step events.
///
/// # Invariants
/// - Values are explicitly provided by time sources; the core never reads
///   wall-clock time.
/// - No validation is performed; monotonicity is a time-source responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Timestamp {
    /// Unix epoch milliseconds.
    UnixMillis(i64),
    /// Monotonic logical time value.
    Logical(u64),
}

impl Timestamp {
    /// Returns the timestamp as unix milliseconds when available.
    #[must_use]
    pub const fn as_unix_millis(&self) -> Option<i64> {
        match self {
            Self::UnixMillis(value) => Some(*value),
            Self::Logical(_) => None,
        }
    }

    /// Returns the timestamp as logical time when available.
    #[must_use]
    pub const fn as_logical(&self) -> Option<u64> {
        match self {
            Self::UnixMillis(_) => None,
            Self::Logical(value) => Some(*value),
        }
    }
}

// ============================================================================
// SECTION: Time Sources
// ============================================================================

/// Supplier of timestamps for recorded step events.
pub trait TimeSource: Send + Sync {
    /// Returns the timestamp to stamp on the next event.
    fn now(&self) -> Timestamp;
}

/// Deterministic time source issuing monotonic logical values.
///
/// # Invariants
/// - Values start at zero and increase by one per call.
#[derive(Debug, Default)]
pub struct LogicalClock {
    /// Next logical value to issue.
    next: AtomicU64,
}

impl LogicalClock {
    /// Creates a logical clock starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }
}

impl TimeSource for LogicalClock {
    fn now(&self) -> Timestamp {
        Timestamp::Logical(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Wall-clock time source issuing unix-millisecond values.
///
/// Intended for hosts persisting reports of real runs; deterministic tests
/// use [`LogicalClock`] instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        Timestamp::UnixMillis(i64::try_from(millis).unwrap_or(i64::MAX))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
