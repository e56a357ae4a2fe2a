// crates/tabletest-core/src/core/step.rs
// ============================================================================
// Module: Tabletest Step Recording
// Description: Append-only step events and the non-throwing collector.
// Purpose: Record pass/fail/informational outcomes without control flow.
// Dependencies: crate::core::time, crate::runtime::compare, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`StepCollector`] records the outcomes a test body observes while it
//! runs. Every operation is non-throwing and appends exactly one event:
//! assertion failure is data, not control flow, so a body can perform many
//! assertions and continue past a failed one. Events are write-once; the
//! collector never reorders or drops them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::time::LogicalClock;
use crate::core::time::TimeSource;
use crate::core::time::Timestamp;
use crate::runtime::compare::render_value;
use crate::runtime::compare::values_equal;

// ============================================================================
// SECTION: Step Outcomes
// ============================================================================

/// Outcome of one recorded step.
///
/// # Invariants
/// - Variants are stable for serialization and report matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOutcome {
    /// Step succeeded.
    Pass,
    /// Step failed.
    Fail,
    /// Informational step with no verdict weight.
    Info,
    /// Step was interrupted by suite cancellation.
    Aborted,
}

impl StepOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Info => "info",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Step Events
// ============================================================================

/// One recorded step outcome within an invocation.
///
/// # Invariants
/// - Write-once: never mutated after recording.
/// - `actual`/`expected` are present only for value assertions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    /// Short label identifying the step.
    pub label: String,
    /// Step outcome.
    pub outcome: StepOutcome,
    /// Human-readable message.
    pub message: String,
    /// Actual value observed by an assertion.
    pub actual: Option<Value>,
    /// Expected value declared by an assertion.
    pub expected: Option<Value>,
    /// Timestamp supplied by the collector's time source.
    pub recorded_at: Timestamp,
}

// ============================================================================
// SECTION: Step Collector
// ============================================================================

/// Non-throwing recorder of step events for one invocation.
///
/// # Invariants
/// - Every operation appends exactly one event.
/// - Events are attributed to exactly one invocation; the collector is not
///   shared across invocations.
/// - Clones share the same event log, so a body may hand the collector to
///   helpers without splitting the record.
#[derive(Clone)]
pub struct StepCollector {
    /// Recorded events in append order.
    events: Arc<Mutex<Vec<StepEvent>>>,
    /// Time source stamping recorded events.
    clock: Arc<dyn TimeSource>,
}

impl StepCollector {
    /// Creates a collector stamping events from the given time source.
    #[must_use]
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            clock,
        }
    }

    /// Creates a collector with a deterministic logical clock.
    #[must_use]
    pub fn logical() -> Self {
        Self::new(Arc::new(LogicalClock::new()))
    }

    /// Records a PASS event.
    pub fn pass(&self, label: impl Into<String>, message: impl Into<String>) {
        self.append(label.into(), StepOutcome::Pass, message.into(), None, None);
    }

    /// Records a FAIL event with a failure detail appended to the message.
    pub fn fail(
        &self,
        label: impl Into<String>,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) {
        let detail = detail.into();
        let mut message = message.into();
        if !detail.is_empty() {
            message.push_str(": ");
            message.push_str(&detail);
        }
        self.append(label.into(), StepOutcome::Fail, message, None, None);
    }

    /// Records an INFO event.
    pub fn info(&self, label: impl Into<String>, message: impl Into<String>) {
        self.append(label.into(), StepOutcome::Info, message.into(), None, None);
    }

    /// Records an ABORTED event.
    pub fn aborted(&self, label: impl Into<String>, message: impl Into<String>) {
        self.append(label.into(), StepOutcome::Aborted, message.into(), None, None);
    }

    /// Compares actual and expected values and records the outcome.
    ///
    /// Equality is structural and decimal-aware. A mismatch records FAIL
    /// with both rendered values embedded in the message. The boolean
    /// outcome is returned so callers may branch, but a mismatch never
    /// raises an error.
    pub fn assert_equal<A, E>(&self, actual: &A, expected: &E, message: &str) -> bool
    where
        A: Serialize,
        E: Serialize,
    {
        let actual = match serde_json::to_value(actual) {
            Ok(value) => value,
            Err(err) => {
                self.fail("assert", message, format!("actual value not renderable: {err}"));
                return false;
            }
        };
        let expected = match serde_json::to_value(expected) {
            Ok(value) => value,
            Err(err) => {
                self.fail("assert", message, format!("expected value not renderable: {err}"));
                return false;
            }
        };

        let equal = values_equal(&actual, &expected);
        let (outcome, rendered) = if equal {
            (StepOutcome::Pass, message.to_string())
        } else {
            (
                StepOutcome::Fail,
                format!(
                    "{message}: actual {} != expected {}",
                    render_value(&actual),
                    render_value(&expected)
                ),
            )
        };
        self.append("assert".to_string(), outcome, rendered, Some(actual), Some(expected));
        equal
    }

    /// Returns a snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<StepEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drains the recorded events, leaving the collector empty.
    #[must_use]
    pub fn take_events(&self) -> Vec<StepEvent> {
        match self.events.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Appends one event stamped with the collector's time source.
    fn append(
        &self,
        label: String,
        outcome: StepOutcome,
        message: String,
        actual: Option<Value>,
        expected: Option<Value>,
    ) {
        let event = StepEvent {
            label,
            outcome,
            message,
            actual,
            expected,
            recorded_at: self.clock.now(),
        };
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl fmt::Debug for StepCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepCollector").field("events", &self.events().len()).finish()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::StepCollector;
    use super::StepOutcome;

    #[test]
    fn assert_equal_on_equal_values_records_pass() {
        let collector = StepCollector::logical();
        assert!(collector.assert_equal(&json!(25), &json!(25.0), "sum check"));
        let events = collector.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome, StepOutcome::Pass);
        assert_eq!(events[0].message, "sum check");
    }

    #[test]
    fn assert_equal_mismatch_embeds_both_values() {
        let collector = StepCollector::logical();
        assert!(!collector.assert_equal(&"qcxiao", &"QCXIAO", "name check"));
        let events = collector.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome, StepOutcome::Fail);
        assert!(events[0].message.contains("qcxiao"));
        assert!(events[0].message.contains("QCXIAO"));
    }

    #[test]
    fn mismatch_returns_false_without_stopping_recording() {
        let collector = StepCollector::logical();
        assert!(!collector.assert_equal(&1, &2, "first"));
        assert!(collector.assert_equal(&3, &3, "second"));
        collector.pass("cleanup", "ran to completion");
        let events = collector.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].outcome, StepOutcome::Fail);
        assert_eq!(events[1].outcome, StepOutcome::Pass);
        assert_eq!(events[2].outcome, StepOutcome::Pass);
    }

    #[test]
    fn fail_appends_detail_to_message() {
        let collector = StepCollector::logical();
        collector.fail("body", "collaborator call failed", "connection refused");
        let events = collector.events();
        assert_eq!(events[0].message, "collaborator call failed: connection refused");
    }

    #[test]
    fn clones_share_one_event_log() {
        let collector = StepCollector::logical();
        let clone = collector.clone();
        clone.info("setup", "prepared");
        collector.pass("body", "done");
        assert_eq!(collector.events().len(), 2);
        assert_eq!(clone.take_events().len(), 2);
        assert!(collector.events().is_empty());
    }
}
