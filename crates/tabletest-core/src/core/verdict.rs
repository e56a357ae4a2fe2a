// crates/tabletest-core/src/core/verdict.rs
// ============================================================================
// Module: Tabletest Verdicts
// Description: Invocation results, aggregate counts, and suite reports.
// Purpose: Derive verdicts from step events and keep counts conserved.
// Dependencies: crate::core::{source, step}, serde, thiserror
// ============================================================================

//! ## Overview
//! A verdict is a pure function of recorded step events: FAIL if any event
//! failed, ABORTED if the invocation was interrupted without failing, PASS
//! otherwise. The suite report aggregates results and enforces count
//! conservation: aggregate counts always equal the sum over all results,
//! with no event dropped or double-counted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::source::MethodId;
use crate::core::step::StepEvent;
use crate::core::step::StepOutcome;

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Aggregate outcome derived from a set of step events.
///
/// # Invariants
/// - Variants are stable for serialization and report matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Every weighted event passed.
    Pass,
    /// At least one event failed.
    Fail,
    /// The invocation was interrupted and recorded no failure.
    Aborted,
}

impl Verdict {
    /// Derives the verdict for a sequence of step events.
    ///
    /// FAIL wins over ABORTED; INFO events carry no verdict weight.
    #[must_use]
    pub fn derive(events: &[StepEvent]) -> Self {
        let mut verdict = Self::Pass;
        for event in events {
            match event.outcome {
                StepOutcome::Fail => return Self::Fail,
                StepOutcome::Aborted => verdict = Self::Aborted,
                StepOutcome::Pass | StepOutcome::Info => {}
            }
        }
        verdict
    }

    /// Returns a stable label for the verdict.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Invocation Results
// ============================================================================

/// Result of one (method, row) invocation.
///
/// # Invariants
/// - `verdict` equals `Verdict::derive(&events)` at all times.
/// - `(method, row_index)` is unique within a suite report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    /// Identifier of the registered test method.
    pub method: MethodId,
    /// Display name carried from the source descriptor.
    pub display_name: String,
    /// Zero-based data row index driving this invocation.
    pub row_index: usize,
    /// Ordered step events recorded during the invocation.
    pub events: Vec<StepEvent>,
    /// Verdict derived from the events.
    pub verdict: Verdict,
}

impl InvocationResult {
    /// Builds a result, deriving the verdict from the events.
    #[must_use]
    pub fn from_events(
        method: MethodId,
        display_name: impl Into<String>,
        row_index: usize,
        events: Vec<StepEvent>,
    ) -> Self {
        let verdict = Verdict::derive(&events);
        Self {
            method,
            display_name: display_name.into(),
            row_index,
            events,
            verdict,
        }
    }

    /// Returns the failing step messages for report breakdowns.
    #[must_use]
    pub fn failing_messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|event| event.outcome == StepOutcome::Fail)
            .map(|event| event.message.as_str())
            .collect()
    }
}

// ============================================================================
// SECTION: Aggregate Counts
// ============================================================================

/// Per-outcome event counts aggregated over results.
///
/// # Invariants
/// - Equals the sum over all aggregated results at every point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCounts {
    /// Number of PASS events.
    pub pass: u64,
    /// Number of FAIL events.
    pub fail: u64,
    /// Number of INFO events.
    pub info: u64,
    /// Number of ABORTED events.
    pub aborted: u64,
}

impl StepCounts {
    /// Tallies the events of one result.
    #[must_use]
    pub fn tally(events: &[StepEvent]) -> Self {
        let mut counts = Self::default();
        for event in events {
            match event.outcome {
                StepOutcome::Pass => counts.pass += 1,
                StepOutcome::Fail => counts.fail += 1,
                StepOutcome::Info => counts.info += 1,
                StepOutcome::Aborted => counts.aborted += 1,
            }
        }
        counts
    }

    /// Adds another tally into this one.
    pub fn merge(&mut self, other: Self) {
        self.pass += other.pass;
        self.fail += other.fail;
        self.info += other.info;
        self.aborted += other.aborted;
    }

    /// Returns the total number of counted events.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.pass + self.fail + self.info + self.aborted
    }
}

// ============================================================================
// SECTION: Invariant Errors
// ============================================================================

/// Fatal aggregation invariant violations.
///
/// These compromise report correctness and abort the suite rather than
/// surfacing as row-scoped failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantError {
    /// Two results claim the same (method, row index) pairing.
    #[error("duplicate result for method {method} row {row_index}")]
    DuplicateResult {
        /// Method identifier of the colliding results.
        method: MethodId,
        /// Row index of the colliding results.
        row_index: usize,
    },
    /// Aggregate counts diverge from the sum over results.
    #[error("aggregate counts diverged: counted {counted} events, results hold {actual}")]
    CountMismatch {
        /// Events accounted for in the aggregate counts.
        counted: u64,
        /// Events actually present across results.
        actual: u64,
    },
}

// ============================================================================
// SECTION: Suite Report
// ============================================================================

/// Aggregated results and counts for one suite run.
///
/// # Invariants
/// - `counts` equals the sum of per-result tallies.
/// - Results are ordered deterministically by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Invocation results in deterministic order.
    pub results: Vec<InvocationResult>,
    /// Aggregate per-outcome event counts.
    pub counts: StepCounts,
}

impl SuiteReport {
    /// Builds a report from results, rejecting duplicate pairings.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::DuplicateResult`] when two results claim
    /// the same (method, row index) pairing.
    pub fn from_results(results: Vec<InvocationResult>) -> Result<Self, InvariantError> {
        let mut counts = StepCounts::default();
        for (position, result) in results.iter().enumerate() {
            let duplicate = results[..position]
                .iter()
                .any(|prior| prior.method == result.method && prior.row_index == result.row_index);
            if duplicate {
                return Err(InvariantError::DuplicateResult {
                    method: result.method.clone(),
                    row_index: result.row_index,
                });
            }
            counts.merge(StepCounts::tally(&result.events));
        }
        Ok(Self {
            results,
            counts,
        })
    }

    /// Returns the suite verdict: PASS only if every result passed.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        let mut verdict = Verdict::Pass;
        for result in &self.results {
            match result.verdict {
                Verdict::Fail => return Verdict::Fail,
                Verdict::Aborted => verdict = Verdict::Aborted,
                Verdict::Pass => {}
            }
        }
        verdict
    }

    /// Checks count conservation against the stored results.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantError::CountMismatch`] when the aggregate counts
    /// diverge from the events actually held by the results.
    pub fn verify_counts(&self) -> Result<(), InvariantError> {
        let actual: u64 = self
            .results
            .iter()
            .map(|result| result.events.len() as u64)
            .sum();
        let counted = self.counts.total();
        if counted == actual {
            Ok(())
        } else {
            Err(InvariantError::CountMismatch {
                counted,
                actual,
            })
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::InvariantError;
    use super::InvocationResult;
    use super::StepCounts;
    use super::SuiteReport;
    use super::Verdict;
    use crate::core::source::MethodId;
    use crate::core::step::StepCollector;
    use crate::core::step::StepEvent;

    /// Records a mixed pass/fail/info sequence and returns the events.
    fn mixed_events() -> Vec<StepEvent> {
        let collector = StepCollector::logical();
        collector.pass("a", "ok");
        collector.fail("b", "bad", "detail");
        collector.info("c", "note");
        collector.take_events()
    }

    #[test]
    fn verdict_is_and_of_passes() {
        let collector = StepCollector::logical();
        collector.pass("a", "ok");
        collector.info("b", "note");
        assert_eq!(Verdict::derive(&collector.events()), Verdict::Pass);
        collector.fail("c", "bad", "");
        assert_eq!(Verdict::derive(&collector.events()), Verdict::Fail);
    }

    #[test]
    fn fail_wins_over_aborted() {
        let collector = StepCollector::logical();
        collector.aborted("a", "deadline elapsed");
        assert_eq!(Verdict::derive(&collector.events()), Verdict::Aborted);
        collector.fail("b", "bad", "");
        assert_eq!(Verdict::derive(&collector.events()), Verdict::Fail);
    }

    #[test]
    fn counts_are_conserved_across_results() -> Result<(), InvariantError> {
        let first = InvocationResult::from_events(MethodId::new("m1"), "m1", 0, mixed_events());
        let second = InvocationResult::from_events(MethodId::new("m1"), "m1", 1, mixed_events());
        let report = SuiteReport::from_results(vec![first, second])?;
        assert_eq!(
            report.counts,
            StepCounts {
                pass: 2,
                fail: 2,
                info: 2,
                aborted: 0,
            }
        );
        assert_eq!(report.counts.total(), 6);
        report.verify_counts()?;
        assert_eq!(report.verdict(), Verdict::Fail);
        Ok(())
    }

    #[test]
    fn duplicate_pairing_is_fatal() {
        let first = InvocationResult::from_events(MethodId::new("m1"), "m1", 0, Vec::new());
        let second = InvocationResult::from_events(MethodId::new("m1"), "m1", 0, Vec::new());
        let report = SuiteReport::from_results(vec![first, second]);
        assert_eq!(
            report,
            Err(InvariantError::DuplicateResult {
                method: MethodId::new("m1"),
                row_index: 0,
            })
        );
    }

    #[test]
    fn failing_messages_surface_fail_events_only() {
        let result = InvocationResult::from_events(MethodId::new("m1"), "m1", 0, mixed_events());
        assert_eq!(result.failing_messages(), vec!["bad: detail"]);
    }
}
