// crates/tabletest-runner/src/report.rs
// ============================================================================
// Module: Suite Report Rendering
// Description: Persistable report entries and human-readable summaries.
// Purpose: Turn aggregated results into stable external representations.
// Dependencies: serde, serde_json, tabletest-core, thiserror
// ============================================================================

//! ## Overview
//! Report rendering is read-only over an aggregated [`SuiteReport`]: the
//! persisted entries and the summary text are derived views and never feed
//! back into verdicts or counts. The JSON shape is stable so external
//! tooling can consume persisted runs across versions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use tabletest_core::InvocationResult;
use tabletest_core::StepOutcome;
use tabletest_core::SuiteReport;
use tabletest_core::Verdict;

// ============================================================================
// SECTION: Report Errors
// ============================================================================

/// Errors raised while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report could not be serialized to JSON.
    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// SECTION: Persisted Entries
// ============================================================================

/// One persisted step event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEvent {
    /// Short label identifying the step.
    pub label: String,
    /// Step outcome.
    pub outcome: StepOutcome,
    /// Human-readable message.
    pub message: String,
}

/// One persisted invocation result.
///
/// # Invariants
/// - The entry order matches the report's deterministic result order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Identifier of the registered test method.
    pub method: String,
    /// Display name carried from the source descriptor.
    pub display_name: String,
    /// Zero-based data row index driving the invocation.
    pub row_index: usize,
    /// Verdict derived from the events.
    pub verdict: Verdict,
    /// Recorded step events in append order.
    pub events: Vec<ReportEvent>,
}

/// Converts one result into its persisted entry.
fn persisted_entry(result: &InvocationResult) -> ReportEntry {
    ReportEntry {
        method: result.method.as_str().to_string(),
        display_name: result.display_name.clone(),
        row_index: result.row_index,
        verdict: result.verdict,
        events: result
            .events
            .iter()
            .map(|event| ReportEvent {
                label: event.label.clone(),
                outcome: event.outcome,
                message: event.message.clone(),
            })
            .collect(),
    }
}

/// Returns the persisted entries for a report, in report order.
#[must_use]
pub fn persisted_entries(report: &SuiteReport) -> Vec<ReportEntry> {
    report.results.iter().map(persisted_entry).collect()
}

/// Serializes a report's persisted entries to pretty JSON.
///
/// The persisted shape is a flat list of entries in report order; verdicts
/// and counts are derivable from it, so the file stays a stable, minimal
/// record of the run.
///
/// # Errors
///
/// Returns [`ReportError::Serialize`] when serialization fails.
pub fn to_json(report: &SuiteReport) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&persisted_entries(report))?)
}

// ============================================================================
// SECTION: Summary Rendering
// ============================================================================

/// Renders a human-readable summary table with aggregate totals.
#[must_use]
pub fn render_summary(report: &SuiteReport) -> String {
    let mut out = String::new();
    for result in &report.results {
        out.push_str(&format!(
            "{} [{}] row {} ... {}\n",
            result.display_name,
            result.method,
            result.row_index,
            result.verdict
        ));
        for message in result.failing_messages() {
            out.push_str(&format!("    {message}\n"));
        }
    }
    out.push_str(&format!(
        "steps: {} pass, {} fail, {} info, {} aborted\n",
        report.counts.pass, report.counts.fail, report.counts.info, report.counts.aborted
    ));
    out.push_str(&format!(
        "suite verdict: {} ({} results)\n",
        report.verdict(),
        report.results.len()
    ));
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================
