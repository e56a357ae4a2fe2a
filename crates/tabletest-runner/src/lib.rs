// crates/tabletest-runner/src/lib.rs
// ============================================================================
// Module: Tabletest Runner Library
// Description: Invocation execution, suite scheduling, and reporting.
// Purpose: Drive registered test methods across their data rows.
// Dependencies: tabletest-core, tokio
// ============================================================================

//! ## Overview
//! The runner executes one (method, row) pairing at a time in isolation and
//! schedules all pairings of a suite over a bounded worker pool.
//! Invariants:
//! - One row's failure is invisible to all other rows and methods.
//! - Results are ordered deterministically regardless of worker interleaving.
//! - A suite deadline interrupts work as ABORTED results, never as silence.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod invocation;
pub mod report;
pub mod scheduler;
pub mod scripted;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use invocation::BodyError;
pub use invocation::BodyFuture;
pub use invocation::Expectation;
pub use invocation::InvocationContext;
pub use invocation::InvocationRunner;
pub use invocation::Registration;
pub use invocation::TestBody;
pub use report::ReportEntry;
pub use report::ReportError;
pub use report::ReportEvent;
pub use report::persisted_entries;
pub use report::render_summary;
pub use report::to_json;
pub use scheduler::Suite;
pub use scheduler::SuiteConfig;
pub use scheduler::SuiteError;
pub use scripted::ScriptedCollaborator;
