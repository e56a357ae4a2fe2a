// crates/tabletest-core/src/lib.rs
// ============================================================================
// Module: Tabletest Core Library
// Description: Data model, step recording, and comparison for tabletest.
// Purpose: Define the harness contract surfaces shared by sources and runners.
// Dependencies: bigdecimal, serde, serde_json, thiserror, time
// ============================================================================

//! ## Overview
//! Tabletest Core defines the data-driven harness model: source descriptors
//! and data rows, per-invocation parameter stores, append-only step events,
//! verdict derivation, and the backend-agnostic [`RowSource`] and
//! [`Collaborator`] interfaces.
//! Invariants:
//! - A parameter store is built from exactly one row and is read-only.
//! - Step events are write-once and never dropped.
//! - Verdicts are pure functions of the recorded step events.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::params::ParameterError;
pub use core::params::ParameterStore;
pub use core::source::DataRow;
pub use core::source::MethodId;
pub use core::source::RowError;
pub use core::source::SourceDescriptor;
pub use core::source::SourceKind;
pub use core::step::StepCollector;
pub use core::step::StepEvent;
pub use core::step::StepOutcome;
pub use core::time::LogicalClock;
pub use core::time::SystemClock;
pub use core::time::TimeSource;
pub use core::time::Timestamp;
pub use core::verdict::InvariantError;
pub use core::verdict::InvocationResult;
pub use core::verdict::StepCounts;
pub use core::verdict::SuiteReport;
pub use core::verdict::Verdict;
pub use interfaces::CallDescriptor;
pub use interfaces::Collaborator;
pub use interfaces::CollaboratorError;
pub use interfaces::ProgressSink;
pub use interfaces::RowSource;
pub use interfaces::SourceError;
