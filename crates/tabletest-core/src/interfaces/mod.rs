// crates/tabletest-core/src/interfaces/mod.rs
// ============================================================================
// Module: Tabletest Interfaces
// Description: Backend-agnostic interfaces for row sources and collaborators.
// Purpose: Define the contract surfaces used by the tabletest runner.
// Dependencies: crate::core, async-trait, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the harness integrates with parameter sources and
//! the external system under test without embedding backend-specific
//! details. Source resolution fails closed: any descriptor error yields
//! zero rows and aborts the suite, because without rows no invocation
//! context can be constructed at all.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::source::DataRow;
use crate::core::source::MethodId;
use crate::core::source::RowError;
use crate::core::source::SourceDescriptor;
use crate::core::source::SourceKind;
use crate::core::verdict::InvocationResult;

// ============================================================================
// SECTION: Row Source
// ============================================================================

/// Row source errors; every variant is fatal and suite-aborting.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - A failed resolution produces zero rows, never a partial sequence.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Source file or identifier could not be read.
    #[error("source {location} unreadable: {detail}")]
    Unreadable {
        /// Source location from the descriptor.
        location: String,
        /// Read failure description.
        detail: String,
    },
    /// Requested section does not exist in the source.
    #[error("source {location} has no section {section:?}")]
    MissingSection {
        /// Source location from the descriptor.
        location: String,
        /// Section name that was requested.
        section: String,
    },
    /// Section exists but declares no header row.
    #[error("source {location} section {section:?} has no header row")]
    MissingHeader {
        /// Source location from the descriptor.
        location: String,
        /// Section name that was resolved.
        section: String,
    },
    /// Source exceeds the configured size limit.
    #[error("source {location} exceeds size limit ({actual_bytes} > {max_bytes})")]
    TooLarge {
        /// Source location from the descriptor.
        location: String,
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual source size in bytes.
        actual_bytes: usize,
    },
    /// Row data is malformed relative to the header.
    #[error("source row malformed: {0}")]
    Row(#[from] RowError),
    /// No source implementation is registered for the descriptor's kind.
    #[error("no source registered for kind: {0}")]
    UnsupportedKind(SourceKind),
    /// A source implementation is already registered for the kind.
    #[error("source already registered for kind: {0}")]
    AlreadyRegistered(SourceKind),
}

/// Resolver of source descriptors into ordered parameter rows.
pub trait RowSource: Send + Sync {
    /// Resolves a descriptor into its ordered sequence of data rows.
    ///
    /// The source's natural row order is preserved; the header row defines
    /// column names and data rows are positional. Values are returned as
    /// raw strings.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the descriptor cannot be resolved; the
    /// failure is fatal and yields zero rows.
    fn rows(&self, descriptor: &SourceDescriptor) -> Result<Vec<DataRow>, SourceError>;
}

// ============================================================================
// SECTION: Collaborator
// ============================================================================

/// Description of one call against the external system under test.
///
/// # Invariants
/// - Opaque to the harness; the collaborator interprets all fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDescriptor {
    /// Target the call is addressed to (contract address, service name).
    pub target: String,
    /// Method name to invoke on the target.
    pub method: String,
    /// Positional call arguments.
    pub args: Vec<Value>,
}

impl CallDescriptor {
    /// Creates a call descriptor.
    #[must_use]
    pub fn new(target: impl Into<String>, method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
            args,
        }
    }
}

/// Collaborator errors surfaced to the harness as data, never as crashes.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// Transport-level failure before any response was produced.
    #[error("collaborator transport failure: {0}")]
    Transport(String),
    /// The collaborator executed the call and reported a failure.
    #[error("collaborator call failed: {message}")]
    Call {
        /// Backend-specific failure code, when one was reported.
        code: Option<i64>,
        /// Failure message reported by the collaborator.
        message: String,
    },
    /// The collaborator response could not be interpreted.
    #[error("collaborator response invalid: {0}")]
    InvalidResponse(String),
}

/// Opaque interface to the externally-deployed logic under test.
///
/// The harness treats the result purely as data to assert on and the error
/// purely as a recordable failure; retry, signing, and consensus behavior
/// live behind this boundary. Implementations are expected to be stateless
/// request/response and shareable across concurrent invocations.
#[async_trait]
pub trait Collaborator: Send + Sync {
    /// Invokes a read or state-changing call and returns its result value.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] when the call cannot be completed or
    /// the collaborator reports a failure.
    async fn invoke(&self, call: &CallDescriptor) -> Result<Value, CollaboratorError>;
}

// ============================================================================
// SECTION: Progress Sink
// ============================================================================

/// Observability hook for invocation lifecycle events.
///
/// Dependency-light by design: hosts may plug in structured logging or
/// metrics without the harness taking a backend dependency. All methods
/// default to no-ops.
pub trait ProgressSink: Send + Sync {
    /// Called when an invocation is dispatched.
    fn invocation_started(&self, method: &MethodId, row_index: usize) {
        let _ = (method, row_index);
    }

    /// Called when an invocation's result has been recorded.
    fn invocation_finished(&self, result: &InvocationResult) {
        let _ = result;
    }
}

/// Progress sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {}
