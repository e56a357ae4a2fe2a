// crates/tabletest-runner/src/invocation.rs
// ============================================================================
// Module: Tabletest Invocation Runner
// Description: Isolated execution of one (method, row) pairing.
// Purpose: Contain row-scoped failures at the invocation boundary.
// Dependencies: tabletest-core, thiserror, tokio
// ============================================================================

//! ## Overview
//! The invocation runner executes one test body against one data row:
//! build the parameter store, run the optional setup step, run the body,
//! and convert every error that escapes the body into a FAIL step event at
//! this boundary. Nothing propagates upward; one row's failure is invisible
//! to all other rows and methods. Failure expectations are declared per
//! registration, so a negative test records an expected collaborator
//! failure as PASS without inspecting caught errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinError;
use tokio::time::Instant;

use tabletest_core::Collaborator;
use tabletest_core::CollaboratorError;
use tabletest_core::DataRow;
use tabletest_core::InvocationResult;
use tabletest_core::LogicalClock;
use tabletest_core::MethodId;
use tabletest_core::ParameterError;
use tabletest_core::ParameterStore;
use tabletest_core::SourceDescriptor;
use tabletest_core::StepCollector;
use tabletest_core::TimeSource;
use tabletest_core::interfaces::NullProgressSink;
use tabletest_core::interfaces::ProgressSink;

// ============================================================================
// SECTION: Body Types
// ============================================================================

/// Errors a test body may raise past its own step recording.
///
/// # Invariants
/// - Variants are stable for programmatic handling; the collaborator
///   variant drives expected-failure classification.
#[derive(Debug, Error)]
pub enum BodyError {
    /// A collaborator call failed.
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
    /// A parameter lookup or parse failed.
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    /// The body failed for a reason it describes itself.
    #[error("{0}")]
    Failed(String),
}

/// Boxed future returned by test bodies and setup steps.
pub type BodyFuture = Pin<Box<dyn Future<Output = Result<(), BodyError>> + Send>>;

/// Test body invoked once per data row.
pub type TestBody = Arc<dyn Fn(InvocationContext) -> BodyFuture + Send + Sync>;

/// Per-invocation context handed to setup steps and test bodies.
///
/// # Invariants
/// - `params` is built from exactly one data row and is read-only.
/// - `collector` belongs to exactly one invocation.
#[derive(Clone)]
pub struct InvocationContext {
    /// Read-only parameters for this invocation.
    pub params: Arc<ParameterStore>,
    /// Step recorder for this invocation.
    pub collector: StepCollector,
    /// Shared collaborator for calls against the system under test.
    pub collaborator: Arc<dyn Collaborator>,
}

// ============================================================================
// SECTION: Failure Expectation
// ============================================================================

/// Declared expectation for the collaborator outcome of an invocation.
///
/// # Invariants
/// - Variants are stable for serialization and registration matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The body is expected to complete without raising an error.
    #[default]
    Success,
    /// The body is expected to surface a collaborator failure; one doing so
    /// records PASS, while a clean completion records FAIL.
    CollaboratorFailure,
}

// ============================================================================
// SECTION: Registration
// ============================================================================

/// Association of a test method with its data source and body.
///
/// # Invariants
/// - Immutable once registered with a suite.
/// - `method` is unique within a suite.
#[derive(Clone)]
pub struct Registration {
    /// Test method identifier.
    pub method: MethodId,
    /// Data source descriptor feeding the method.
    pub descriptor: SourceDescriptor,
    /// Declared collaborator outcome expectation.
    pub expectation: Expectation,
    /// Optional per-invocation setup step.
    pub setup: Option<TestBody>,
    /// Test body invoked once per row.
    pub body: TestBody,
}

impl Registration {
    /// Creates a registration with default expectation and no setup step.
    #[must_use]
    pub fn new(method: MethodId, descriptor: SourceDescriptor, body: TestBody) -> Self {
        Self {
            method,
            descriptor,
            expectation: Expectation::Success,
            setup: None,
            body,
        }
    }

    /// Declares the collaborator outcome expectation.
    #[must_use]
    pub const fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectation = expectation;
        self
    }

    /// Attaches a per-invocation setup step.
    #[must_use]
    pub fn with_setup(mut self, setup: TestBody) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Returns the display name used in reports.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.descriptor.display_name.is_empty() {
            self.method.as_str()
        } else {
            &self.descriptor.display_name
        }
    }
}

// ============================================================================
// SECTION: Step Termination
// ============================================================================

/// How one executed step (setup or body) terminated.
enum StepTermination {
    /// The step ran to completion with the given outcome.
    Completed(Result<(), BodyError>),
    /// The step panicked; the panic was contained at the task boundary.
    Panicked(String),
    /// The step was interrupted by the suite deadline.
    DeadlineElapsed,
}

/// Extracts a printable message from a panicked task.
fn panic_message(err: JoinError) -> String {
    match err.try_into_panic() {
        Ok(payload) => payload.downcast_ref::<&str>().map_or_else(
            || {
                payload
                    .downcast_ref::<String>()
                    .cloned()
                    .unwrap_or_else(|| "opaque panic payload".to_string())
            },
            |message| (*message).to_string(),
        ),
        Err(err) => err.to_string(),
    }
}

// ============================================================================
// SECTION: Invocation Runner
// ============================================================================

/// Executor of one (method, row) pairing end to end.
///
/// # Invariants
/// - Errors and panics raised by setup or body never escape `run_one`.
/// - Every invocation yields exactly one result, ABORTED included.
pub struct InvocationRunner {
    /// Shared collaborator handed to every invocation context.
    collaborator: Arc<dyn Collaborator>,
    /// Observability hook for invocation lifecycle events.
    progress: Arc<dyn ProgressSink>,
    /// Time source stamping recorded step events.
    clock: Arc<dyn TimeSource>,
}

impl InvocationRunner {
    /// Creates a runner with a no-op progress sink and a logical clock.
    #[must_use]
    pub fn new(collaborator: Arc<dyn Collaborator>) -> Self {
        Self {
            collaborator,
            progress: Arc::new(NullProgressSink),
            clock: Arc::new(LogicalClock::new()),
        }
    }

    /// Replaces the progress sink.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Replaces the time source used for step events.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    /// Runs one (method, row) pairing without a deadline.
    pub async fn run_one(&self, registration: &Registration, row: &DataRow) -> InvocationResult {
        self.run_one_until(registration, row, None).await
    }

    /// Runs one (method, row) pairing, interrupting at the deadline.
    ///
    /// Partial step events recorded before an interruption are kept and a
    /// single ABORTED event is appended, so interrupted work is never
    /// silently dropped.
    pub async fn run_one_until(
        &self,
        registration: &Registration,
        row: &DataRow,
        deadline: Option<Instant>,
    ) -> InvocationResult {
        self.progress.invocation_started(&registration.method, row.index());

        let collector = StepCollector::new(Arc::clone(&self.clock));
        let ctx = InvocationContext {
            params: Arc::new(ParameterStore::from_row(row)),
            collector: collector.clone(),
            collaborator: Arc::clone(&self.collaborator),
        };

        let setup_ok = match &registration.setup {
            None => true,
            Some(setup) => {
                match execute_step(setup, ctx.clone(), deadline).await {
                    StepTermination::Completed(Ok(())) => true,
                    StepTermination::Completed(Err(err)) => {
                        collector.fail("setup", "setup failed; body skipped", err.to_string());
                        false
                    }
                    StepTermination::Panicked(message) => {
                        collector.fail("setup", "setup panicked; body skipped", message);
                        false
                    }
                    StepTermination::DeadlineElapsed => {
                        collector
                            .aborted("deadline", "suite deadline elapsed during setup");
                        false
                    }
                }
            }
        };

        if setup_ok {
            let termination = execute_step(&registration.body, ctx, deadline).await;
            classify_body(registration.expectation, &collector, termination);
        }

        let result = InvocationResult::from_events(
            registration.method.clone(),
            registration.display_name(),
            row.index(),
            collector.take_events(),
        );
        self.progress.invocation_finished(&result);
        result
    }

    /// Records an invocation that was never dispatched before the deadline.
    #[must_use]
    pub fn aborted_before_dispatch(
        &self,
        registration: &Registration,
        row_index: usize,
    ) -> InvocationResult {
        let collector = StepCollector::new(Arc::clone(&self.clock));
        collector.aborted("deadline", "suite deadline elapsed before dispatch");
        let result = InvocationResult::from_events(
            registration.method.clone(),
            registration.display_name(),
            row_index,
            collector.take_events(),
        );
        self.progress.invocation_finished(&result);
        result
    }
}

// ============================================================================
// SECTION: Step Execution
// ============================================================================

/// Runs one step on its own task, containing panics and honoring the deadline.
async fn execute_step(
    step: &TestBody,
    ctx: InvocationContext,
    deadline: Option<Instant>,
) -> StepTermination {
    let mut handle = tokio::spawn((step)(ctx));
    let joined = match deadline {
        None => (&mut handle).await,
        Some(deadline) => match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(joined) => joined,
            Err(_elapsed) => {
                handle.abort();
                let _ = (&mut handle).await;
                return StepTermination::DeadlineElapsed;
            }
        },
    };
    match joined {
        Ok(outcome) => StepTermination::Completed(outcome),
        Err(err) if err.is_panic() => StepTermination::Panicked(panic_message(err)),
        Err(_cancelled) => StepTermination::DeadlineElapsed,
    }
}

/// Converts a body termination into step events per the declared expectation.
fn classify_body(
    expectation: Expectation,
    collector: &StepCollector,
    termination: StepTermination,
) {
    match (expectation, termination) {
        (Expectation::Success, StepTermination::Completed(Ok(()))) => {}
        (Expectation::Success, StepTermination::Completed(Err(err))) => {
            collector.fail("body", "body raised an error", err.to_string());
        }
        (Expectation::CollaboratorFailure, StepTermination::Completed(Ok(()))) => {
            collector.fail(
                "expected-failure",
                "collaborator call succeeded but this method declares an expected failure",
                "",
            );
        }
        (
            Expectation::CollaboratorFailure,
            StepTermination::Completed(Err(BodyError::Collaborator(err))),
        ) => {
            collector.pass(
                "expected-failure",
                format!("collaborator failed as declared: {err}"),
            );
        }
        (Expectation::CollaboratorFailure, StepTermination::Completed(Err(err))) => {
            collector.fail("body", "body raised an error", err.to_string());
        }
        (_, StepTermination::Panicked(message)) => {
            collector.fail("body", "body panicked", message);
        }
        (_, StepTermination::DeadlineElapsed) => {
            collector.aborted("deadline", "suite deadline elapsed; invocation interrupted");
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
