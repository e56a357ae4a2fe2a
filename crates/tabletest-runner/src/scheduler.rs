// crates/tabletest-runner/src/scheduler.rs
// ============================================================================
// Module: Suite Scheduler
// Description: Bounded-concurrency execution of all (method, row) pairings.
// Purpose: Resolve sources, dispatch invocations, and aggregate the report.
// Dependencies: tabletest-core, thiserror, tokio
// ============================================================================

//! ## Overview
//! A [`Suite`] owns the registered test methods and a row source. A run
//! resolves every registration's rows up front, so a source failure is fatal
//! before any invocation starts, then dispatches all pairings over a bounded
//! worker pool. Results are ordered by registration order and row index, so
//! two runs over identical inputs produce identically ordered reports no
//! matter how workers interleave. A deadline converts undispatched and
//! in-flight work into ABORTED results rather than dropping it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

use tabletest_core::DataRow;
use tabletest_core::InvariantError;
use tabletest_core::InvocationResult;
use tabletest_core::MethodId;
use tabletest_core::RowSource;
use tabletest_core::SourceError;
use tabletest_core::SuiteReport;

use crate::invocation::InvocationRunner;
use crate::invocation::Registration;

// ============================================================================
// SECTION: Suite Errors
// ============================================================================

/// Fatal suite-level failures.
///
/// Row-scoped failures never surface here; they are recorded as FAIL or
/// ABORTED results inside the report.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// A registration's data source could not be resolved.
    #[error("data source for method {method} failed")]
    Source {
        /// Method whose source failed.
        method: MethodId,
        /// Underlying source failure.
        #[source]
        source: SourceError,
    },
    /// The configured concurrency is zero.
    #[error("concurrency must be at least one")]
    InvalidConcurrency,
    /// A method identifier was registered twice.
    #[error("method {0} is already registered")]
    DuplicateMethod(MethodId),
    /// Report aggregation violated a correctness invariant.
    #[error(transparent)]
    Invariant(#[from] InvariantError),
    /// A worker task failed outside the invocation boundary.
    #[error("worker task failed: {0}")]
    Worker(String),
}

// ============================================================================
// SECTION: Suite Configuration
// ============================================================================

/// Execution settings for one suite run.
#[derive(Debug, Clone, Copy)]
pub struct SuiteConfig {
    /// Maximum number of invocations in flight at once.
    pub concurrency: usize,
    /// Wall-clock budget for the whole run, if any.
    pub deadline: Option<Duration>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            deadline: None,
        }
    }
}

// ============================================================================
// SECTION: Suite
// ============================================================================

/// Registered test methods bound to a row source and an invocation runner.
///
/// # Invariants
/// - Method identifiers are unique across registrations.
/// - Registration order is the primary report ordering key.
pub struct Suite {
    /// Row source resolving registered descriptors.
    source: Arc<dyn RowSource>,
    /// Runner executing individual (method, row) pairings.
    runner: Arc<InvocationRunner>,
    /// Registrations in registration order.
    registrations: Vec<Arc<Registration>>,
}

impl Suite {
    /// Creates a suite over a row source and an invocation runner.
    #[must_use]
    pub fn new(source: Arc<dyn RowSource>, runner: InvocationRunner) -> Self {
        Self {
            source,
            runner: Arc::new(runner),
            registrations: Vec::new(),
        }
    }

    /// Registers a test method.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::DuplicateMethod`] when the method identifier is
    /// already registered.
    pub fn register(&mut self, registration: Registration) -> Result<(), SuiteError> {
        if self.registrations.iter().any(|existing| existing.method == registration.method) {
            return Err(SuiteError::DuplicateMethod(registration.method));
        }
        self.registrations.push(Arc::new(registration));
        Ok(())
    }

    /// Returns the number of registered methods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Returns whether no methods are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Runs every (method, row) pairing and aggregates the report.
    ///
    /// All rows are resolved before any invocation is dispatched, so a
    /// source failure yields an error with zero results rather than a
    /// partially executed suite.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError`] on source resolution failure, invalid
    /// configuration, worker loss, or an aggregation invariant violation.
    pub async fn run(&self, config: &SuiteConfig) -> Result<SuiteReport, SuiteError> {
        if config.concurrency == 0 {
            return Err(SuiteError::InvalidConcurrency);
        }

        let resolved = self.resolve_rows()?;
        let deadline = config.deadline.map(|budget| Instant::now() + budget);

        let semaphore = Arc::new(Semaphore::new(config.concurrency));
        let mut workers: JoinSet<(usize, InvocationResult)> = JoinSet::new();
        let mut ordered: Vec<(usize, InvocationResult)> = Vec::new();

        for (order, registration, rows) in resolved {
            for row in rows {
                if let Some(deadline) = deadline
                    && Instant::now() >= deadline
                {
                    ordered.push((
                        order,
                        self.runner.aborted_before_dispatch(&registration, row.index()),
                    ));
                    continue;
                }

                let permit = Arc::clone(&semaphore)
                    .acquire_owned()
                    .await
                    .map_err(|err| SuiteError::Worker(err.to_string()))?;
                let runner = Arc::clone(&self.runner);
                let registration = Arc::clone(&registration);
                workers.spawn(async move {
                    let result = runner.run_one_until(&registration, &row, deadline).await;
                    drop(permit);
                    (order, result)
                });
            }
        }

        while let Some(joined) = workers.join_next().await {
            let entry = joined.map_err(|err| SuiteError::Worker(err.to_string()))?;
            ordered.push(entry);
        }

        ordered.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.row_index.cmp(&b.1.row_index)));
        let results = ordered.into_iter().map(|(_, result)| result).collect();

        let report = SuiteReport::from_results(results)?;
        report.verify_counts()?;
        Ok(report)
    }

    /// Resolves every registration's rows, failing fast on the first error.
    #[allow(clippy::type_complexity, reason = "Local resolution triple, not an API surface.")]
    fn resolve_rows(&self) -> Result<Vec<(usize, Arc<Registration>, Vec<DataRow>)>, SuiteError> {
        let mut resolved = Vec::with_capacity(self.registrations.len());
        for (order, registration) in self.registrations.iter().enumerate() {
            let rows = self.source.rows(&registration.descriptor).map_err(|source| {
                SuiteError::Source {
                    method: registration.method.clone(),
                    source,
                }
            })?;
            resolved.push((order, Arc::clone(registration), rows));
        }
        Ok(resolved)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
