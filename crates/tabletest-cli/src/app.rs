// crates/tabletest-cli/src/app.rs
// ============================================================================
// Module: Suite Application
// Description: Manifest-to-report orchestration shared by binary and hosts.
// Purpose: Build and run a suite from a loaded manifest in one place.
// Dependencies: tabletest-core, tabletest-runner, tabletest-sources, thiserror
// ============================================================================

//! ## Overview
//! [`SuiteApp`] wires a loaded manifest into a runnable suite: it builds
//! the declared collaborator, translates suites into registrations, applies
//! an optional method filter, and runs everything against the built-in
//! source registry. The binary and embedding hosts share this path, so
//! both get identical fatal-error behavior.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use tabletest_core::SourceError;
use tabletest_core::SuiteReport;
use tabletest_core::SystemClock;
use tabletest_runner::InvocationRunner;
use tabletest_runner::Suite;
use tabletest_runner::SuiteConfig;
use tabletest_runner::SuiteError;
use tabletest_sources::SourceRegistry;

use crate::manifest::Manifest;
use crate::manifest::ManifestError;

// ============================================================================
// SECTION: Application Errors
// ============================================================================

/// Fatal application failures surfaced before or instead of a report.
#[derive(Debug, Error)]
pub enum AppError {
    /// Manifest loading or translation failed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    /// Source registry construction failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// The suite run failed before producing a report.
    #[error(transparent)]
    Suite(#[from] SuiteError),
    /// No registered method matches the filter.
    #[error("no methods match filter {0:?}")]
    EmptyFilter(String),
}

// ============================================================================
// SECTION: Suite Application
// ============================================================================

/// Manifest-driven suite runner.
pub struct SuiteApp {
    /// Loaded suite manifest.
    manifest: Manifest,
    /// Optional method/display-name filter.
    filter: Option<String>,
}

impl SuiteApp {
    /// Loads a manifest from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Manifest`] when the manifest cannot be loaded.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        Ok(Self::from_manifest(Manifest::load(path)?))
    }

    /// Wraps an already-loaded manifest.
    #[must_use]
    pub const fn from_manifest(manifest: Manifest) -> Self {
        Self {
            manifest,
            filter: None,
        }
    }

    /// Restricts the run to methods whose identifier or display name
    /// contains the given text.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Builds the suite and runs every (method, row) pairing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] on manifest translation failures, an empty
    /// filter match, or a fatal suite failure.
    pub async fn run(&self, config: &SuiteConfig) -> Result<SuiteReport, AppError> {
        let collaborator = self.manifest.collaborator()?;
        let mut registrations = self.manifest.registrations()?;
        if let Some(filter) = &self.filter {
            registrations.retain(|registration| {
                registration.method.as_str().contains(filter)
                    || registration.display_name().contains(filter)
            });
            if registrations.is_empty() {
                return Err(AppError::EmptyFilter(filter.clone()));
            }
        }

        let registry = SourceRegistry::with_builtin_sources()?;
        let runner = InvocationRunner::new(collaborator).with_clock(Arc::new(SystemClock));
        let mut suite = Suite::new(Arc::new(registry), runner);
        for registration in registrations {
            suite.register(registration)?;
        }
        Ok(suite.run(config).await?)
    }
}
