// crates/tabletest-cli/src/manifest.rs
// ============================================================================
// Module: Suite Manifest
// Description: TOML manifest declaring suites, sources, and the collaborator.
// Purpose: Translate declarative suites into runnable registrations.
// Dependencies: serde, serde_json, tabletest-core, tabletest-runner, toml
// ============================================================================

//! ## Overview
//! A manifest declares one collaborator and any number of suites. Each
//! suite binds a data source to a call template: argument columns are
//! looked up per row, coerced from their raw cell text, sent through the
//! collaborator, and the reply is compared against the expected column.
//! Every manifest error is fatal; a malformed manifest never produces a
//! partially registered suite.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use tabletest_core::CallDescriptor;
use tabletest_core::Collaborator;
use tabletest_core::MethodId;
use tabletest_core::SourceDescriptor;
use tabletest_core::SourceKind;
use tabletest_runner::BodyError;
use tabletest_runner::Expectation;
use tabletest_runner::InvocationContext;
use tabletest_runner::Registration;
use tabletest_runner::ScriptedCollaborator;
use tabletest_runner::TestBody;

use crate::collab::HttpCollaborator;

// ============================================================================
// SECTION: Manifest Errors
// ============================================================================

/// Fatal manifest failures.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest file could not be read.
    #[error("manifest {path} unreadable: {detail}")]
    Unreadable {
        /// Manifest path.
        path: String,
        /// Read failure description.
        detail: String,
    },
    /// Manifest file is not valid TOML for the expected shape.
    #[error("manifest {path} invalid: {detail}")]
    Parse {
        /// Manifest path.
        path: String,
        /// Parse failure description.
        detail: String,
    },
    /// A suite names a source kind with no implementation.
    #[error("unknown source kind: {0}")]
    UnknownKind(String),
    /// The HTTP collaborator mode requires an endpoint.
    #[error("collaborator mode \"http\" requires an endpoint")]
    MissingEndpoint,
    /// A script entry declares both or neither of reply and error.
    #[error("script entry for {target}.{method} needs exactly one of reply or error")]
    AmbiguousScript {
        /// Script entry target.
        target: String,
        /// Script entry method.
        method: String,
    },
    /// The manifest declares no suites.
    #[error("manifest declares no suites")]
    Empty,
}

// ============================================================================
// SECTION: Manifest Shape
// ============================================================================

/// Collaborator selection for a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorMode {
    /// JSON-RPC 2.0 over HTTP.
    Http,
    /// Deterministic in-memory replies for offline runs.
    Scripted,
}

/// Collaborator section of a manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorConfig {
    /// Selected collaborator implementation.
    pub mode: CollaboratorMode,
    /// JSON-RPC endpoint URL for the HTTP mode.
    pub endpoint: Option<String>,
    /// Scripted replies for the scripted mode.
    #[serde(default)]
    pub script: Vec<ScriptEntry>,
}

/// One scripted call outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEntry {
    /// Call target.
    pub target: String,
    /// Call method.
    pub method: String,
    /// Exact positional arguments the script matches on.
    #[serde(default)]
    pub args: Vec<Value>,
    /// Successful reply value.
    pub reply: Option<Value>,
    /// Target-reported failure message.
    pub error: Option<String>,
}

/// Data source section of a suite entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Source kind label.
    pub kind: String,
    /// Source path or identifier.
    pub location: String,
    /// Section name within the source; empty selects the whole file.
    #[serde(default)]
    pub section: String,
}

/// Call template section of a suite entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CallConfig {
    /// Call target.
    pub target: String,
    /// Call method.
    pub method: String,
    /// Column names supplying positional arguments, row by row.
    #[serde(default)]
    pub args: Vec<String>,
    /// Column name supplying the expected reply, if any.
    pub expected: Option<String>,
    /// Declares that the call is expected to fail.
    #[serde(default)]
    pub expect_failure: bool,
}

/// One declarative suite.
#[derive(Debug, Clone, Deserialize)]
pub struct SuiteEntry {
    /// Suite name; doubles as method identifier and display name.
    pub name: String,
    /// Owner recorded for reporting.
    #[serde(default)]
    pub owner: String,
    /// Data source feeding the suite.
    pub source: SourceConfig,
    /// Call template executed per row.
    pub call: CallConfig,
}

/// Root manifest shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Collaborator the suites run against.
    pub collaborator: CollaboratorConfig,
    /// Declared suites in manifest order.
    #[serde(default, rename = "suite")]
    pub suites: Vec<SuiteEntry>,
}

// ============================================================================
// SECTION: Manifest Loading
// ============================================================================

impl Manifest {
    /// Loads and validates a manifest from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] when the file cannot be read, is not
    /// valid TOML, or declares no suites.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|err| ManifestError::Unreadable {
            path: path.display().to_string(),
            detail: err.to_string(),
        })?;
        let manifest: Self = toml::from_str(&text).map_err(|err| ManifestError::Parse {
            path: path.display().to_string(),
            detail: err.to_string(),
        })?;
        if manifest.suites.is_empty() {
            return Err(ManifestError::Empty);
        }
        Ok(manifest)
    }

    /// Builds the collaborator the manifest declares.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] when the collaborator section is
    /// incomplete or a script entry is ambiguous.
    pub fn collaborator(&self) -> Result<Arc<dyn Collaborator>, ManifestError> {
        match self.collaborator.mode {
            CollaboratorMode::Http => {
                let endpoint = self
                    .collaborator
                    .endpoint
                    .as_deref()
                    .ok_or(ManifestError::MissingEndpoint)?;
                Ok(Arc::new(HttpCollaborator::new(endpoint)))
            }
            CollaboratorMode::Scripted => {
                let mut scripted = ScriptedCollaborator::new();
                for entry in &self.collaborator.script {
                    scripted = match (&entry.reply, &entry.error) {
                        (Some(reply), None) => scripted.with_reply(
                            &entry.target,
                            &entry.method,
                            entry.args.clone(),
                            reply.clone(),
                        ),
                        (None, Some(error)) => scripted.with_failure(
                            &entry.target,
                            &entry.method,
                            entry.args.clone(),
                            error,
                        ),
                        _ => {
                            return Err(ManifestError::AmbiguousScript {
                                target: entry.target.clone(),
                                method: entry.method.clone(),
                            });
                        }
                    };
                }
                Ok(Arc::new(scripted))
            }
        }
    }

    /// Translates the declared suites into registrations, in manifest order.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnknownKind`] when a suite names a source
    /// kind with no implementation.
    pub fn registrations(&self) -> Result<Vec<Registration>, ManifestError> {
        self.suites
            .iter()
            .map(|entry| {
                let kind = source_kind(&entry.source.kind)?;
                let descriptor =
                    SourceDescriptor::new(kind, &entry.source.location, &entry.source.section)
                        .with_owner(&entry.owner)
                        .with_display_name(&entry.name);
                let expectation = if entry.call.expect_failure {
                    Expectation::CollaboratorFailure
                } else {
                    Expectation::Success
                };
                Ok(
                    Registration::new(MethodId::new(&entry.name), descriptor, call_body(&entry.call))
                        .with_expectation(expectation),
                )
            })
            .collect()
    }
}

/// Maps a manifest kind label to a source kind.
fn source_kind(label: &str) -> Result<SourceKind, ManifestError> {
    match label {
        "tabular-file" => Ok(SourceKind::TabularFile),
        "inline" => Ok(SourceKind::Inline),
        "database" => Ok(SourceKind::Database),
        other => Err(ManifestError::UnknownKind(other.to_string())),
    }
}

// ============================================================================
// SECTION: Call Bodies
// ============================================================================

/// Coerces a raw cell into a JSON value, keeping non-JSON text as a string.
fn coerce_cell(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Builds the test body for a call template.
fn call_body(call: &CallConfig) -> TestBody {
    let call = Arc::new(call.clone());
    Arc::new(move |ctx| {
        let call = Arc::clone(&call);
        Box::pin(async move { run_call(&call, &ctx).await })
    })
}

/// Executes one call template against one row.
async fn run_call(call: &CallConfig, ctx: &InvocationContext) -> Result<(), BodyError> {
    let mut args = Vec::with_capacity(call.args.len());
    for column in &call.args {
        args.push(coerce_cell(ctx.params.get(column)?));
    }
    let descriptor = CallDescriptor::new(call.target.clone(), call.method.clone(), args);
    let value = ctx.collaborator.invoke(&descriptor).await?;
    if let Some(expected_column) = &call.expected {
        let expected = coerce_cell(ctx.params.get(expected_column)?);
        let label = format!("{}.{}", call.target, call.method);
        ctx.collector.assert_equal(&value, &expected, &label);
    } else {
        ctx.collector.pass(
            format!("{}.{}", call.target, call.method),
            "call completed",
        );
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
