// crates/tabletest-runner/src/scripted.rs
// ============================================================================
// Module: Scripted Collaborator
// Description: In-memory collaborator returning pre-scripted call outcomes.
// Purpose: Drive runner tests without a live system under test.
// Dependencies: async-trait, serde_json, tabletest-core
// ============================================================================

//! ## Overview
//! A [`ScriptedCollaborator`] maps (target, method, arguments) triples to
//! canned outcomes. Calls with no script fail with a transport error so a
//! misconfigured fixture surfaces as a loud failure rather than a silent
//! default value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use tabletest_core::CallDescriptor;
use tabletest_core::Collaborator;
use tabletest_core::CollaboratorError;

// ============================================================================
// SECTION: Scripted Outcomes
// ============================================================================

/// Canned outcome for one scripted call.
#[derive(Debug, Clone)]
enum ScriptedOutcome {
    /// The call succeeds with this value.
    Reply(Value),
    /// The call fails with this target-reported message.
    Failure(String),
}

/// Builds the lookup key for a call.
fn call_key(target: &str, method: &str, args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(Value::to_string).collect();
    format!("{target}.{method}({})", rendered.join(","))
}

// ============================================================================
// SECTION: Scripted Collaborator
// ============================================================================

/// Collaborator backed by a table of pre-scripted call outcomes.
///
/// # Invariants
/// - Lookup is exact on (target, method, arguments); unscripted calls fail.
/// - Every invocation is recorded for later inspection.
#[derive(Debug, Default)]
pub struct ScriptedCollaborator {
    /// Scripted outcomes keyed by rendered call.
    scripts: BTreeMap<String, ScriptedOutcome>,
    /// Rendered calls in invocation order.
    invoked: Mutex<Vec<String>>,
}

impl ScriptedCollaborator {
    /// Creates a collaborator with no scripted calls.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a successful reply for a call.
    #[must_use]
    pub fn with_reply(
        mut self,
        target: &str,
        method: &str,
        args: Vec<Value>,
        value: Value,
    ) -> Self {
        self.scripts.insert(call_key(target, method, &args), ScriptedOutcome::Reply(value));
        self
    }

    /// Scripts a target-reported failure for a call.
    #[must_use]
    pub fn with_failure(
        mut self,
        target: &str,
        method: &str,
        args: Vec<Value>,
        message: &str,
    ) -> Self {
        self.scripts.insert(
            call_key(target, method, &args),
            ScriptedOutcome::Failure(message.to_string()),
        );
        self
    }

    /// Returns the rendered calls invoked so far, in order.
    #[must_use]
    pub fn invoked_calls(&self) -> Vec<String> {
        match self.invoked.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Collaborator for ScriptedCollaborator {
    async fn invoke(&self, call: &CallDescriptor) -> Result<Value, CollaboratorError> {
        let key = call_key(&call.target, &call.method, &call.args);
        match self.invoked.lock() {
            Ok(mut guard) => guard.push(key.clone()),
            Err(poisoned) => poisoned.into_inner().push(key.clone()),
        }
        match self.scripts.get(&key) {
            Some(ScriptedOutcome::Reply(value)) => Ok(value.clone()),
            Some(ScriptedOutcome::Failure(message)) => Err(CollaboratorError::Call {
                code: None,
                message: message.clone(),
            }),
            None => Err(CollaboratorError::Transport(format!("no scripted reply for {key}"))),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
