// crates/tabletest-cli/src/collab.rs
// ============================================================================
// Module: HTTP Collaborator
// Description: JSON-RPC 2.0 collaborator over HTTP.
// Purpose: Invoke methods on a live system under test from suite bodies.
// Dependencies: async-trait, reqwest, serde_json, tabletest-core
// ============================================================================

//! ## Overview
//! The HTTP collaborator speaks JSON-RPC 2.0: one POST per call, the
//! target and positional arguments in `params`, and the response either a
//! `result` value or an `error` object. Transport failures, reported
//! errors, and malformed responses map onto the three collaborator error
//! variants so the harness records them without interpreting backends.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;

use tabletest_core::CallDescriptor;
use tabletest_core::Collaborator;
use tabletest_core::CollaboratorError;

// ============================================================================
// SECTION: HTTP Collaborator
// ============================================================================

/// JSON-RPC 2.0 collaborator bound to one HTTP endpoint.
///
/// # Invariants
/// - Stateless request/response; safe to share across concurrent
///   invocations.
/// - Request identifiers are unique per collaborator instance.
#[derive(Debug)]
pub struct HttpCollaborator {
    /// JSON-RPC endpoint URL.
    endpoint: String,
    /// Shared HTTP client.
    client: reqwest::Client,
    /// Monotonic request identifier counter.
    next_id: AtomicU64,
}

impl HttpCollaborator {
    /// Creates a collaborator for a JSON-RPC endpoint.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl Collaborator for HttpCollaborator {
    async fn invoke(&self, call: &CallDescriptor) -> Result<Value, CollaboratorError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": call.method,
            "params": {
                "target": call.target,
                "args": call.args,
            },
        });

        let response = self
            .client
            .post(self.endpoint.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|err| CollaboratorError::Transport(err.to_string()))?;
        let body: Value = response
            .json()
            .await
            .map_err(|err| CollaboratorError::InvalidResponse(err.to_string()))?;

        if let Some(error) = body.get("error") {
            let code = error.get("code").and_then(Value::as_i64);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unspecified failure")
                .to_string();
            return Err(CollaboratorError::Call {
                code,
                message,
            });
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| CollaboratorError::InvalidResponse("missing result field".to_string()))
    }
}
