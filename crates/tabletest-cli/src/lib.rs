// crates/tabletest-cli/src/lib.rs
// ============================================================================
// Module: Tabletest CLI Library
// Description: Suite manifest loading and the HTTP collaborator.
// Purpose: Turn declarative TOML suites into runnable registrations.
// Dependencies: reqwest, serde, tabletest-core, tabletest-runner, toml
// ============================================================================

//! ## Overview
//! The CLI library holds everything the `tabletest` binary needs beyond
//! argument parsing: the TOML suite manifest, its translation into suite
//! registrations, and the JSON-RPC collaborator that talks to a live
//! system under test. Manifest errors are fatal before any invocation.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod app;
pub mod collab;
pub mod manifest;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use app::AppError;
pub use app::SuiteApp;
pub use collab::HttpCollaborator;
pub use manifest::CollaboratorMode;
pub use manifest::Manifest;
pub use manifest::ManifestError;
