// crates/tabletest-core/src/core/mod.rs
// ============================================================================
// Module: Tabletest Core Model
// Description: Value types for sources, parameters, steps, and verdicts.
// Purpose: Group the harness data model under one namespace.
// Dependencies: crate submodules
// ============================================================================

//! ## Overview
//! The core model holds the serializable value types that flow through a
//! suite run: descriptors and rows on the way in, step events and verdicts
//! on the way out.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod params;
pub mod source;
pub mod step;
pub mod time;
pub mod verdict;
