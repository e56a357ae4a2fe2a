// crates/tabletest-core/src/runtime/mod.rs
// ============================================================================
// Module: Tabletest Core Runtime
// Description: Comparison logic backing step assertions.
// Purpose: Group runtime helpers used while invocations execute.
// Dependencies: crate submodules
// ============================================================================

//! ## Overview
//! Runtime helpers evaluated while an invocation is in flight. Currently the
//! decimal-aware structural comparison behind `assert_equal`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod compare;
