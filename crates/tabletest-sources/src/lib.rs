// crates/tabletest-sources/src/lib.rs
// ============================================================================
// Module: Tabletest Sources Library
// Description: Row source implementations and the source registry.
// Purpose: Resolve declarative source descriptors into parameter rows.
// Dependencies: tabletest-core
// ============================================================================

//! ## Overview
//! Tabletest Sources provides ready-made [`tabletest_core::RowSource`]
//! implementations plus the [`SourceRegistry`] that dispatches descriptors
//! by source kind.
//! Invariants:
//! - Resolution failures are fatal and yield zero rows.
//! - Row order and header-to-value mapping are deterministic.
//! - Source files are capped at [`MAX_SOURCE_BYTES`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod inline;
pub mod registry;
pub mod tabular;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use inline::InlineSource;
pub use registry::SourceRegistry;
pub use tabular::MAX_SOURCE_BYTES;
pub use tabular::TabularFileSource;
pub use tabular::TabularFileSourceConfig;
