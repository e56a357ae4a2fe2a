// crates/tabletest-sources/src/registry.rs
// ============================================================================
// Module: Source Registry
// Description: Registry dispatching descriptors to row sources by kind.
// Purpose: Keep callers on the rows contract, not on concrete source kinds.
// Dependencies: tabletest-core
// ============================================================================

//! ## Overview
//! The source registry resolves descriptors by their [`SourceKind`]. It
//! implements the core [`tabletest_core::RowSource`] interface, so the
//! runner depends only on the `rows` contract while the registry decides
//! which implementation serves a descriptor. Unknown kinds fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use tabletest_core::DataRow;
use tabletest_core::RowSource;
use tabletest_core::SourceDescriptor;
use tabletest_core::SourceError;
use tabletest_core::SourceKind;

use crate::tabular::TabularFileSource;
use crate::tabular::TabularFileSourceConfig;

// ============================================================================
// SECTION: Source Registry
// ============================================================================

/// Row source registry keyed by source kind.
///
/// # Invariants
/// - At most one source implementation per kind.
/// - Registered sources are `Send + Sync` and stored behind trait objects.
#[derive(Default)]
pub struct SourceRegistry {
    /// Source implementations keyed by kind.
    sources: BTreeMap<SourceKind, Box<dyn RowSource>>,
}

impl SourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in tabular file source registered.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when a built-in kind is somehow already
    /// registered.
    pub fn with_builtin_sources() -> Result<Self, SourceError> {
        let mut registry = Self::new();
        registry
            .register(SourceKind::TabularFile, TabularFileSource::new(TabularFileSourceConfig::default()))?;
        Ok(registry)
    }

    /// Registers a source implementation for a kind.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::AlreadyRegistered`] when the kind already has
    /// an implementation.
    pub fn register(
        &mut self,
        kind: SourceKind,
        source: impl RowSource + 'static,
    ) -> Result<(), SourceError> {
        if self.sources.contains_key(&kind) {
            return Err(SourceError::AlreadyRegistered(kind));
        }
        self.sources.insert(kind, Box::new(source));
        Ok(())
    }
}

impl RowSource for SourceRegistry {
    fn rows(&self, descriptor: &SourceDescriptor) -> Result<Vec<DataRow>, SourceError> {
        let Some(source) = self.sources.get(&descriptor.kind) else {
            return Err(SourceError::UnsupportedKind(descriptor.kind));
        };
        source.rows(descriptor)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use tabletest_core::RowSource;
    use tabletest_core::SourceDescriptor;
    use tabletest_core::SourceError;
    use tabletest_core::SourceKind;

    use super::SourceRegistry;
    use crate::inline::InlineSource;

    #[test]
    fn unknown_kind_fails_closed() -> Result<(), SourceError> {
        let registry = SourceRegistry::with_builtin_sources()?;
        let descriptor = SourceDescriptor::new(SourceKind::Database, "runs", "cases");
        assert!(matches!(
            registry.rows(&descriptor),
            Err(SourceError::UnsupportedKind(SourceKind::Database))
        ));
        Ok(())
    }

    #[test]
    fn duplicate_kind_is_refused() -> Result<(), SourceError> {
        let mut registry = SourceRegistry::new();
        registry.register(SourceKind::Inline, InlineSource::new())?;
        let err = registry.register(SourceKind::Inline, InlineSource::new());
        assert!(matches!(err, Err(SourceError::AlreadyRegistered(SourceKind::Inline))));
        Ok(())
    }

    #[test]
    fn dispatch_reaches_registered_source() -> Result<(), SourceError> {
        let mut registry = SourceRegistry::new();
        registry.register(
            SourceKind::Inline,
            InlineSource::new().with_table("sub", "cases", vec!["first"], vec![vec!["12"]]),
        )?;
        let descriptor = SourceDescriptor::new(SourceKind::Inline, "sub", "cases");
        let rows = registry.rows(&descriptor)?;
        assert_eq!(rows.len(), 1);
        Ok(())
    }
}
