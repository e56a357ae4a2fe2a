// crates/tabletest-sources/src/inline.rs
// ============================================================================
// Module: Inline Row Source
// Description: Rows declared in code at registration time.
// Purpose: Drive suites without any file dependency.
// Dependencies: tabletest-core
// ============================================================================

//! ## Overview
//! [`InlineSource`] holds a literal header and row set, keyed by section
//! name. It serves registrations whose descriptors use the inline kind,
//! which keeps small suites and harness tests free of file fixtures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use tabletest_core::DataRow;
use tabletest_core::RowSource;
use tabletest_core::SourceDescriptor;
use tabletest_core::SourceError;

// ============================================================================
// SECTION: Inline Source
// ============================================================================

/// One literal table registered under a section name.
///
/// # Invariants
/// - `header` names are unique; every row matches the header arity.
///   Violations surface as fatal [`SourceError`] values at resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineTable {
    /// Header column names in declaration order.
    pub header: Vec<String>,
    /// Raw row values in declaration order.
    pub rows: Vec<Vec<String>>,
}

/// Row source backed by tables declared in code.
///
/// # Invariants
/// - Declaration order of rows is preserved.
/// - Tables are keyed by `(location, section)` from the descriptor.
#[derive(Debug, Clone, Default)]
pub struct InlineSource {
    /// Registered tables keyed by `(location, section)`.
    tables: BTreeMap<(String, String), InlineTable>,
}

impl InlineSource {
    /// Creates an empty inline source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table under a location and section name.
    #[must_use]
    pub fn with_table(
        mut self,
        location: impl Into<String>,
        section: impl Into<String>,
        header: Vec<&str>,
        rows: Vec<Vec<&str>>,
    ) -> Self {
        let table = InlineTable {
            header: header.into_iter().map(ToString::to_string).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(ToString::to_string).collect())
                .collect(),
        };
        self.tables.insert((location.into(), section.into()), table);
        self
    }
}

impl RowSource for InlineSource {
    fn rows(&self, descriptor: &SourceDescriptor) -> Result<Vec<DataRow>, SourceError> {
        let key = (descriptor.location.clone(), descriptor.section.clone());
        let table = self.tables.get(&key).ok_or_else(|| SourceError::MissingSection {
            location: descriptor.location.clone(),
            section: descriptor.section.clone(),
        })?;
        if table.header.is_empty() {
            return Err(SourceError::MissingHeader {
                location: descriptor.location.clone(),
                section: descriptor.section.clone(),
            });
        }
        let mut rows = Vec::with_capacity(table.rows.len());
        for (index, values) in table.rows.iter().enumerate() {
            rows.push(DataRow::new(index, table.header.clone(), values.clone())?);
        }
        Ok(rows)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
