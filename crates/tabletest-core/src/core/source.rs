// crates/tabletest-core/src/core/source.rs
// ============================================================================
// Module: Tabletest Source Model
// Description: Source descriptors, data rows, and method identifiers.
// Purpose: Describe where parameter rows come from and how they are shaped.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`SourceDescriptor`] declares a tabular parameter source for one test
//! method; a [`DataRow`] is one resolved row of that source. Descriptors are
//! immutable once registered, and rows are independent of one another: no
//! row depends on another row's outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Method Identifier
// ============================================================================

/// Identifier for a registered test method.
///
/// # Invariants
/// - Opaque UTF-8 string; no normalization or validation is applied by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodId(String);

impl MethodId {
    /// Creates a new method identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Source Kind
// ============================================================================

/// Kind of parameter source behind a descriptor.
///
/// # Invariants
/// - Variants are stable for serialization and registry dispatch.
/// - The enumeration is open: callers depend on the `rows` contract, not on
///   the concrete kind, and future kinds may be added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SourceKind {
    /// Sectioned tabular text file on disk.
    TabularFile,
    /// Rows declared inline at registration time.
    Inline,
    /// Database-backed source (reserved; no built-in implementation yet).
    Database,
}

impl SourceKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TabularFile => "tabular-file",
            Self::Inline => "inline",
            Self::Database => "database",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Source Descriptor
// ============================================================================

/// Declarative description of a tabular parameter source.
///
/// # Invariants
/// - Immutable once registered against a test method.
/// - `section` selects a named section within `location`; an empty section
///   selects the anonymous whole-file section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Source kind used for registry dispatch.
    pub kind: SourceKind,
    /// Path or identifier of the source.
    pub location: String,
    /// Section (sheet/table) name within the source.
    pub section: String,
    /// Owner or author recorded for reporting.
    pub owner: String,
    /// Human-readable name used in reports.
    pub display_name: String,
}

impl SourceDescriptor {
    /// Creates a descriptor with empty reporting metadata.
    #[must_use]
    pub fn new(kind: SourceKind, location: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
            section: section.into(),
            owner: String::new(),
            display_name: String::new(),
        }
    }

    /// Sets the owner recorded for reporting.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Sets the display name used in reports.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }
}

// ============================================================================
// SECTION: Data Rows
// ============================================================================

/// Errors raised when constructing a data row.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowError {
    /// Row value count does not match the header column count.
    #[error("row {index} has {values} values for {columns} columns")]
    Arity {
        /// Zero-based row index.
        index: usize,
        /// Number of header columns.
        columns: usize,
        /// Number of values in the row.
        values: usize,
    },
    /// Header declares the same column name twice.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),
}

/// One ordered row of raw string values keyed by header column names.
///
/// # Invariants
/// - `columns` and `values` have equal length and positional correspondence.
/// - Column names are unique within the row.
/// - Values are raw strings; type coercion is the invocation's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRow {
    /// Zero-based index of the row within its source section.
    index: usize,
    /// Header column names in source order.
    columns: Vec<String>,
    /// Raw cell values in column order.
    values: Vec<String>,
}

impl DataRow {
    /// Creates a row after validating column/value correspondence.
    ///
    /// # Errors
    ///
    /// Returns [`RowError`] when the value count does not match the column
    /// count or a column name is duplicated.
    pub fn new(index: usize, columns: Vec<String>, values: Vec<String>) -> Result<Self, RowError> {
        if columns.len() != values.len() {
            return Err(RowError::Arity {
                index,
                columns: columns.len(),
                values: values.len(),
            });
        }
        for (position, column) in columns.iter().enumerate() {
            if columns[..position].contains(column) {
                return Err(RowError::DuplicateColumn(column.clone()));
            }
        }
        Ok(Self {
            index,
            columns,
            values,
        })
    }

    /// Returns the zero-based row index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the header column names in source order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the raw value for a column name, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|column| column == name)
            .map(|position| self.values[position].as_str())
    }

    /// Iterates over `(column, value)` pairs in source order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .zip(self.values.iter())
            .map(|(column, value)| (column.as_str(), value.as_str()))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::DataRow;
    use super::RowError;

    #[test]
    fn row_rejects_arity_mismatch() {
        let row = DataRow::new(
            3,
            vec!["first".to_string(), "second".to_string()],
            vec!["12".to_string()],
        );
        assert_eq!(
            row,
            Err(RowError::Arity {
                index: 3,
                columns: 2,
                values: 1,
            })
        );
    }

    #[test]
    fn row_rejects_duplicate_columns() {
        let row = DataRow::new(
            0,
            vec!["first".to_string(), "first".to_string()],
            vec!["1".to_string(), "2".to_string()],
        );
        assert_eq!(row, Err(RowError::DuplicateColumn("first".to_string())));
    }

    #[test]
    fn row_lookup_is_positional() -> Result<(), RowError> {
        let row = DataRow::new(
            0,
            vec!["first".to_string(), "second".to_string()],
            vec!["12".to_string(), "5".to_string()],
        )?;
        assert_eq!(row.get("first"), Some("12"));
        assert_eq!(row.get("second"), Some("5"));
        assert_eq!(row.get("third"), None);
        Ok(())
    }
}
