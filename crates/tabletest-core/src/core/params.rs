// crates/tabletest-core/src/core/params.rs
// ============================================================================
// Module: Tabletest Parameter Store
// Description: Per-invocation parameter scope built from one data row.
// Purpose: Give test bodies read-only access to row values by name.
// Dependencies: crate::core::source, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`ParameterStore`] is built from exactly one [`DataRow`] at the start of
//! an invocation and discarded when the invocation ends. It is read-only for
//! its whole life, and no global or cross-invocation state is reachable
//! through it: concurrent invocations cannot interfere via parameters.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::source::DataRow;

// ============================================================================
// SECTION: Parameter Errors
// ============================================================================

/// Errors raised by parameter lookups.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    /// No parameter with the requested name exists in this invocation scope.
    #[error("parameter not found: {0}")]
    NotFound(String),
    /// Parameter value could not be parsed into the requested type.
    #[error("parameter {name} has unparsable value {value:?}: {reason}")]
    Invalid {
        /// Parameter name.
        name: String,
        /// Raw string value that failed to parse.
        value: String,
        /// Parser failure description.
        reason: String,
    },
}

// ============================================================================
// SECTION: Parameter Store
// ============================================================================

/// Read-only parameter scope for one invocation.
///
/// # Invariants
/// - Built from exactly one data row; never outlives its invocation.
/// - Values are raw strings; typed access parses on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterStore {
    /// Parameter values keyed by column name.
    values: BTreeMap<String, String>,
}

impl ParameterStore {
    /// Builds a store from one data row.
    #[must_use]
    pub fn from_row(row: &DataRow) -> Self {
        let values = row
            .entries()
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        Self {
            values,
        }
    }

    /// Returns the raw value for a parameter name.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::NotFound`] when the name is absent.
    pub fn get(&self, name: &str) -> Result<&str, ParameterError> {
        self.values
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ParameterError::NotFound(name.to_string()))
    }

    /// Returns the raw value for a parameter name or a fallback when absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, name: &str, fallback: &'a str) -> &'a str {
        self.values.get(name).map_or(fallback, String::as_str)
    }

    /// Parses the value for a parameter name into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::NotFound`] when the name is absent and
    /// [`ParameterError::Invalid`] when parsing fails.
    pub fn get_parsed<T>(&self, name: &str) -> Result<T, ParameterError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let raw = self.get(name)?;
        raw.parse().map_err(|err: T::Err| ParameterError::Invalid {
            name: name.to_string(),
            value: raw.to_string(),
            reason: err.to_string(),
        })
    }

    /// Returns the number of parameters in scope.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no parameters are in scope.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::ParameterError;
    use super::ParameterStore;
    use crate::core::source::DataRow;
    use crate::core::source::RowError;

    /// Builds a two-column row fixture.
    fn sample_row() -> Result<DataRow, RowError> {
        DataRow::new(
            0,
            vec!["numberOfCalls".to_string(), "name".to_string()],
            vec!["5".to_string(), "qcxiao".to_string()],
        )
    }

    #[test]
    fn lookup_returns_raw_values() -> Result<(), RowError> {
        let store = ParameterStore::from_row(&sample_row()?);
        assert_eq!(store.get("name"), Ok("qcxiao"));
        assert_eq!(store.get_or("missing", "fallback"), "fallback");
        assert_eq!(
            store.get("missing"),
            Err(ParameterError::NotFound("missing".to_string()))
        );
        Ok(())
    }

    #[test]
    fn typed_lookup_parses_on_demand() -> Result<(), RowError> {
        let store = ParameterStore::from_row(&sample_row()?);
        assert_eq!(store.get_parsed::<u64>("numberOfCalls"), Ok(5));
        let err = store.get_parsed::<u64>("name");
        assert!(matches!(err, Err(ParameterError::Invalid { .. })));
        Ok(())
    }
}
