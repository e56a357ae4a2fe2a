// crates/tabletest-sources/tests/tabular_file_unit.rs
// ============================================================================
// Module: Tabular File Source Tests
// Description: File-backed resolution tests for the tabular source.
// Purpose: Validate fail-closed descriptor resolution against real files.
// ============================================================================

//! File-backed tests for tabular source resolution.

#![allow(
    clippy::panic,
    clippy::use_debug,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::path::Path;

use tabletest_core::RowSource;
use tabletest_core::SourceDescriptor;
use tabletest_core::SourceError;
use tabletest_core::SourceKind;
use tabletest_sources::TabularFileSource;
use tabletest_sources::TabularFileSourceConfig;

/// Builds a descriptor for a file path and section name.
fn descriptor(path: &Path, section: &str) -> SourceDescriptor {
    SourceDescriptor::new(SourceKind::TabularFile, path.to_string_lossy(), section)
        .with_owner("albedo")
        .with_display_name("lib.SafeMathMock")
}

#[test]
fn resolves_sectioned_workbook_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("test.tbl");
    fs::write(
        &path,
        "[sub]\nfirst, second\n12, 5\n3, 9\n\n[calls]\nnumberOfCalls\n5\n",
    )?;

    let source = TabularFileSource::default();
    let rows = source.rows(&descriptor(&path, "sub"))?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("first"), Some("12"));
    assert_eq!(rows[1].get("second"), Some("9"));

    let calls = source.rows(&descriptor(&path, "calls"))?;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].get("numberOfCalls"), Some("5"));
    Ok(())
}

#[test]
fn missing_file_is_fatal_with_zero_rows() {
    let source = TabularFileSource::default();
    let descriptor =
        SourceDescriptor::new(SourceKind::TabularFile, "/nonexistent/test.tbl", "sub");
    let err = source.rows(&descriptor);
    assert!(matches!(err, Err(SourceError::Unreadable { .. })));
}

#[test]
fn oversized_file_is_refused() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("big.tbl");
    fs::write(&path, "first, second\n12, 5\n")?;

    let source = TabularFileSource::new(TabularFileSourceConfig {
        max_bytes: 4,
    });
    let err = source.rows(&descriptor(&path, ""));
    assert!(matches!(err, Err(SourceError::TooLarge { .. })));
    Ok(())
}

#[test]
fn missing_section_reports_location_and_name() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("test.tbl");
    fs::write(&path, "[sub]\nfirst\n1\n")?;

    let source = TabularFileSource::default();
    let err = source.rows(&descriptor(&path, "average"));
    match err {
        Err(SourceError::MissingSection {
            location,
            section,
        }) => {
            assert!(location.ends_with("test.tbl"));
            assert_eq!(section, "average");
        }
        other => panic!("expected missing section, got {:?}", other.map(|rows| rows.len())),
    }
    Ok(())
}
