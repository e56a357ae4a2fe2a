// crates/tabletest-sources/src/tabular.rs
// ============================================================================
// Module: Tabular File Source
// Description: Sectioned delimited text files as parameter row sources.
// Purpose: Resolve file-backed descriptors into ordered data rows.
// Dependencies: tabletest-core
// ============================================================================

//! ## Overview
//! [`TabularFileSource`] reads sectioned delimited text files, the on-disk
//! analog of a spreadsheet workbook: a `[section]` heading line opens a
//! named section, the first non-empty line of a section is the
//! comma-separated header, and every following line is one data row. A file
//! without section headings is a single anonymous section selected by an
//! empty section name.
//!
//! Resolution fails closed: a missing file, missing section, missing
//! header, duplicate column, or malformed row aborts the whole call with
//! zero rows.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use tabletest_core::DataRow;
use tabletest_core::RowSource;
use tabletest_core::SourceDescriptor;
use tabletest_core::SourceError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum bytes a tabular source file may occupy.
pub const MAX_SOURCE_BYTES: usize = 4 * 1024 * 1024;

/// Cell delimiter within header and data rows.
const DELIMITER: char = ',';

/// Prefix marking a comment line.
const COMMENT_PREFIX: char = '#';

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the tabular file source.
///
/// # Invariants
/// - `max_bytes` is enforced as a hard upper bound before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularFileSourceConfig {
    /// Maximum bytes allowed for one source file.
    pub max_bytes: usize,
}

impl Default for TabularFileSourceConfig {
    fn default() -> Self {
        Self {
            max_bytes: MAX_SOURCE_BYTES,
        }
    }
}

// ============================================================================
// SECTION: Source Implementation
// ============================================================================

/// Row source for sectioned delimited text files.
///
/// # Invariants
/// - Natural row order of the file is preserved.
/// - Values are raw strings with surrounding whitespace trimmed; type
///   coercion is the invocation's concern.
#[derive(Debug, Clone, Default)]
pub struct TabularFileSource {
    /// Source configuration, including the size limit.
    config: TabularFileSourceConfig,
}

impl TabularFileSource {
    /// Creates a new tabular file source with the given configuration.
    #[must_use]
    pub const fn new(config: TabularFileSourceConfig) -> Self {
        Self {
            config,
        }
    }

    /// Reads and size-checks the source file.
    fn read_file(&self, location: &str) -> Result<String, SourceError> {
        let path = Path::new(location);
        let metadata = fs::metadata(path).map_err(|err| SourceError::Unreadable {
            location: location.to_string(),
            detail: err.to_string(),
        })?;
        let actual_bytes = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if actual_bytes > self.config.max_bytes {
            return Err(SourceError::TooLarge {
                location: location.to_string(),
                max_bytes: self.config.max_bytes,
                actual_bytes,
            });
        }
        fs::read_to_string(path).map_err(|err| SourceError::Unreadable {
            location: location.to_string(),
            detail: err.to_string(),
        })
    }
}

impl RowSource for TabularFileSource {
    fn rows(&self, descriptor: &SourceDescriptor) -> Result<Vec<DataRow>, SourceError> {
        let contents = self.read_file(&descriptor.location)?;
        let section = select_section(&contents, &descriptor.location, &descriptor.section)?;
        parse_section(&section, &descriptor.location, &descriptor.section)
    }
}

// ============================================================================
// SECTION: Section Selection
// ============================================================================

/// Extracts the lines of the requested section.
fn select_section(
    contents: &str,
    location: &str,
    section: &str,
) -> Result<Vec<String>, SourceError> {
    let mut current: Option<String> = None;
    let mut selected: Option<Vec<String>> = None;
    let mut has_headings = false;

    for line in contents.lines() {
        let trimmed = line.trim();
        if let Some(name) = heading_name(trimmed) {
            has_headings = true;
            if current.as_deref() == Some(section) {
                break;
            }
            current = Some(name.to_string());
            if name == section {
                selected = Some(Vec::new());
            }
            continue;
        }
        if let Some(lines) = selected.as_mut()
            && current.as_deref() == Some(section)
        {
            lines.push(line.to_string());
        }
    }

    if !has_headings {
        if section.is_empty() {
            return Ok(contents.lines().map(ToString::to_string).collect());
        }
        return Err(SourceError::MissingSection {
            location: location.to_string(),
            section: section.to_string(),
        });
    }

    selected.ok_or_else(|| SourceError::MissingSection {
        location: location.to_string(),
        section: section.to_string(),
    })
}

/// Returns the section name when the line is a `[name]` heading.
fn heading_name(line: &str) -> Option<&str> {
    line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')).map(str::trim)
}

// ============================================================================
// SECTION: Section Parsing
// ============================================================================

/// Parses a section's lines into header-keyed data rows.
fn parse_section(
    lines: &[String],
    location: &str,
    section: &str,
) -> Result<Vec<DataRow>, SourceError> {
    let mut meaningful = lines.iter().map(String::as_str).filter(|line| {
        let trimmed = line.trim();
        !trimmed.is_empty() && !trimmed.starts_with(COMMENT_PREFIX)
    });

    let header_line = meaningful.next().ok_or_else(|| SourceError::MissingHeader {
        location: location.to_string(),
        section: section.to_string(),
    })?;
    let columns = split_cells(header_line);

    let mut rows = Vec::new();
    for (index, line) in meaningful.enumerate() {
        let values = split_cells(line);
        rows.push(DataRow::new(index, columns.clone(), values)?);
    }
    Ok(rows)
}

/// Splits one line into trimmed cells.
fn split_cells(line: &str) -> Vec<String> {
    line.split(DELIMITER).map(|cell| cell.trim().to_string()).collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use tabletest_core::SourceError;

    use super::parse_section;
    use super::select_section;

    /// Sample workbook-style file contents with two sections.
    const SAMPLE: &str = "\
[max]
first, second
12, 5
3, 9

[min]
first, second
1, 2
";

    #[test]
    fn named_section_is_selected_and_parsed() -> Result<(), SourceError> {
        let lines = select_section(SAMPLE, "test.tbl", "max")?;
        let rows = parse_section(&lines, "test.tbl", "max")?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("first"), Some("12"));
        assert_eq!(rows[0].get("second"), Some("5"));
        assert_eq!(rows[1].index(), 1);
        assert_eq!(rows[1].get("first"), Some("3"));
        Ok(())
    }

    #[test]
    fn missing_section_is_fatal() {
        let err = select_section(SAMPLE, "test.tbl", "average");
        assert!(matches!(err, Err(SourceError::MissingSection { .. })));
    }

    #[test]
    fn anonymous_file_requires_empty_section_name() {
        let contents = "first, second\n1, 2\n";
        assert!(select_section(contents, "flat.tbl", "").is_ok());
        let err = select_section(contents, "flat.tbl", "max");
        assert!(matches!(err, Err(SourceError::MissingSection { .. })));
    }

    #[test]
    fn header_only_section_yields_zero_rows() -> Result<(), SourceError> {
        let lines = vec!["first, second".to_string()];
        let rows = parse_section(&lines, "test.tbl", "max")?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[test]
    fn empty_section_is_missing_header() {
        let err = parse_section(&[], "test.tbl", "max");
        assert!(matches!(err, Err(SourceError::MissingHeader { .. })));
    }

    #[test]
    fn short_row_is_fatal() {
        let lines = vec!["first, second".to_string(), "only".to_string()];
        let err = parse_section(&lines, "test.tbl", "max");
        assert!(matches!(err, Err(SourceError::Row(_))));
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() -> Result<(), SourceError> {
        let lines = vec![
            "# driven by the autotest workbook".to_string(),
            String::new(),
            "first, second".to_string(),
            "12, 5".to_string(),
        ];
        let rows = parse_section(&lines, "test.tbl", "")?;
        assert_eq!(rows.len(), 1);
        Ok(())
    }
}
