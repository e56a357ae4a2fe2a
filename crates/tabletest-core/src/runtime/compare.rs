// crates/tabletest-core/src/runtime/compare.rs
// ============================================================================
// Module: Tabletest Comparison Logic
// Description: Structural, decimal-aware equality for assertion values.
// Purpose: Compare actual and expected values by meaning, not representation.
// Dependencies: bigdecimal, serde_json
// ============================================================================

//! ## Overview
//! Assertion equality compares values structurally: numbers by decimal
//! value (so `25`, `25.0`, and `2.5e1` are equal), sequences and objects
//! element-wise, strings exactly. Numeric comparison is decimal-aware and
//! deterministic; values that cannot be interpreted as decimals fall back
//! to raw JSON equality.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Number;
use serde_json::Value;

// ============================================================================
// SECTION: Structural Equality
// ============================================================================

/// Compares two values structurally with decimal-aware numeric handling.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left_num), Value::Number(right_num)) => {
            numbers_equal(left_num, right_num)
        }
        (Value::Array(left_items), Value::Array(right_items)) => {
            left_items.len() == right_items.len()
                && left_items
                    .iter()
                    .zip(right_items.iter())
                    .all(|(left_item, right_item)| values_equal(left_item, right_item))
        }
        (Value::Object(left_map), Value::Object(right_map)) => {
            left_map.len() == right_map.len()
                && left_map.iter().all(|(key, left_value)| {
                    right_map
                        .get(key)
                        .is_some_and(|right_value| values_equal(left_value, right_value))
                })
        }
        _ => left == right,
    }
}

/// Compares numbers by decimal value, falling back to raw equality.
fn numbers_equal(left: &Number, right: &Number) -> bool {
    match (decimal_from_number(left), decimal_from_number(right)) {
        (Some(left_dec), Some(right_dec)) => left_dec == right_dec,
        _ => left == right,
    }
}

/// Parses a JSON number into `BigDecimal` with a stable string representation.
fn decimal_from_number(number: &Number) -> Option<BigDecimal> {
    let rendered = number.to_string();
    BigDecimal::from_str(&rendered).ok()
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a value for embedding in assertion messages.
///
/// Strings render without surrounding quotes so messages read naturally;
/// everything else renders as compact JSON.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
