// crates/tabletest-core/tests/proptest_compare.rs
// ============================================================================
// Module: Comparison Property-Based Tests
// Description: Property tests for assertion equality correctness.
// Purpose: Detect panics and invariants across wide input ranges.
// ============================================================================

//! Property-based tests for structural comparison invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;
use tabletest_core::StepCollector;
use tabletest_core::StepOutcome;
use tabletest_core::runtime::compare::values_equal;

/// Generates arbitrary JSON values up to the given nesting depth.
fn json_value_strategy(max_depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|v| Value::Number(v.into())),
        any::<f64>()
            .prop_filter("finite", |v| v.is_finite())
            .prop_map(|v| { serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number) }),
        ".*".prop_map(Value::String),
    ];

    leaf.prop_recursive(max_depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0 .. 4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0 .. 4).prop_map(|map| {
                let mut object = serde_json::Map::new();
                for (key, value) in map {
                    object.insert(key, value);
                }
                Value::Object(object)
            }),
        ]
    })
}

proptest! {
    #[test]
    fn equality_is_reflexive(value in json_value_strategy(2)) {
        prop_assert!(values_equal(&value, &value));
    }

    #[test]
    fn equality_is_symmetric(left in json_value_strategy(2), right in json_value_strategy(2)) {
        prop_assert_eq!(values_equal(&left, &right), values_equal(&right, &left));
    }

    #[test]
    fn integer_equality_matches_native(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(values_equal(&json!(a), &json!(b)), a == b);
    }

    #[test]
    fn assert_equal_records_exactly_one_event(
        left in json_value_strategy(2),
        right in json_value_strategy(2),
    ) {
        let collector = StepCollector::logical();
        let equal = collector.assert_equal(&left, &right, "property check");
        let events = collector.events();
        prop_assert_eq!(events.len(), 1);
        if equal {
            prop_assert_eq!(events[0].outcome, StepOutcome::Pass);
        } else {
            prop_assert_eq!(events[0].outcome, StepOutcome::Fail);
        }
    }
}
