// crates/tabletest-runner/tests/suite_scenarios.rs
// ============================================================================
// Module: Suite Scenario Tests
// Description: End-to-end suite runs over inline tables and scripted calls.
// Purpose: Validate row isolation, assertion recording, and determinism.
// ============================================================================

//! End-to-end suite scenarios over inline data and a scripted collaborator.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;

use serde_json::json;

use tabletest_core::CallDescriptor;
use tabletest_core::MethodId;
use tabletest_core::SourceDescriptor;
use tabletest_core::SourceKind;
use tabletest_core::StepOutcome;
use tabletest_core::Verdict;
use tabletest_runner::InvocationRunner;
use tabletest_runner::Registration;
use tabletest_runner::ScriptedCollaborator;
use tabletest_runner::Suite;
use tabletest_runner::SuiteConfig;
use tabletest_runner::persisted_entries;
use tabletest_sources::InlineSource;

/// Inline table for a subtraction method: one in-range row, one underflow row.
fn subtraction_source() -> InlineSource {
    InlineSource::new().with_table(
        "sub",
        "cases",
        vec!["first", "second", "expectUnderflow"],
        vec![vec!["12", "5", "false"], vec!["3", "9", "true"]],
    )
}

/// Collaborator scripted with both subtraction outcomes and a name lookup.
fn scripted_collaborator() -> ScriptedCollaborator {
    ScriptedCollaborator::new()
        .with_reply("sub", "run", vec![json!(12), json!(5)], json!(7))
        .with_failure("sub", "run", vec![json!(3), json!(9)], "underflow")
        .with_reply("guess", "getName", vec![], json!("qcxiao"))
}

/// Registers the subtraction method whose body branches on the row's
/// declared underflow expectation.
fn register_subtraction(suite: &mut Suite) -> Result<(), tabletest_runner::SuiteError> {
    suite.register(Registration::new(
        MethodId::new("sub.run"),
        SourceDescriptor::new(SourceKind::Inline, "sub", "cases")
            .with_display_name("lib.SafeMathMock"),
        Arc::new(|ctx| {
            Box::pin(async move {
                let first: i64 = ctx.params.get_parsed("first")?;
                let second: i64 = ctx.params.get_parsed("second")?;
                let expect_underflow: bool = ctx.params.get_parsed("expectUnderflow")?;
                let call = CallDescriptor::new("sub", "run", vec![json!(first), json!(second)]);
                match ctx.collaborator.invoke(&call).await {
                    Ok(value) => {
                        if expect_underflow {
                            ctx.collector.fail(
                                "underflow",
                                "subtraction succeeded where the row declares underflow",
                                "",
                            );
                        } else {
                            ctx.collector.assert_equal(&value, &json!(first - second), "difference");
                        }
                    }
                    Err(err) => {
                        if expect_underflow {
                            ctx.collector.pass("underflow", format!("failed as declared: {err}"));
                        } else {
                            ctx.collector.fail("underflow", "subtraction failed", err.to_string());
                        }
                    }
                }
                Ok(())
            })
        }),
    ))
}

#[tokio::test]
async fn opposite_row_paths_both_pass() -> Result<(), tabletest_runner::SuiteError> {
    let mut suite = Suite::new(
        Arc::new(subtraction_source()),
        InvocationRunner::new(Arc::new(scripted_collaborator())),
    );
    register_subtraction(&mut suite)?;

    let report = suite.run(&SuiteConfig::default()).await?;
    assert_eq!(report.results.len(), 2);
    assert_eq!(report.verdict(), Verdict::Pass);

    // Row 0 passes through the assertion path; row 1 through the declared
    // failure path.
    assert_eq!(report.results[0].events[0].label, "assert");
    assert_eq!(report.results[1].events[0].label, "underflow");
    assert!(report.results[1].events[0].message.contains("underflow"));
    Ok(())
}

#[tokio::test]
async fn parity_mismatch_records_both_rendered_values(
) -> Result<(), tabletest_runner::SuiteError> {
    let source = InlineSource::new().with_table(
        "guess",
        "cases",
        vec!["numberOfCalls"],
        vec![vec!["4"], vec!["5"]],
    );
    let mut suite = Suite::new(
        Arc::new(source),
        InvocationRunner::new(Arc::new(scripted_collaborator())),
    );
    suite.register(Registration::new(
        MethodId::new("guess.getName"),
        SourceDescriptor::new(SourceKind::Inline, "guess", "cases")
            .with_display_name("function.GetNameTest"),
        Arc::new(|ctx| {
            Box::pin(async move {
                // Odd call counts expect the lowercase name, even counts
                // the uppercase one.
                let calls: u64 = ctx.params.get_parsed("numberOfCalls")?;
                let expected = if calls % 2 == 1 { "qcxiao" } else { "QCXIAO" };
                let call = CallDescriptor::new("guess", "getName", vec![]);
                let value = ctx.collaborator.invoke(&call).await?;
                ctx.collector.assert_equal(&value, &expected.to_string(), "name check");
                Ok(())
            })
        }),
    ))?;

    let report = suite.run(&SuiteConfig::default()).await?;
    assert_eq!(report.results.len(), 2);

    // Row 0 (even) mismatches and its failure message carries both strings;
    // row 1 (odd) still runs and passes despite row 0's failure.
    assert_eq!(report.results[0].verdict, Verdict::Fail);
    assert!(report.results[0].events[0].message.contains("qcxiao"));
    assert!(report.results[0].events[0].message.contains("QCXIAO"));
    assert_eq!(report.results[1].verdict, Verdict::Pass);
    assert_eq!(report.verdict(), Verdict::Fail);
    Ok(())
}

#[tokio::test]
async fn parameters_never_bleed_across_rows() -> Result<(), tabletest_runner::SuiteError> {
    let source = InlineSource::new().with_table(
        "sub",
        "cases",
        vec!["first"],
        vec![vec!["1"], vec!["2"], vec!["3"]],
    );
    let mut suite = Suite::new(
        Arc::new(source),
        InvocationRunner::new(Arc::new(ScriptedCollaborator::new())),
    );
    suite.register(Registration::new(
        MethodId::new("echo.first"),
        SourceDescriptor::new(SourceKind::Inline, "sub", "cases"),
        Arc::new(|ctx| {
            Box::pin(async move {
                let first = ctx.params.get("first")?.to_string();
                ctx.collector.pass("param", first);
                Ok(())
            })
        }),
    ))?;

    let config = SuiteConfig {
        concurrency: 3,
        deadline: None,
    };
    let report = suite.run(&config).await?;
    let seen: Vec<&str> = report
        .results
        .iter()
        .map(|result| result.events[0].message.as_str())
        .collect();
    assert_eq!(seen, vec!["1", "2", "3"]);
    Ok(())
}

#[tokio::test]
async fn reruns_produce_identical_persisted_entries() -> Result<(), tabletest_runner::SuiteError> {
    let mut suite = Suite::new(
        Arc::new(subtraction_source()),
        InvocationRunner::new(Arc::new(scripted_collaborator())),
    );
    register_subtraction(&mut suite)?;

    let config = SuiteConfig {
        concurrency: 4,
        deadline: None,
    };
    let first = suite.run(&config).await?;
    let second = suite.run(&config).await?;
    assert_eq!(persisted_entries(&first), persisted_entries(&second));
    assert_eq!(first.counts, second.counts);
    Ok(())
}

#[tokio::test]
async fn multi_assertion_body_continues_past_a_failure(
) -> Result<(), tabletest_runner::SuiteError> {
    let source = InlineSource::new().with_table("sub", "cases", vec!["first"], vec![vec!["1"]]);
    let mut suite = Suite::new(
        Arc::new(source),
        InvocationRunner::new(Arc::new(ScriptedCollaborator::new())),
    );
    suite.register(Registration::new(
        MethodId::new("multi.assert"),
        SourceDescriptor::new(SourceKind::Inline, "sub", "cases"),
        Arc::new(|ctx| {
            Box::pin(async move {
                ctx.collector.assert_equal(&json!(1), &json!(2), "first check");
                ctx.collector.assert_equal(&json!(3), &json!(3), "second check");
                ctx.collector.info("note", "ran to completion");
                Ok(())
            })
        }),
    ))?;

    let report = suite.run(&SuiteConfig::default()).await?;
    let result = &report.results[0];
    assert_eq!(result.verdict, Verdict::Fail);
    assert_eq!(result.events.len(), 3);
    assert_eq!(result.events[0].outcome, StepOutcome::Fail);
    assert_eq!(result.events[1].outcome, StepOutcome::Pass);
    assert_eq!(result.events[2].outcome, StepOutcome::Info);
    report.verify_counts()?;
    Ok(())
}
