//! Integration tests for tallybox CLI
//!
//! These tests simulate real workflows: demo markup feeding inspect, and
//! scenario replay over generated page files.


use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper function to create a tallybox command
fn tallybox() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("tallybox"))
}

/// Helper to write a generated demo page into the temp dir
fn write_demo_page(dir: &Path, records: usize) -> std::path::PathBuf {
    let output = tallybox()
        .args(["demo", "--records", &records.to_string(), "--full-page"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let page = dir.join("history.html");
    fs::write(&page, &output.stdout).unwrap();
    page
}

// =============================================================================
// END-TO-END WORKFLOW TESTS
// =============================================================================

/// Test complete workflow: demo → page file → inspect
#[test]
fn test_e2e_demo_feeds_inspect() {
    let temp = TempDir::new().unwrap();

    // Step 1: Generate a history page with four records
    let page = write_demo_page(temp.path(), 4);

    // Step 2: Inspect it; nothing is selected yet
    tallybox()
        .arg("inspect")
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("found"))
        .stdout(predicate::str::contains("4 (0 selected)"))
        .stdout(predicate::str::contains("present"))
        .stdout(predicate::str::contains("Ни одной записи не выбрано."));
}

/// Test complete workflow: demo → page file → scenario replay over it
#[test]
fn test_e2e_scenario_over_generated_page() {
    let temp = TempDir::new().unwrap();

    // Step 1: Generate the page
    write_demo_page(temp.path(), 2);

    // Step 2: Write a scenario that selects everything through select-all
    let scenario = temp.path().join("replay.toml");
    fs::write(
        &scenario,
        r##"
[page]
file = "history.html"

[[steps]]
action = "click"
target = "#select_all_logs"

[[steps]]
action = "expect_count"
text = "Выбрано 2 записей для включения в ТЗ."

[[steps]]
action = "uncheck"
target = "input[value=1]"

[[steps]]
action = "expect_count"
text = "Выбрана 1 запись для включения в ТЗ."
"##,
    )
    .unwrap();

    // Step 3: Replay it; the page file resolves against the scenario's dir
    tallybox()
        .arg("run")
        .arg(&scenario)
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED (4/4 steps)"));
}

/// Test that a failing replay reports the mismatch and exits non-zero
#[test]
fn test_e2e_failing_replay_reports_the_mismatch() {
    let temp = TempDir::new().unwrap();
    let scenario = temp.path().join("replay.toml");
    fs::write(
        &scenario,
        r#"
[page]
records = 3

[[steps]]
action = "check"
target = "input[value=1]"

[[steps]]
action = "expect_count"
text = "Выбрано 3 записей для включения в ТЗ."
"#,
    )
    .unwrap();

    tallybox()
        .arg("run")
        .arg(&scenario)
        .assert()
        .failure()
        .stdout(predicate::str::contains("FAIL"))
        .stdout(predicate::str::contains("got \"Выбрана 1 запись для включения в ТЗ.\""))
        .stdout(predicate::str::contains("FAILED (1/2 steps)"));
}

// =============================================================================
// JSON PIPELINE TESTS
// =============================================================================

/// Test that the JSON run report is machine-readable end to end
#[test]
fn test_json_run_report_parses() {
    let temp = TempDir::new().unwrap();
    let scenario = temp.path().join("replay.toml");
    fs::write(
        &scenario,
        r##"
[page]
records = 3

[[steps]]
action = "click"
target = "#select_all_logs"

[[steps]]
action = "expect_count"
text = "Выбрано 3 записей для включения в ТЗ."
"##,
    )
    .unwrap();

    let output = tallybox().args(["--json", "run"]).arg(&scenario).output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["passed"], serde_json::json!(true));
    assert_eq!(report["form_found"], serde_json::json!(true));
    assert_eq!(report["checkboxes"], serde_json::json!(3));
    assert_eq!(report["selected"], serde_json::json!(3));
    assert_eq!(report["steps"].as_array().unwrap().len(), 2);
    assert_eq!(
        report["counter_text"],
        serde_json::json!("Выбрано 3 записей для включения в ТЗ.")
    );
}

/// Test that the JSON inspect report round-trips through a generated page
#[test]
fn test_json_inspect_report_parses() {
    let temp = TempDir::new().unwrap();
    let page = write_demo_page(temp.path(), 5);

    let output = tallybox().args(["--json", "inspect"]).arg(&page).output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["form_found"], serde_json::json!(true));
    assert_eq!(report["checkboxes"], serde_json::json!(5));
    assert_eq!(report["selected"], serde_json::json!(0));
    assert_eq!(report["select_all"], serde_json::json!(true));
}
