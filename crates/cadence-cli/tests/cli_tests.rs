use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

fn cadence_cmd(db_arg: &str) -> Command {
    let mut cmd = Command::cargo_bin("cadence").expect("Failed to find cadence binary");
    cmd.args(["--database-file", db_arg]);
    cmd
}

const WEEK_ITEMS: &str = r#"[
    {"for_date": "2025-03-03", "kind": "meal", "payload": {"calories": 600}},
    {"for_date": "2025-03-04", "kind": "workout", "payload": {"sets": 3}}
]"#;

#[test]
fn test_cli_status_of_empty_window() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    cadence_cmd(db_path.to_str().unwrap())
        .args(["status", "1", "2025-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending"))
        .stdout(predicate::str::contains("0 item(s)"));
}

#[test]
fn test_cli_overwrite_then_status_and_list() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    cadence_cmd(db_arg)
        .args(["overwrite", "1", "2025-03-03", "--items", WEEK_ITEMS])
        .assert()
        .success()
        .stdout(predicate::str::contains("Staged 2 draft item(s)"));

    cadence_cmd(db_arg)
        .args(["status", "1", "2025-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not Approved"))
        .stdout(predicate::str::contains("2 item(s)"));

    cadence_cmd(db_arg)
        .args(["list", "1", "2025-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday"))
        .stdout(predicate::str::contains("meal"))
        .stdout(predicate::str::contains("workout"));
}

#[test]
fn test_cli_publish_flow() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    cadence_cmd(db_arg)
        .args(["overwrite", "1", "2025-03-03", "--items", WEEK_ITEMS])
        .assert()
        .success();

    cadence_cmd(db_arg)
        .args(["publish", "1", "2025-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Published 2 item(s)"));

    cadence_cmd(db_arg)
        .args(["status", "1", "2025-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Approved"));

    cadence_cmd(db_arg)
        .args(["list", "1", "2025-03-03", "--published"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] meal"));
}

#[test]
fn test_cli_publish_empty_window_fails() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    cadence_cmd(db_path.to_str().unwrap())
        .args(["publish", "1", "2025-03-03"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no draft items to publish"));
}

#[test]
fn test_cli_monthly_status_breakdown() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    cadence_cmd(db_arg)
        .args(["overwrite", "1", "2025-03-03", "--items", WEEK_ITEMS])
        .assert()
        .success();

    cadence_cmd(db_arg)
        .args(["status", "1", "2025-03-03", "--monthly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Month:"))
        .stdout(predicate::str::contains("Week 4"));
}

#[test]
fn test_cli_discard() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    cadence_cmd(db_arg)
        .args(["overwrite", "1", "2025-03-03", "--items", WEEK_ITEMS])
        .assert()
        .success();

    cadence_cmd(db_arg)
        .args(["discard", "1", "2025-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Discarded 2 draft item(s)"));

    cadence_cmd(db_arg)
        .args(["list", "1", "2025-03-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan items found."));
}

#[test]
fn test_cli_align() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let db_arg = db_path.to_str().unwrap();

    // 2025-03-04 is a Tuesday; the next Sunday is 2025-03-09.
    cadence_cmd(db_arg)
        .args(["align", "2025-03-04", "sunday"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03-09"));

    cadence_cmd(db_arg)
        .args(["align", "2025-03-03", "monday"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already falls on Monday"));
}

#[test]
fn test_cli_rejects_invalid_date() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    cadence_cmd(db_path.to_str().unwrap())
        .args(["status", "1", "not-a-date"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid date"));
}

#[test]
fn test_cli_queue_list_empty() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    cadence_cmd(db_path.to_str().unwrap())
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending operations."));
}

#[test]
fn test_cli_queue_clear_empty() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    cadence_cmd(db_path.to_str().unwrap())
        .args(["queue", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dropped 0 pending operation(s)"));
}
