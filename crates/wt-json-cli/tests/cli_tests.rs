//! Integration tests for the `wtjson` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the build and
//! extract subcommands through the actual binary, including stdin/stdout
//! piping, file I/O, truncation, and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use wt_json::Set;

/// Helper: path to the exercises.json fixture.
fn exercises_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/exercises.json")
}

/// Helper: path to the workout.json fixture.
fn workout_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/workout.json")
}

fn wtjson() -> Command {
    Command::cargo_bin("wtjson").unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Build subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn build_stdin_to_stdout() {
    wtjson()
        .arg("build")
        .write_stdin(r#"[{"id":1,"name":"Squat","muscle_group":"legs"}]"#)
        .assert()
        .success()
        .stdout(r#"[{"id":1,"name":"Squat","body_part":"legs"}]"#);
}

#[test]
fn build_file_maps_store_records() {
    let output = wtjson()
        .args(["build", "-i", exercises_path()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[0]["body_part"], "quadriceps");
    assert_eq!(items[2]["body_part"], "");
    assert_eq!(items[3]["body_part"], "hamstrings");
}

#[test]
fn build_empty_list() {
    wtjson()
        .arg("build")
        .write_stdin("[]")
        .assert()
        .success()
        .stdout("[]");
}

#[test]
fn build_truncates_to_sink_capacity() {
    wtjson()
        .args(["build", "-i", exercises_path(), "--sink-capacity", "20"])
        .assert()
        .success()
        .stdout(r#"[{"id":1,"name":"Bar"#)
        .stderr(predicate::str::contains("output truncated"));
}

#[test]
fn build_writes_output_file() {
    let dir = std::env::temp_dir().join(format!("wtjson-build-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("exercises.out.json");

    wtjson()
        .args(["build", "-i", exercises_path(), "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout("");

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.starts_with(r#"[{"id":1,"#));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn build_rejects_invalid_records() {
    wtjson()
        .arg("build")
        .write_stdin(r#"[{"name":"no id"}]"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read exercise records"));
}

#[test]
fn build_missing_input_file_fails() {
    wtjson()
        .args(["build", "-i", "/nonexistent/exercises.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Extract subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn extract_file_skips_invalid_set() {
    let output = wtjson()
        .args(["extract", "--user-id", "1", "-i", workout_path()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["workout_exercise_id"], 7);
    assert_eq!(rows[1]["weight"], 52.5);
    assert_eq!(rows[3]["set_number"], 2);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("skipping invalid item"));
}

#[test]
fn extract_stdin_example() {
    let doc = r#"{"user_id":1,"exercises":[{"exercise_id":7,"sets":[{"reps":10,"weight":50},{"reps":8,"weight":52.5}]}]}"#;
    let output = wtjson()
        .args(["extract", "--user-id", "1"])
        .write_stdin(doc)
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: Vec<Set> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        rows,
        vec![
            Set {
                workout_exercise_id: 7,
                set_number: 0,
                weight: 50.0,
                reps: 10,
            },
            Set {
                workout_exercise_id: 7,
                set_number: 1,
                weight: 52.5,
                reps: 8,
            },
        ]
    );
}

#[test]
fn extract_strict_fails_on_invalid_set() {
    wtjson()
        .args(["extract", "--user-id", "1", "--strict", "-i", workout_path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to extract sets"))
        .stderr(predicate::str::contains("exercises[1].sets[1]"));
}

#[test]
fn extract_missing_user_id_fails() {
    wtjson()
        .args(["extract", "--user-id", "1"])
        .write_stdin(r#"{"exercises":[]}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing field `user_id`"));
}

#[test]
fn extract_capacity_exceeded_fails() {
    wtjson()
        .args(["extract", "--user-id", "1", "--capacity", "2", "-i", workout_path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("capacity 2"));
}

#[test]
fn extract_user_mismatch_fails_when_required() {
    wtjson()
        .args([
            "extract",
            "--user-id",
            "2",
            "--require-user-match",
            "-i",
            workout_path(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match"));
}

#[test]
fn extract_requires_user_id_flag() {
    wtjson()
        .arg("extract")
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--user-id"));
}

#[test]
fn extract_malformed_document_fails() {
    wtjson()
        .args(["extract", "--user-id", "1"])
        .write_stdin(r#"{"user_id":1,"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed JSON document"));
}
