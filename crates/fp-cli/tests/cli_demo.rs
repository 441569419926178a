//! End-to-end tests for the `fp` binary.

#![allow(deprecated)] // Command::cargo_bin: macro replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fp() -> Command {
    Command::cargo_bin("fp").unwrap()
}

// ---------- demo ----------

#[test]
fn demo_accept_spends_a_point_and_rerolls() {
    fp().args(["demo", "--seed", "7"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("after two pip clicks: [##-] 2/3")
                .and(predicate::str::contains("Alice spent a Friend Point"))
                .and(predicate::str::contains("The die was rerolled"))
                .and(predicate::str::contains("Kael's pool now: [#--] 1/3")),
        );
}

#[test]
fn demo_decline_leaves_the_pool_alone() {
    fp().args(["demo", "--answer", "decline"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Alice declined to spend a Friend Point")
                .and(predicate::str::contains("Kael's pool now: [##-] 2/3"))
                .and(predicate::str::contains("was rerolled").not()),
        );
}

#[test]
fn demo_ignore_times_out_as_a_decline() {
    fp().args(["demo", "--answer", "ignore", "--timeout-secs", "1"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Could not reach Alice")
                .and(predicate::str::contains("Kael's pool now: [##-] 2/3")),
        );
}

#[test]
fn demo_same_seed_prints_the_same_story() {
    let first = fp().args(["demo", "--seed", "9"]).assert().success();
    let second = fp().args(["demo", "--seed", "9"]).assert().success();
    assert_eq!(first.get_output().stdout, second.get_output().stdout);
}

#[test]
fn demo_writes_a_json_transcript() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("transcript.json");

    fp().args(["demo", "--transcript"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Event transcript written to"));

    let text = std::fs::read_to_string(&path).unwrap();
    let events: serde_json::Value = serde_json::from_str(&text).unwrap();
    let events = events.as_array().expect("transcript should be a JSON array");
    assert!(!events.is_empty());
    // The accepted flow both writes the spent flag and deletes the
    // original message.
    assert!(events.iter().any(|e| e["event"] == "flag_written"));
    assert!(events.iter().any(|e| e["event"] == "message_deleted"));
}

// ---------- pips ----------

#[test]
fn pips_renders_a_row_with_the_default_cap() {
    fp().args(["pips", "--value", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[##-] 2/3"));
}

#[test]
fn pips_renders_an_empty_pool() {
    fp().args(["pips", "--value", "0", "--max", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[-----] 0/5"));
}

#[test]
fn pips_rejects_a_value_over_the_cap() {
    fp().args(["pips", "--value", "5", "--max", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds"));
}
