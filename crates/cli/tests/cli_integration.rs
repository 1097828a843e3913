//! CLI integration tests for all implemented subcommands.
//!
//! Uses `assert_cmd` to spawn the `phasegate` binary and verify
//! exit codes, stdout content, and stderr content.
//!
//! All tests set `current_dir` to the workspace root so that relative
//! paths to the `conformance/cli` fixtures resolve correctly.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Helper: create a Command for the `phasegate` binary, rooted at workspace.
fn phasegate() -> Command {
    let mut cmd = cargo_bin_cmd!("phasegate");
    cmd.current_dir(workspace_root());
    cmd.env_remove("PHASEGATE_LOG");
    cmd
}

fn parse_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    phasegate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Phase transition validation for deal-flow pipelines",
        ));
}

#[test]
fn version_exits_0() {
    phasegate()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("phasegate"));
}

// ──────────────────────────────────────────────
// 2. Check subcommand
// ──────────────────────────────────────────────

#[test]
fn check_blank_notes_denied_exits_2() {
    phasegate()
        .args([
            "check",
            "--rules",
            "conformance/cli/rules.json",
            "--track",
            "conformance/cli/track_blank.json",
            "--from",
            "analysis",
            "--to",
            "proposal",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("denied: analysis -> proposal"))
        .stdout(predicate::str::contains("Fill in notes before proposal"))
        .stdout(predicate::str::contains("Track notes is filled"));
}

#[test]
fn check_filled_notes_allowed_exits_0() {
    phasegate()
        .args([
            "check",
            "--rules",
            "conformance/cli/rules.json",
            "--track",
            "conformance/cli/track_filled.json",
            "--from",
            "nda",
            "--to",
            "proposal",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("allowed: nda -> proposal"));
}

#[test]
fn check_or_rule_with_deal_document() {
    // deal volume is 0 but the track probability is 50
    phasegate()
        .args([
            "check",
            "--rules",
            "conformance/cli/rules.json",
            "--track",
            "conformance/cli/track_filled.json",
            "--deal",
            "conformance/cli/deal.json",
            "--from",
            "proposal",
            "--to",
            "negotiation",
        ])
        .assert()
        .success();
}

#[test]
fn check_json_output_lists_failed_conditions() {
    let output = phasegate()
        .args([
            "--output",
            "json",
            "check",
            "--rules",
            "conformance/cli/rules.json",
            "--track",
            "conformance/cli/track_blank.json",
            "--deal",
            "conformance/cli/deal.json",
            "--from",
            "proposal",
            "--to",
            "negotiation",
        ])
        .output()
        .expect("run phasegate");
    assert_eq!(output.status.code(), Some(2));
    let json = parse_stdout(&output);
    assert_eq!(json["allowed"], false);
    assert_eq!(json["message"], "Set a deal volume or a probability");
    assert_eq!(json["blockingRule"]["id"], "sized-before-negotiation");
    let failed = json["failedConditions"].as_array().expect("array");
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0]["fieldPath"], "deal.volume");
    assert_eq!(failed[1]["fieldPath"], "track.probability");
}

#[test]
fn check_snapshot_document() {
    let output = phasegate()
        .args([
            "--output",
            "json",
            "check",
            "--rules",
            "conformance/cli/rules.json",
            "--snapshot",
            "conformance/cli/snapshot.json",
            "--from",
            "proposal",
            "--to",
            "negotiation",
        ])
        .output()
        .expect("run phasegate");
    assert!(output.status.success());
    let json = parse_stdout(&output);
    assert_eq!(json["allowed"], true);
    assert!(json["blockingRule"].is_null());
}

#[test]
fn check_disabled_rule_does_not_block() {
    phasegate()
        .args([
            "check",
            "--rules",
            "conformance/cli/rules.json",
            "--track",
            "conformance/cli/track_blank.json",
            "--deal",
            "conformance/cli/deal.json",
            "--from",
            "negotiation",
            "--to",
            "closing",
        ])
        .assert()
        .success();
}

#[test]
fn check_quiet_denied_prints_nothing() {
    phasegate()
        .args([
            "--quiet",
            "check",
            "--rules",
            "conformance/cli/rules.json",
            "--track",
            "conformance/cli/track_blank.json",
            "--from",
            "analysis",
            "--to",
            "proposal",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[test]
fn check_without_snapshot_or_track_exits_1() {
    phasegate()
        .args([
            "check",
            "--rules",
            "conformance/cli/rules.json",
            "--from",
            "analysis",
            "--to",
            "proposal",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--snapshot or --track"));
}

#[test]
fn check_nonexistent_rules_exits_1() {
    phasegate()
        .args([
            "check",
            "--rules",
            "conformance/cli/missing.json",
            "--snapshot",
            "conformance/cli/snapshot.json",
            "--from",
            "nda",
            "--to",
            "analysis",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("rules file not found"));
}

#[test]
fn check_invalid_json_exits_1() {
    let dir = tempfile::tempdir().expect("temp dir");
    let bad = dir.path().join("bad.json");
    fs::write(&bad, "{ not json").expect("write");
    phasegate()
        .args([
            "check",
            "--rules",
            bad.to_str().expect("utf-8 path"),
            "--snapshot",
            "conformance/cli/snapshot.json",
            "--from",
            "nda",
            "--to",
            "analysis",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid JSON"));
}

#[test]
fn check_snapshot_conflicts_with_track() {
    phasegate()
        .args([
            "check",
            "--rules",
            "conformance/cli/rules.json",
            "--snapshot",
            "conformance/cli/snapshot.json",
            "--track",
            "conformance/cli/track_filled.json",
            "--from",
            "nda",
            "--to",
            "analysis",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn check_custom_config_registry_and_default_message() {
    let dir = tempfile::tempdir().expect("temp dir");
    let track = dir.path().join("track.json");
    fs::write(&track, r#"{ "ndaSigned": "false" }"#).expect("write");
    let output = phasegate()
        .args([
            "--config",
            "conformance/cli/phasegate.toml",
            "--output",
            "json",
            "check",
            "--rules",
            "conformance/cli/rules_nda.json",
            "--track",
            track.to_str().expect("utf-8 path"),
            "--from",
            "nda",
            "--to",
            "analysis",
        ])
        .output()
        .expect("run phasegate");
    assert_eq!(output.status.code(), Some(2));
    let json = parse_stdout(&output);
    assert_eq!(json["message"], "Complete the checklist first");

    fs::write(&track, r#"{ "ndaSigned": true }"#).expect("write");
    phasegate()
        .args([
            "--config",
            "conformance/cli/phasegate.toml",
            "check",
            "--rules",
            "conformance/cli/rules_nda.json",
            "--track",
            track.to_str().expect("utf-8 path"),
            "--from",
            "nda",
            "--to",
            "analysis",
        ])
        .assert()
        .success();
}

#[test]
fn check_unknown_field_blocks_with_builtin_registry() {
    // track.ndaSigned is not in the built-in registry: fail closed
    let dir = tempfile::tempdir().expect("temp dir");
    let track = dir.path().join("track.json");
    fs::write(&track, r#"{ "ndaSigned": true }"#).expect("write");
    phasegate()
        .args([
            "check",
            "--rules",
            "conformance/cli/rules_nda.json",
            "--track",
            track.to_str().expect("utf-8 path"),
            "--from",
            "nda",
            "--to",
            "analysis",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "Requirements not met to advance to this stage",
        ));
}

#[test]
fn missing_config_file_exits_1() {
    phasegate()
        .args(["--config", "conformance/cli/nope.toml", "fields"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not read"));
}

// ──────────────────────────────────────────────
// 3. Validate subcommand
// ──────────────────────────────────────────────

#[test]
fn validate_valid_rules_exits_0() {
    phasegate()
        .args(["validate", "conformance/cli/rules.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn validate_misconfigured_rules_lists_errors() {
    phasegate()
        .args(["validate", "conformance/cli/rules_misconfigured.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid rules"))
        .stderr(predicate::str::contains("unknown field 'track.legacyScore'"))
        .stderr(predicate::str::contains(
            "operator greater_than is not defined for text fields",
        ));
}

#[test]
fn validate_schema_violation_exits_1_json() {
    let output = phasegate()
        .args([
            "--output",
            "json",
            "validate",
            "conformance/cli/rules_schema_invalid.json",
        ])
        .output()
        .expect("run phasegate");
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_slice(&output.stderr).expect("stderr should be JSON");
    assert_eq!(json["valid"], false);
    assert!(!json["errors"].as_array().expect("array").is_empty());
}

#[test]
fn validate_accepts_null_optionals_like_check() {
    // null optionals pass the schema; only the semantic pass objects
    phasegate()
        .args(["validate", "conformance/cli/rules_null_optionals.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "rule 'notes-before-proposal' has a blank error message",
        ))
        .stderr(predicate::str::contains("is not of type").not());

    phasegate()
        .args([
            "check",
            "--rules",
            "conformance/cli/rules_null_optionals.json",
            "--track",
            "conformance/cli/track_blank.json",
            "--from",
            "nda",
            "--to",
            "proposal",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "Requirements not met to advance to this stage",
        ));
}

#[test]
fn validate_nonexistent_file_exits_1() {
    phasegate()
        .args(["validate", "conformance/cli/missing.json"])
        .assert()
        .code(1);
}

// ──────────────────────────────────────────────
// 4. Describe and fields subcommands
// ──────────────────────────────────────────────

#[test]
fn describe_prints_rule_summaries() {
    phasegate()
        .args(["describe", "conformance/cli/rules.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "notes-before-proposal: any stage -> proposal: Track notes is filled",
        ))
        .stdout(predicate::str::contains(
            "Master deal volume is greater than \"0\" OR Probability (%) is greater than \"0\"",
        ))
        .stdout(predicate::str::contains("(disabled)"));
}

#[test]
fn describe_json_output() {
    let output = phasegate()
        .args(["--output", "json", "describe", "conformance/cli/rules.json"])
        .output()
        .expect("run phasegate");
    assert!(output.status.success());
    let json = parse_stdout(&output);
    let rules = json.as_array().expect("array");
    assert_eq!(rules.len(), 3);
    assert_eq!(rules[0]["id"], "notes-before-proposal");
    assert_eq!(rules[0]["conditions"][0], "Track notes is filled");
}

#[test]
fn fields_lists_builtin_registry() {
    phasegate()
        .arg("fields")
        .assert()
        .success()
        .stdout(predicate::str::contains("track.notes"))
        .stdout(predicate::str::contains("deal.deadline"))
        .stdout(predicate::str::contains("greater_or_equal"));
}

#[test]
fn fields_json_uses_config_registry() {
    let output = phasegate()
        .args([
            "--config",
            "conformance/cli/phasegate.toml",
            "--output",
            "json",
            "fields",
        ])
        .output()
        .expect("run phasegate");
    assert!(output.status.success());
    let json = parse_stdout(&output);
    let fields = json.as_array().expect("array");
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0]["path"], "track.ndaSigned");
    assert_eq!(fields[0]["type"], "boolean");
    assert_eq!(fields[0]["label"], "NDA signed");
    let ops: Vec<&str> = fields[0]["operators"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(ops.contains(&"equals"));
    assert!(!ops.contains(&"contains"));
}
