//! CLI integration tests
//!
//! Run the built binary inside temporary directories, so configuration
//! discovery never sees the developer's working tree.

#![allow(deprecated)] // cargo_bin deprecation - still works fine

mod common;

use assert_cmd::Command;
use common::write_tree;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cstyle").expect("binary should exist");
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_tree(dir.path(), files);
    dir
}

// ============================================================================
// check
// ============================================================================

#[test]
fn check_clean_file_exits_success() {
    let dir = project(&[(
        "Main.c",
        "#include <stdio.h>\n\nint main(void)\n{\n    int iCount = 0;\n    return iCount;\n}\n",
    )]);

    cmd(&dir)
        .args(["check", "--rules", "A1,A4,CL1,CL5,DV1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no diagnostics"));
}

#[test]
fn check_findings_exit_one() {
    let dir = project(&[("Main.c", "int main(void) {\n    int x=5;\n    return x;\n}\n")]);

    cmd(&dir)
        .args(["check", "--rules", "CL5,DV1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Main.c"))
        .stdout(predicate::str::contains(
            "CL5  missing spaces around operator '='",
        ))
        .stdout(predicate::str::contains(
            "DV1  variable 'x' should start with 'i'",
        ))
        .stdout(predicate::str::contains("2 diagnostic(s) in 1 file(s)"));
}

#[test]
fn check_jsonl_output() {
    let dir = project(&[("Main.c", "\tint iX;\n")]);

    let output = cmd(&dir)
        .args(["check", "--rules", "A1", "--format", "jsonl"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["type"], "diagnostic");
    assert_eq!(records[0]["rule"], "A1");
    assert_eq!(records[0]["line"], 1);
    assert_eq!(records[0]["message"], "tab character found");
    assert_eq!(records[1]["type"], "summary");
    assert_eq!(records[1]["passed"], false);
}

#[test]
fn check_unknown_rules_fail_fast() {
    let dir = project(&[("Main.c", "int iX;\n")]);

    cmd(&dir)
        .args(["check", "--rules", "A1,Z9,B7"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown rule ID(s): Z9, B7"))
        .stdout(predicate::str::is_empty());
}

#[test]
fn check_missing_paths_fail_fast() {
    let dir = project(&[("Main.c", "int iX;\n")]);

    cmd(&dir)
        .args(["check", "Main.c", "nope", "gone"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Input path(s) not found: nope, gone"));
}

#[test]
fn check_encoding_error_is_reported_and_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Bad.c"), [0xff, 0xfe, b'\n']).unwrap();
    fs::write(dir.path().join("Good.c"), "int iX;\n").unwrap();

    cmd(&dir)
        .args(["check", "--rules", "A1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("note: encoding error"))
        .stdout(predicate::str::contains("1 file(s) skipped"));
}

#[test]
fn check_uses_config_rules_and_limits() {
    let dir = project(&[
        (
            "cstyle.toml",
            "[style]\nversion = \"1\"\nrules = [\"A6\"]\n\n[limits]\nfunction_max = 5\n",
        ),
        (
            "Main.c",
            "int main(void)\n{\n    int iA = 1;\n    int iB = 2;\n    int iC = 3;\n    return iA;\n}\n",
        ),
    ]);

    cmd(&dir)
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "function 'main' has 7 lines (allowed 4-5)",
        ))
        .stdout(predicate::str::contains("with 1 rule(s)"));
}

#[test]
fn check_config_parse_error_exits_three() {
    let dir = project(&[("cstyle.toml", "[style\nversion = 1\n"), ("Main.c", "int iX;\n")]);

    cmd(&dir)
        .arg("check")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid configuration syntax"));
}

#[test]
fn check_invalid_config_exits_two() {
    let dir = project(&[(
        "cstyle.toml",
        "[style]\nversion = \"1\"\n\n[limits]\nfile_min = 10\nfile_max = 5\n",
    )]);

    cmd(&dir)
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid file limits"));
}

// ============================================================================
// convert
// ============================================================================

#[test]
fn convert_writes_mirrored_tree() {
    let dir = project(&[
        ("src/main.c", "int main(void) {\n\tint x=1;\n\treturn x;\n}\n"),
        ("src/util/Util.h", "int twice(int iN);\n"),
    ]);

    cmd(&dir)
        .args(["convert", "src", "--out", "styled", "--rules", "A1,A5,CL1,CL5,P1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Converted 2 of 2 file(s)"));

    assert_eq!(
        fs::read_to_string(dir.path().join("styled/Main.c")).unwrap(),
        "int main(void)\n{\n    int x = 1;\n    return x;\n}\n"
    );
    let header = fs::read_to_string(dir.path().join("styled/util/Util.h")).unwrap();
    assert!(header.starts_with("#ifndef UTIL_H\n#define UTIL_H\n"));
    assert!(header.ends_with("#endif // UTIL_H\n"));
    assert!(!dir.path().join("styled/main.c").exists());
}

#[test]
fn convert_requires_out() {
    let dir = project(&[("Main.c", "int iX;\n")]);

    cmd(&dir).arg("convert").assert().code(2);
}

#[test]
fn converted_output_passes_check() {
    let dir = project(&[(
        "Main.c",
        "#include <stdio.h>\n\nint main(void) {\n    int count=0;\n    printf(\"%d\\n\", count);\n    return 0;\n}\n",
    )]);

    cmd(&dir)
        .args(["convert", "Main.c", "--out", "out", "--rules", "CL1,CL5,DV1"])
        .assert()
        .success();

    cmd(&dir)
        .args(["check", "out", "--rules", "CL1,CL5,DV1"])
        .assert()
        .success();
}

// ============================================================================
// list / init
// ============================================================================

#[test]
fn list_shows_every_rule() {
    let dir = TempDir::new().unwrap();

    let assert = cmd(&dir).arg("list").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for id in ["A1", "A4", "A5", "A6", "A7", "A8", "CL1", "CL5", "DV1", "DV3", "P1"] {
        assert!(
            stdout.lines().any(|line| line.starts_with(&format!("{:<6}", id))),
            "{} missing from:\n{}",
            id,
            stdout
        );
    }
    assert!(stdout.contains("check, convert"));
}

#[test]
fn list_jsonl() {
    let dir = TempDir::new().unwrap();

    let output = cmd(&dir).args(["list", "-f", "jsonl"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 11);
    assert!(stdout.lines().all(|line| line.contains("\"type\":\"rule\"")));
}

#[test]
fn init_writes_config_once() {
    let dir = TempDir::new().unwrap();

    cmd(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created cstyle.toml"));
    assert!(dir.path().join("cstyle.toml").is_file());

    cmd(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    cmd(&dir)
        .args(["init", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overwrote"));

    // The generated file is a valid configuration
    fs::write(dir.path().join("Main.c"), "int iX;\n").unwrap();
    cmd(&dir).args(["check", "--rules", "A1"]).assert().success();
}

#[test]
fn verbose_logs_applied_rules() {
    let dir = project(&[("Main.c", "int iX;\n")]);

    cmd(&dir)
        .args(["--verbose", "check", "--rules", "A1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("applied check rule"));
}
