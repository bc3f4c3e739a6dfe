//! CLI behaviour tests.
//!
//! These exercise the `pasquimc` binary without touching the external
//! toolchain: `--asm-only` stops after the assembly file is written, and
//! the error paths fail before the toolchain is ever invoked.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn pasquimc() -> Command {
    Command::cargo_bin("pasquimc").unwrap()
}

#[test]
fn test_build_asm_only_writes_assembly() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("answer.scm");
    fs::write(&source, "(primcall add1 41)").unwrap();
    let out_dir = dir.path().join("out");

    pasquimc()
        .arg("build")
        .arg(&source)
        .arg("--asm-only")
        .arg("--output")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("compiled.s"));

    let asm = fs::read_to_string(out_dir.join("compiled.s")).unwrap();
    assert!(asm.contains("scheme_entry:"));
    assert!(asm.contains("addl $4, %eax"));
}

#[test]
fn test_build_missing_input_fails() {
    pasquimc()
        .arg("build")
        .arg("no-such-file.scm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read source file"));
}

#[test]
fn test_build_reports_syntax_errors() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("bad.scm");
    fs::write(&source, "(primcall add1 41").unwrap();

    pasquimc()
        .arg("build")
        .arg(&source)
        .arg("--asm-only")
        .arg("--output")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected EOF"));
}

#[test]
fn test_build_reports_semantic_errors() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("bad.scm");
    fs::write(&source, "(primcall frobnicate 1)").unwrap();

    pasquimc()
        .arg("build")
        .arg(&source)
        .arg("--asm-only")
        .arg("--output")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown primitive operator"));
}

#[test]
fn test_build_rejects_bad_config() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("ok.scm");
    fs::write(&source, "42").unwrap();
    let config = dir.path().join("pasquim.toml");
    fs::write(&config, "not toml [").unwrap();

    pasquimc()
        .arg("build")
        .arg(&source)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_completions_bash() {
    pasquimc()
        .arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("pasquimc"));
}
