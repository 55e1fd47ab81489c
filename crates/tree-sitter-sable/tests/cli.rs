//! End-to-end tests for the `tree-sitter-sable` binary.
#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;

fn bin() -> Command {
    Command::cargo_bin("tree-sitter-sable").unwrap()
}

#[test]
fn test_check_succeeds() {
    bin()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("sable: ok (abi 15, 3 node kinds)"))
        .stderr(predicate::str::contains("Error loading").not());
}

#[test]
fn test_node_types_command() {
    bin()
        .arg("node-types")
        .assert()
        .success()
        .stdout(predicate::str::contains("source_file").and(predicate::str::contains("hello")));
}

#[test]
fn test_grammar_command() {
    bin()
        .arg("grammar")
        .assert()
        .success()
        .stdout(predicate::str::contains("sable"));
}

#[test]
fn test_symbols_command() {
    bin()
        .arg("symbols")
        .assert()
        .success()
        .stdout(predicate::str::contains("0\tend\tnamed"))
        .stdout(predicate::str::contains("1\thello\tanonymous"))
        .stdout(predicate::str::contains("2\tsource_file\tnamed"));
}

#[test]
fn test_unknown_command() {
    bin()
        .arg("parse")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown command 'parse'"));
}
