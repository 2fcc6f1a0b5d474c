//! CLI integration tests for the `vlist` binary.
//!
//! Uses `assert_cmd` to spawn the binary and verify exit codes,
//! stdout content, and stderr content. Server behavior is covered
//! separately in `serve_integration.rs`.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn vlist() -> Command {
    cargo_bin_cmd!("vlist")
}

#[test]
fn help_exits_0_with_description() {
    vlist()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Value list HTTP service"));
}

#[test]
fn version_exits_0() {
    vlist()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vlist"));
}

#[test]
fn serve_help_shows_port_flag() {
    vlist()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--create-index"));
}

#[test]
fn no_subcommand_exits_nonzero() {
    vlist().assert().failure();
}

#[test]
fn serve_with_cert_but_no_key_exits_1() {
    vlist()
        .args(["serve", "--tls-cert", "cert.pem"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "--tls-cert and --tls-key must both be provided",
        ));
}

#[test]
fn serve_with_key_but_no_cert_exits_1() {
    vlist()
        .args(["serve", "--tls-key", "key.pem"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "--tls-cert and --tls-key must both be provided",
        ));
}
