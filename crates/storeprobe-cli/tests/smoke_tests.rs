//! Smoke tests for the storeprobe CLI
//!
//! All runs use the in-memory storefront; no browser is launched.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the storeprobe binary
fn storeprobe() -> Command {
    let mut cmd = Command::cargo_bin("storeprobe").expect("storeprobe binary should exist");
    cmd.env_remove("STOREPROBE_BASE_URL").env_remove("RUST_LOG");
    cmd
}

const SUITE: &str = r"
name: smoke
scenarios:
  - name: Successful purchase
    steps:
      - action: add_to_cart
        product: Sauce Labs Backpack
      - action: proceed_to_checkout
      - action: enter_shipping_details
        first_name: John
        last_name: Doe
        postal_code: '12345'
      - action: complete_purchase
      - action: expect_confirmation
        message: Thank you for your order!
  - name: Missing product
    steps:
      - action: add_to_cart
        product: Nonexistent Item
";

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    storeprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.2.0"));
}

#[test]
fn test_help_flag() {
    storeprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("pages"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    storeprobe().assert().failure();
}

// ============================================================================
// pages / config
// ============================================================================

#[test]
fn test_pages_lists_locators() {
    storeprobe()
        .arg("pages")
        .assert()
        .success()
        .stdout(predicate::str::contains("inventory"))
        .stdout(predicate::str::contains("id=first-name"))
        .stdout(predicate::str::contains("Thank you for your order!"));
}

#[test]
fn test_pages_yaml() {
    storeprobe()
        .args(["pages", "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kind: checkout"));
}

#[test]
fn test_config_applies_overrides() {
    storeprobe()
        .args(["config", "--timeout-ms", "2500", "--base-url", "http://localhost:8080/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout_ms: 2500"))
        .stdout(predicate::str::contains("http://localhost:8080/"));
}

#[test]
fn test_config_reads_env_base_url() {
    storeprobe()
        .arg("config")
        .env("STOREPROBE_BASE_URL", "http://shop.test/")
        .assert()
        .success()
        .stdout(predicate::str::contains("http://shop.test/"));
}

#[test]
fn test_config_rejects_bad_poll() {
    storeprobe()
        .args(["config", "--timeout-ms", "100", "--poll-ms", "500"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid configuration"));
}

// ============================================================================
// run
// ============================================================================

#[test]
fn test_run_demo_on_mock() {
    storeprobe()
        .args(["run", "--driver", "mock", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS Successful purchase"))
        .stdout(predicate::str::contains("1 passed, 0 failed"));
}

#[test]
fn test_run_reports_failures_and_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let suite = write(&dir, "suite.yaml", SUITE);
    storeprobe()
        .args(["run", "--driver", "mock", "--color", "never", "--timeout-ms", "200", "--poll-ms", "50"])
        .arg("--scenarios")
        .arg(&suite)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("PASS Successful purchase"))
        .stdout(predicate::str::contains("FAIL Missing product"))
        .stdout(predicate::str::contains("not found after"))
        .stdout(predicate::str::contains("1 passed, 1 failed"));
}

#[test]
fn test_run_fail_fast_skips() {
    let dir = TempDir::new().unwrap();
    let suite = write(
        &dir,
        "suite.yaml",
        &format!(
            "{}\n  - name: Second\n    steps:\n      - action: add_to_cart\n        product: Sauce Labs Onesie\n",
            SUITE.trim_end()
        ),
    );
    storeprobe()
        .args(["run", "--driver", "mock", "--color", "never", "--timeout-ms", "200", "--poll-ms", "50", "--fail-fast"])
        .arg("--scenarios")
        .arg(&suite)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("1 scenario(s) skipped"));
}

#[test]
fn test_run_with_config_credentials() {
    let dir = TempDir::new().unwrap();
    let config = write(
        &dir,
        "storeprobe.yaml",
        "credentials:\n  username: standard_user\n  password: secret_sauce\nwait:\n  timeout_ms: 500\n",
    );
    storeprobe()
        .args(["run", "--driver", "mock", "--color", "never", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("(6/6 steps"));
}

#[test]
fn test_run_missing_scenario_file() {
    storeprobe()
        .args(["run", "--driver", "mock", "--scenarios", "/nonexistent/suite.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("/nonexistent/suite.yaml"));
}

#[test]
fn test_run_malformed_scenario_file() {
    let dir = TempDir::new().unwrap();
    let suite = write(&dir, "bad.yaml", "scenarios:\n  - name: x\n    steps:\n      - action: dance\n");
    storeprobe()
        .args(["run", "--driver", "mock", "--scenarios"])
        .arg(&suite)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("YAML"));
}
