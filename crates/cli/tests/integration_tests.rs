//! Integration tests for deepsleepctl
//!
//! These tests run the binary end to end and check output and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Custom predicate to check if output is valid JSON
fn is_json() -> impl predicates::Predicate<[u8]> {
    predicates::function::function(|s: &[u8]| {
        std::str::from_utf8(s).is_ok_and(|text| serde_json::from_str::<Value>(text).is_ok())
    })
}

/// Test helper to create a deepsleepctl command
fn deepsleepctl() -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("deepsleepctl")?;
    cmd.env_remove("DEEPSLEEPCTL_CONFIG").env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn test_cli_help() -> TestResult {
    deepsleepctl()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulated platform"));
    Ok(())
}

#[test]
fn test_cli_version() -> TestResult {
    deepsleepctl()?
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("deepsleepctl"));
    Ok(())
}

#[test]
fn test_unknown_subcommand_is_usage_error() -> TestResult {
    deepsleepctl()?.arg("hibernate").assert().code(1);
    Ok(())
}

#[test]
fn test_reasons_lists_all() -> TestResult {
    deepsleepctl()?
        .arg("reasons")
        .assert()
        .success()
        .stdout(predicate::str::contains("RCU_RF4CE"))
        .stdout(predicate::str::contains("STR_AUTH_FAILURE"))
        .stdout(predicate::str::contains("UNKNOWN"));
    Ok(())
}

#[test]
fn test_reasons_json() -> TestResult {
    let output = deepsleepctl()?.args(["reasons", "--json"]).output()?;
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout)?;
    let reasons = value
        .get("reasons")
        .and_then(Value::as_array)
        .ok_or("missing reasons array")?;
    assert_eq!(reasons.len(), 18);
    assert_eq!(reasons.first().and_then(|r| r.get("name")), Some(&Value::from("IR")));
    Ok(())
}

#[test]
fn test_validate_accepts_week() -> TestResult {
    deepsleepctl()?
        .args(["validate", "--timeout", "604800"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));
    Ok(())
}

#[test]
fn test_validate_rejects_above_week() -> TestResult {
    deepsleepctl()?
        .args(["validate", "--timeout", "604801"])
        .assert()
        .code(11)
        .stderr(predicate::str::contains("INVALID_ARGUMENT"));
    Ok(())
}

#[test]
fn test_validate_json_error() -> TestResult {
    deepsleepctl()?
        .args(["--json", "validate", "--timeout", "700000"])
        .assert()
        .code(11)
        .stdout(is_json())
        .stdout(predicate::str::contains("\"INVALID_ARGUMENT\""));
    Ok(())
}

#[test]
fn test_cycle_timer_wake() -> TestResult {
    let output = deepsleepctl()?
        .args(["cycle", "--timeout", "3", "--second-ms", "1", "--json"])
        .output()?;
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout)?;
    let cycle = value.get("cycle").ok_or("missing cycle")?;
    assert_eq!(cycle.get("reason"), Some(&Value::from("TIMER")));
    assert_eq!(cycle.get("gpio_triggered"), Some(&Value::from(false)));
    assert_eq!(cycle.get("key_code"), Some(&Value::from(0)));
    Ok(())
}

#[test]
fn test_cycle_remote_wake_reports_key_code() -> TestResult {
    let output = deepsleepctl()?
        .args([
            "cycle",
            "--wake",
            "IR",
            "--wake-after-ms",
            "20",
            "--key-code",
            "0xE00C",
            "--json",
        ])
        .output()?;
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout)?;
    let cycle = value.get("cycle").ok_or("missing cycle")?;
    assert_eq!(cycle.get("reason"), Some(&Value::from("IR")));
    assert_eq!(cycle.get("key_code"), Some(&Value::from(0xE00C)));
    Ok(())
}

#[test]
fn test_cycle_gpio_wake() -> TestResult {
    deepsleepctl()?
        .args(["cycle", "--gpio", "--second-ms", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GPIO"))
        .stdout(predicate::str::contains("GPIO triggered: true"));
    Ok(())
}

#[test]
fn test_cycle_immediate_wake_is_never_lost() -> TestResult {
    for _ in 0..10 {
        deepsleepctl()?
            .args(["cycle", "--gpio"])
            .assert()
            .success()
            .stdout(predicate::str::contains("GPIO triggered: true"));

        let output = deepsleepctl()?
            .args(["cycle", "--wake", "IR", "--key-code", "5", "--json"])
            .output()?;
        assert_eq!(output.status.code(), Some(0));

        let value: Value = serde_json::from_slice(&output.stdout)?;
        let cycle = value.get("cycle").ok_or("missing cycle")?;
        assert_eq!(cycle.get("reason"), Some(&Value::from("IR")));
        assert_eq!(cycle.get("key_code"), Some(&Value::from(5)));
    }
    Ok(())
}

#[test]
fn test_cycle_gpio_wake_after_delay() -> TestResult {
    deepsleepctl()?
        .args(["cycle", "--gpio", "--wake-after-ms", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GPIO triggered: true"));
    Ok(())
}

#[test]
fn test_cycle_reports_success_rate() -> TestResult {
    let output = deepsleepctl()?
        .args(["cycle", "--timeout", "1", "--second-ms", "1", "--json"])
        .output()?;
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout)?;
    let cycle = value.get("cycle").ok_or("missing cycle")?;
    assert_eq!(
        cycle.get("success_rate").and_then(Value::as_f64),
        Some(1.0)
    );
    Ok(())
}

#[test]
fn test_cycle_untimed_without_wake_source_fails() -> TestResult {
    deepsleepctl()?
        .args(["cycle", "--timeout", "0"])
        .assert()
        .code(15)
        .stderr(predicate::str::contains("SET_FAILURE"));
    Ok(())
}

#[test]
fn test_cycle_huge_second_length_keeps_timer() -> TestResult {
    let output = deepsleepctl()?
        .args([
            "cycle",
            "--timeout",
            "604800",
            "--second-ms",
            "18446744073709551615",
            "--json",
        ])
        .output()?;
    assert_eq!(output.status.code(), Some(0));

    let value: Value = serde_json::from_slice(&output.stdout)?;
    let cycle = value.get("cycle").ok_or("missing cycle")?;
    assert_eq!(cycle.get("reason"), Some(&Value::from("TIMER")));
    Ok(())
}

#[test]
fn test_cycle_rejects_oversized_timeout() -> TestResult {
    deepsleepctl()?
        .args(["cycle", "--timeout", "604801"])
        .assert()
        .code(11);
    Ok(())
}

#[test]
fn test_config_file_limits_timeout() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("deepsleep.json");
    fs::write(&path, r#"{ "max_timeout_seconds": 60 }"#)?;

    deepsleepctl()?
        .args(["validate", "--timeout", "61", "--config"])
        .arg(&path)
        .assert()
        .code(11);

    deepsleepctl()?
        .args(["validate", "--timeout", "60", "--config"])
        .arg(&path)
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_invalid_config_file_exits_one() -> TestResult {
    let dir = TempDir::new()?;
    let path = dir.path().join("deepsleep.json");
    fs::write(&path, r#"{ "max_timeout_seconds": 604801 }"#)?;

    deepsleepctl()?
        .args(["reasons", "--config"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration rejected"));
    Ok(())
}

#[test]
fn test_missing_config_file_exits_one() -> TestResult {
    deepsleepctl()?
        .args(["reasons", "--config", "/nonexistent/deepsleep.json"])
        .assert()
        .code(1);
    Ok(())
}
