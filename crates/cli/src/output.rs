//! Output formatting for CLI responses

use anyhow::{Error, Result};
use colored::Colorize;
use deepsleep_core::{StatusCode, WakeupReason};
use serde_json::json;

use crate::commands::cycle::CycleReport;
use crate::error::CliError;

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let status = error
        .downcast_ref::<CliError>()
        .and_then(CliError::status);
    let error_json = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "status": status,
        }
    });
    match serde_json::to_string_pretty(&error_json) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format error as JSON: {e}"),
    }
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    match error.downcast_ref::<CliError>().and_then(CliError::status) {
        Some(status) => eprintln!("{} [{}] {}", "Error:".red().bold(), status, error),
        None => eprintln!("{} {}", "Error:".red().bold(), error),
    }

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Print the outcome of a sleep cycle
pub fn print_cycle(report: &CycleReport, json: bool) -> Result<()> {
    if json {
        let output = json!({
            "success": true,
            "status": StatusCode::Success,
            "cycle": report,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Deep Sleep Cycle".bold());
    println!("  Status: {}", StatusCode::Success.as_str().green());
    match report.request.timeout() {
        Some(timeout) => println!("  Timeout: {}s", timeout.as_secs()),
        None => println!("  Timeout: {}", "none (external wake only)".dimmed()),
    }
    println!("  Network standby: {}", report.request.network_standby);
    println!("  Wakeup reason: {}", report.reason.as_str().cyan().bold());
    if report.reason.is_remote_control() {
        println!("  Key code: {:#06x}", report.key_code);
    }
    println!("  GPIO triggered: {}", report.gpio_triggered);
    println!("  Slept: {} ms", report.slept_ms);
    println!("  Sleep success rate: {:.0}%", report.success_rate * 100.0);
    Ok(())
}

/// Print a timeout that passed validation
pub fn print_validation(timeout: u32, max: u32, json: bool) -> Result<()> {
    if json {
        let output = json!({
            "success": true,
            "status": StatusCode::Success,
            "timeout": timeout,
            "max_timeout_seconds": max,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} timeout {timeout}s is within [0, {max}]",
            StatusCode::Success.as_str().green()
        );
    }
    Ok(())
}

fn reason_class(reason: WakeupReason) -> &'static str {
    if reason.is_remote_control() {
        "remote"
    } else if reason.is_network() {
        "network"
    } else if reason.is_reset() {
        "reset"
    } else {
        "other"
    }
}

/// Print every wakeup reason with its code and classification
pub fn print_reasons(json: bool) -> Result<()> {
    if json {
        let reasons: Vec<_> = WakeupReason::all()
            .map(|reason| {
                json!({
                    "code": reason.code(),
                    "name": reason,
                    "class": reason_class(reason),
                })
            })
            .collect();
        let output = json!({ "success": true, "reasons": reasons });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Wakeup Reasons:".bold());
    for reason in WakeupReason::all() {
        println!(
            "  {:>2}  {:<18} {}",
            reason.code(),
            reason.as_str(),
            reason_class(reason).dimmed()
        );
    }
    Ok(())
}
