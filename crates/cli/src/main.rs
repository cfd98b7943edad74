//! deepsleepctl - Deep Sleep Control CLI
//!
//! Drives the deep-sleep client contract against the simulated platform,
//! validates timeouts and lists the wakeup reasons.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use deepsleep_core::DeepSleepConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{CycleArgs, ValidateArgs};
use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "deepsleepctl")]
#[command(about = "Deep Sleep Control CLI - Exercise the deep-sleep contract on a simulated platform")]
#[command(version)]
#[command(long_about = "
deepsleepctl drives the deep-sleep client contract (Init, EnterDeepSleep,
Wakeup, GetLastWakeupReason, GetLastWakeupKeyCode, Terminate) against a
simulated platform.

A failed contract call exits with 10 plus its status code.
Use --json flag for machine-readable output suitable for scripting.
")]
struct Cli {
    /// Output format (human-readable or JSON)
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Controller configuration file (JSON)
    #[arg(long, global = true, env = "DEEPSLEEPCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run Init, EnterDeepSleep, Wakeup, the wakeup queries and Terminate
    Cycle(CycleArgs),

    /// Check a timeout against the configured bounds
    Validate(ValidateArgs),

    /// List every wakeup reason with its code and class
    Reasons,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            if let Err(print_err) = e.print() {
                eprintln!("{print_err}");
            }
            return ExitCode::from(code);
        }
    };

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("deepsleepctl={log_level},deepsleep_core={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let exit_code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(exit_code)
        }
    }
}

fn execute_command(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "Configuration loaded");

    match &cli.command {
        Commands::Cycle(args) => commands::cycle::execute(args, config, cli.json),
        Commands::Validate(args) => commands::validate::execute(args, &config, cli.json),
        Commands::Reasons => commands::reasons::execute(cli.json),
    }
}

fn load_config(path: Option<&Path>) -> Result<DeepSleepConfig, CliError> {
    let Some(path) = path else {
        return Ok(DeepSleepConfig::default());
    };

    let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(DeepSleepConfig::from_json_str(&text)?)
}
