//! Command implementations for deepsleepctl

pub mod cycle;
pub mod reasons;
pub mod validate;

use clap::{ArgGroup, Args};
use deepsleep_core::WakeupReason;

#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("wake_source").args(["wake", "gpio"]).multiple(true)))]
pub struct CycleArgs {
    /// Sleep timeout in seconds, 0 to sleep until a wake source fires
    #[arg(short, long, default_value_t = 0)]
    pub timeout: u32,

    /// Keep the network able to wake the device
    #[arg(long)]
    pub network_standby: bool,

    /// Wake source to fire during the sleep (name or code, e.g. IR or 0)
    #[arg(long, value_parser = parse_reason)]
    pub wake: Option<WakeupReason>,

    /// Delay before the wake source fires
    #[arg(long, default_value_t = 0, requires = "wake_source")]
    pub wake_after_ms: u64,

    /// Key code delivered with the wake (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_key_code)]
    pub key_code: Option<u32>,

    /// Report the wake as GPIO-triggered
    #[arg(long)]
    pub gpio: bool,

    /// Length of one simulated second in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub second_ms: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Timeout in seconds to check
    #[arg(short, long)]
    pub timeout: u32,
}

/// Parse a wakeup reason by name or numeric code.
pub fn parse_reason(value: &str) -> Result<WakeupReason, String> {
    WakeupReason::from_name(value)
        .or_else(|| value.parse().ok().and_then(WakeupReason::from_code))
        .ok_or_else(|| format!("unknown wakeup reason '{value}' (see `deepsleepctl reasons`)"))
}

/// Parse a key code in decimal or `0x` hex.
pub fn parse_key_code(value: &str) -> Result<u32, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("invalid key code '{value}': {e}"))
}
