//! Wakeup reason classification.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The event that ended the most recent deep-sleep period.
///
/// Discriminants are stable and match the order platforms report them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum WakeupReason {
    /// IR remote key press.
    #[serde(rename = "IR")]
    Ir = 0,
    /// Bluetooth remote control unit.
    #[serde(rename = "RCU_BT")]
    RcuBt = 1,
    /// RF4CE remote control unit.
    #[serde(rename = "RCU_RF4CE")]
    RcuRf4ce = 2,
    /// General-purpose pin event.
    #[serde(rename = "GPIO")]
    Gpio = 3,
    /// Wired network activity.
    #[serde(rename = "LAN")]
    Lan = 4,
    /// Wireless network activity.
    #[serde(rename = "WLAN")]
    Wlan = 5,
    /// Sleep timer expiry.
    #[serde(rename = "TIMER")]
    Timer = 6,
    /// Front panel button.
    #[serde(rename = "FRONT_PANEL")]
    FrontPanel = 7,
    /// Watchdog timer reset.
    #[serde(rename = "WATCHDOG")]
    Watchdog = 8,
    /// Software-initiated reset.
    #[serde(rename = "SOFTWARE_RESET")]
    SoftwareReset = 9,
    /// Thermal protection reset.
    #[serde(rename = "THERMAL_RESET")]
    ThermalReset = 10,
    /// Warm reset.
    #[serde(rename = "WARM_RESET")]
    WarmReset = 11,
    /// Cold boot.
    #[serde(rename = "COLDBOOT")]
    Coldboot = 12,
    /// Suspend-to-RAM authentication failure.
    #[serde(rename = "STR_AUTH_FAILURE")]
    StrAuthFailure = 13,
    /// HDMI-CEC message.
    #[serde(rename = "CEC")]
    Cec = 14,
    /// Presence or motion detection.
    #[serde(rename = "PRESENCE")]
    Presence = 15,
    /// Voice command.
    #[serde(rename = "VOICE")]
    Voice = 16,
    /// Cause could not be determined.
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown = 17,
}

impl WakeupReason {
    const ALL: [Self; 18] = [
        Self::Ir,
        Self::RcuBt,
        Self::RcuRf4ce,
        Self::Gpio,
        Self::Lan,
        Self::Wlan,
        Self::Timer,
        Self::FrontPanel,
        Self::Watchdog,
        Self::SoftwareReset,
        Self::ThermalReset,
        Self::WarmReset,
        Self::Coldboot,
        Self::StrAuthFailure,
        Self::Cec,
        Self::Presence,
        Self::Voice,
        Self::Unknown,
    ];

    /// Every reason, in discriminant order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }

    /// Get the numeric code.
    #[must_use]
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Convert from a numeric code reported by a platform.
    #[must_use]
    pub fn from_code(code: u32) -> Option<Self> {
        Self::all().find(|reason| reason.code() == code)
    }

    /// Reasons for which a wakeup key code carries meaning.
    #[must_use]
    pub fn is_remote_control(self) -> bool {
        matches!(self, Self::Ir | Self::RcuBt | Self::RcuRf4ce)
    }

    /// Reasons that require network standby to be enabled.
    #[must_use]
    pub fn is_network(self) -> bool {
        matches!(self, Self::Lan | Self::Wlan)
    }

    /// Reasons that indicate a reset rather than a resume.
    #[must_use]
    pub fn is_reset(self) -> bool {
        matches!(
            self,
            Self::Watchdog
                | Self::SoftwareReset
                | Self::ThermalReset
                | Self::WarmReset
                | Self::Coldboot
        )
    }

    /// Get the canonical name of the reason.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ir => "IR",
            Self::RcuBt => "RCU_BT",
            Self::RcuRf4ce => "RCU_RF4CE",
            Self::Gpio => "GPIO",
            Self::Lan => "LAN",
            Self::Wlan => "WLAN",
            Self::Timer => "TIMER",
            Self::FrontPanel => "FRONT_PANEL",
            Self::Watchdog => "WATCHDOG",
            Self::SoftwareReset => "SOFTWARE_RESET",
            Self::ThermalReset => "THERMAL_RESET",
            Self::WarmReset => "WARM_RESET",
            Self::Coldboot => "COLDBOOT",
            Self::StrAuthFailure => "STR_AUTH_FAILURE",
            Self::Cec => "CEC",
            Self::Presence => "PRESENCE",
            Self::Voice => "VOICE",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse a canonical name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|reason| reason.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for WakeupReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
