//! Bus-neutral message contract.
//!
//! Names and payload shapes for exposing the controller over an IPC bus.
//! A transport decodes an [`ApiRequest`], hands it to [`dispatch`] and
//! encodes the returned [`ApiResponse`]. Failures cross the bus as a bare
//! [`StatusCode`].

use serde::{Deserialize, Serialize};

use crate::error::StatusExt;
use crate::lifecycle::DeepSleepManager;
use crate::platform::DeepSleepPlatform;
use crate::reason::WakeupReason;
use crate::status::StatusCode;

/// Bus name the deep-sleep manager registers under.
pub const BUS_NAME: &str = "DEEPSLEEPMgr";

/// Method that stores the wake timer for the next sleep.
pub const API_SET_DEEP_SLEEP_TIMER: &str = "SetDeepSleepTimer";

/// Method that reads the last wakeup reason.
pub const API_GET_LAST_WAKEUP_REASON: &str = "GetLastWakeupReason";

/// Method that reads the last wakeup key code.
pub const API_GET_LAST_WAKEUP_KEY_CODE: &str = "GetLastWakeupKeycode";

/// Parameter of `SetDeepSleepTimer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetDeepSleepTimerParam {
    /// Timeout in seconds, 0 for no timer.
    pub timeout: u32,
}

/// Result of `GetLastWakeupReason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeupReasonParam {
    /// Last wakeup reason.
    pub reason: WakeupReason,
}

/// Result of `GetLastWakeupKeycode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeupKeyCodeParam {
    /// Last wakeup key code.
    #[serde(rename = "keyCode")]
    pub key_code: u32,
}

/// A decoded bus call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum ApiRequest {
    /// `SetDeepSleepTimer`.
    #[serde(rename = "SetDeepSleepTimer")]
    SetDeepSleepTimer(SetDeepSleepTimerParam),
    /// `GetLastWakeupReason`.
    #[serde(rename = "GetLastWakeupReason")]
    GetLastWakeupReason,
    /// `GetLastWakeupKeycode`.
    #[serde(rename = "GetLastWakeupKeycode")]
    GetLastWakeupKeyCode,
}

impl ApiRequest {
    /// Method name on the bus.
    #[must_use]
    pub fn method(&self) -> &'static str {
        match self {
            Self::SetDeepSleepTimer(_) => API_SET_DEEP_SLEEP_TIMER,
            Self::GetLastWakeupReason => API_GET_LAST_WAKEUP_REASON,
            Self::GetLastWakeupKeyCode => API_GET_LAST_WAKEUP_KEY_CODE,
        }
    }
}

/// Payload carried by a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiPayload {
    /// Reply to `GetLastWakeupReason`.
    Reason(WakeupReasonParam),
    /// Reply to `GetLastWakeupKeycode`.
    KeyCode(WakeupKeyCodeParam),
}

/// Reply to a bus call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Outcome of the call.
    pub status: StatusCode,
    /// Result data; only present on success for query methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ApiPayload>,
}

impl ApiResponse {
    fn from_status(status: StatusCode) -> Self {
        Self {
            status,
            payload: None,
        }
    }

    fn with_payload(payload: ApiPayload) -> Self {
        Self {
            status: StatusCode::Success,
            payload: Some(payload),
        }
    }

    /// Check whether the call succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Route a decoded request into the controller.
pub fn dispatch<P: DeepSleepPlatform>(
    manager: &mut DeepSleepManager<P>,
    request: ApiRequest,
) -> ApiResponse {
    tracing::debug!(method = request.method(), "Dispatching bus call");

    let response = match request {
        ApiRequest::SetDeepSleepTimer(param) => {
            ApiResponse::from_status(manager.set_deep_sleep_timer(param.timeout).status())
        }
        ApiRequest::GetLastWakeupReason => match manager.last_wakeup_reason() {
            Ok(reason) => ApiResponse::with_payload(ApiPayload::Reason(WakeupReasonParam { reason })),
            Err(e) => ApiResponse::from_status(e.status()),
        },
        ApiRequest::GetLastWakeupKeyCode => match manager.last_wakeup_key_code() {
            Ok(key_code) => {
                ApiResponse::with_payload(ApiPayload::KeyCode(WakeupKeyCodeParam { key_code }))
            }
            Err(e) => ApiResponse::from_status(e.status()),
        },
    };

    if !response.is_success() {
        tracing::debug!(
            method = request.method(),
            status = %response.status,
            "Bus call failed"
        );
    }
    response
}
