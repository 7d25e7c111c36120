//! APNS type definitions.

use serde::{Deserialize, Serialize};

use crate::errors::ApnsError;
use crate::transport::TransportResponse;

/// Title used when the caller does not supply one.
pub const DEFAULT_TITLE: &str = "Hello!";
/// Body used when the caller does not supply one.
pub const DEFAULT_BODY: &str = "This is a test push notification.";

/// Outcome messages.
pub const MSG_SENT: &str = "Notification sent successfully";
/// Non-200 status or transport failure.
pub const MSG_FAILED: &str = "Failed to send notification";
/// Prefix for failures before the request is issued (key read, signing).
pub const MSG_ERROR_PREFIX: &str = "An error occurred: ";

/// One notification addressed to one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Target device's APNs token (opaque hex string).
    pub device_token: String,
    /// Alert title.
    pub title: String,
    /// Alert body.
    pub body: String,
}

impl NotificationRequest {
    /// Request for `device_token` with the default title and body.
    pub fn new(device_token: impl Into<String>) -> Self {
        Self {
            device_token: device_token.into(),
            title: DEFAULT_TITLE.to_string(),
            body: DEFAULT_BODY.to_string(),
        }
    }

    /// Set the alert title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the alert body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// APNS JSON payload: `{"aps":{"alert":{"title","body"},"sound":"default"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApnsPayload {
    /// Apple-defined dictionary.
    pub aps: Aps,
}

/// The `aps` dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aps {
    /// User-visible alert.
    pub alert: Alert,
    /// Sound name.
    pub sound: String,
}

/// The `aps.alert` dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert title.
    pub title: String,
    /// Alert body.
    pub body: String,
}

impl From<&NotificationRequest> for ApnsPayload {
    fn from(request: &NotificationRequest) -> Self {
        Self {
            aps: Aps {
                alert: Alert {
                    title: request.title.clone(),
                    body: request.body.clone(),
                },
                sound: "default".to_string(),
            },
        }
    }
}

/// Result of sending a single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendResult {
    /// Whether APNs answered 200.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Raw response body; present only when an HTTP response was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// HTTP status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// APNS-assigned notification ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apns_id: Option<String>,
    /// Error reason from APNS (`BadDeviceToken`, `Unregistered`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Transport error description when no response was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResult {
    /// Interpret a completed HTTP exchange. Only status 200 is a success.
    pub fn from_response(response: TransportResponse) -> Self {
        let success = response.status == 200;
        let reason = if success {
            None
        } else {
            serde_json::from_str::<serde_json::Value>(&response.body)
                .ok()
                .and_then(|v| v.get("reason")?.as_str().map(String::from))
        };

        Self {
            success,
            message: if success { MSG_SENT } else { MSG_FAILED }.to_string(),
            response: Some(response.body),
            status_code: Some(response.status),
            apns_id: response.apns_id,
            reason,
            error: None,
        }
    }

    /// The request was issued but no response came back.
    pub fn transport_failure(err: &ApnsError) -> Self {
        Self {
            success: false,
            message: MSG_FAILED.to_string(),
            response: None,
            status_code: None,
            apns_id: None,
            reason: None,
            error: Some(err.to_string()),
        }
    }

    /// The request could not be prepared (key read, signing, encoding).
    pub fn error(err: &ApnsError) -> Self {
        Self {
            success: false,
            message: format!("{MSG_ERROR_PREFIX}{err}"),
            response: None,
            status_code: None,
            apns_id: None,
            reason: None,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            body: body.to_string(),
            apns_id: Some("6E6C2B7F-1D2A-4E1B-9C4D-0A1B2C3D4E5F".to_string()),
        }
    }

    #[test]
    fn request_defaults() {
        let req = NotificationRequest::new("deadbeef");
        assert_eq!(req.device_token, "deadbeef");
        assert_eq!(req.title, "Hello!");
        assert_eq!(req.body, "This is a test push notification.");
    }

    #[test]
    fn request_overrides() {
        let req = NotificationRequest::new("deadbeef").title("Hi").body("There");
        assert_eq!(req.title, "Hi");
        assert_eq!(req.body, "There");
    }

    #[test]
    fn payload_shape() {
        let req = NotificationRequest::new("deadbeef").title("Hi").body("There");
        let payload = serde_json::to_value(ApnsPayload::from(&req)).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "aps": {
                    "alert": { "title": "Hi", "body": "There" },
                    "sound": "default",
                }
            })
        );
    }

    #[test]
    fn payload_escapes_text() {
        let req = NotificationRequest::new("t").title("\"quoted\"").body("line\nbreak");
        let json = serde_json::to_string(&ApnsPayload::from(&req)).unwrap();
        let back: ApnsPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.aps.alert.title, "\"quoted\"");
        assert_eq!(back.aps.alert.body, "line\nbreak");
    }

    #[test]
    fn status_200_is_success() {
        let result = SendResult::from_response(response(200, ""));
        assert!(result.success);
        assert_eq!(result.message, MSG_SENT);
        assert_eq!(result.response.as_deref(), Some(""));
        assert_eq!(result.status_code, Some(200));
        assert!(result.apns_id.is_some());
        assert!(result.reason.is_none());
    }

    #[test]
    fn other_2xx_is_failure() {
        let result = SendResult::from_response(response(204, ""));
        assert!(!result.success);
        assert_eq!(result.message, MSG_FAILED);
    }

    #[test]
    fn error_status_extracts_reason() {
        let result = SendResult::from_response(response(410, r#"{"reason":"Unregistered"}"#));
        assert!(!result.success);
        assert_eq!(result.message, MSG_FAILED);
        assert_eq!(result.reason.as_deref(), Some("Unregistered"));
        assert_eq!(
            result.response.as_deref(),
            Some(r#"{"reason":"Unregistered"}"#)
        );
    }

    #[test]
    fn error_status_non_json_body() {
        let result = SendResult::from_response(response(502, "bad gateway"));
        assert!(!result.success);
        assert!(result.reason.is_none());
        assert_eq!(result.response.as_deref(), Some("bad gateway"));
    }

    #[test]
    fn transport_failure_has_no_response() {
        let err = ApnsError::Transport {
            reason: "connection refused".to_string(),
            timed_out: false,
        };
        let result = SendResult::transport_failure(&err);
        assert!(!result.success);
        assert_eq!(result.message, MSG_FAILED);
        assert!(result.response.is_none());
        assert!(result.error.unwrap().contains("connection refused"));
    }

    #[test]
    fn error_message_carries_cause() {
        let err = ApnsError::KeyRead {
            path: "/k.p8".to_string(),
            reason: "No such file or directory".to_string(),
        };
        let result = SendResult::error(&err);
        assert!(!result.success);
        assert!(result.message.starts_with(MSG_ERROR_PREFIX));
        assert!(result.message.contains("/k.p8"));
        assert!(result.response.is_none());
    }

    #[test]
    fn serialized_result_omits_absent_response() {
        let err = ApnsError::Signing {
            reason: "bad key".to_string(),
        };
        let json = serde_json::to_value(SendResult::error(&err)).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("response").is_none());
    }
}
