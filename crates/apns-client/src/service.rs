//! APNS service: JWT signing, HTTP/2 notification delivery.

use std::sync::Arc;

use apns_core::text::token_prefix;
use apns_settings::{ApnsSettings, Credentials};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::errors::Result;
use crate::token::generate_jwt;
use crate::transport::{PushRequest, ReqwestTransport, Transport};
use crate::types::{ApnsPayload, NotificationRequest, SendResult};

/// APNS service for sending push notifications to Apple devices.
///
/// Holds no mutable state: a token is generated for every send and dropped
/// when the request completes. Share it behind an `Arc` for concurrent sends.
pub struct ApnsService {
    credentials: Credentials,
    base_url: String,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ApnsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApnsService")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApnsService {
    /// Create a service from validated settings with the `reqwest` transport
    /// and the system clock.
    ///
    /// Apple hosts get an HTTP/2-only client; a custom endpoint negotiates.
    pub fn new(settings: &ApnsSettings) -> Result<Self> {
        let transport = if settings.endpoint.is_some() {
            ReqwestTransport::new(settings.request_timeout)?
        } else {
            ReqwestTransport::http2_only(settings.request_timeout)?
        };

        info!(
            key_id = %settings.credentials.key_id(),
            team_id = %settings.credentials.team_id(),
            environment = %settings.environment,
            timeout_ms = settings.request_timeout.as_millis() as u64,
            "APNS service initialized"
        );

        Ok(Self::with_parts(
            settings.credentials.clone(),
            settings.base_url(),
            Arc::new(transport),
            Arc::new(SystemClock),
        ))
    }

    /// Create a service from explicit parts.
    pub fn with_parts(
        credentials: Credentials,
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            clock,
        }
    }

    /// Credentials this service signs with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate a fresh provider token.
    ///
    /// Reads the private key from disk on every call.
    pub fn fetch_jwt(&self) -> Result<String> {
        generate_jwt(
            self.credentials.private_key_path(),
            self.credentials.key_id(),
            self.credentials.team_id(),
            self.clock.now_unix(),
        )
    }

    /// Endpoint for a single device.
    pub fn device_url(&self, device_token: &str) -> String {
        format!("{}/3/device/{}", self.base_url, device_token)
    }

    /// Send a notification to a single device.
    ///
    /// Never fails: key, signing, and transport errors become a failed
    /// [`SendResult`].
    pub async fn send(&self, request: &NotificationRequest) -> SendResult {
        let prefix = token_prefix(&request.device_token);

        let prepared = self
            .fetch_jwt()
            .and_then(|jwt| Ok((jwt, serde_json::to_string(&ApnsPayload::from(request))?)));
        let (jwt, body) = match prepared {
            Ok(parts) => parts,
            Err(e) => {
                warn!(error = %e, device_token = prefix, "APNS request not sent");
                return SendResult::error(&e);
            }
        };

        debug!(
            base_url = %self.base_url,
            device_token = prefix,
            token_len = request.device_token.len(),
            bundle_id = %self.credentials.bundle_id(),
            payload = %body,
            "APNS request"
        );

        let push = PushRequest {
            url: self.device_url(&request.device_token),
            bearer_token: jwt,
            topic: self.credentials.bundle_id().to_string(),
            body,
        };

        match self.transport.post(push).await {
            Ok(response) => {
                let result = SendResult::from_response(response);
                if result.success {
                    info!(
                        status = result.status_code,
                        device_token = prefix,
                        apns_id = ?result.apns_id,
                        "APNS send OK"
                    );
                } else {
                    warn!(
                        status = result.status_code,
                        reason = ?result.reason,
                        body = ?result.response,
                        device_token = prefix,
                        "APNS send FAILED"
                    );
                }
                result
            }
            Err(e) => {
                warn!(
                    error = %e,
                    device_token = prefix,
                    "APNS HTTP request FAILED (transport error)"
                );
                SendResult::transport_failure(&e)
            }
        }
    }
}
