//! APNS dispatch errors.

/// Failures inside a send.
///
/// [`ApnsService::send`](crate::ApnsService::send) folds every one of these
/// into a failed [`SendResult`](crate::SendResult); they surface directly only
/// from [`ApnsService::fetch_jwt`](crate::ApnsService::fetch_jwt) and transport
/// construction.
#[derive(Debug, thiserror::Error)]
pub enum ApnsError {
    /// Failed to read private key file.
    #[error("failed to read APNS key at {path}: {reason}")]
    KeyRead {
        /// Key file path.
        path: String,
        /// Error description.
        reason: String,
    },
    /// The key could not produce an ES256 signature (malformed PEM, wrong curve).
    #[error("failed to sign JWT: {reason}")]
    Signing {
        /// Error description.
        reason: String,
    },
    /// Failed to serialize a token segment or the notification payload.
    #[error("failed to encode JSON: {reason}")]
    Encode {
        /// Error description.
        reason: String,
    },
    /// Connection failure, timeout, or other transport-level error.
    #[error("transport error: {reason}")]
    Transport {
        /// Error description.
        reason: String,
        /// Whether the request timeout elapsed.
        timed_out: bool,
    },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {reason}")]
    ClientBuild {
        /// Error description.
        reason: String,
    },
}

impl From<reqwest::Error> for ApnsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            timed_out: err.is_timeout(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApnsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode {
            reason: err.to_string(),
        }
    }
}

/// Result type for APNS operations.
pub type Result<T> = std::result::Result<T, ApnsError>;
