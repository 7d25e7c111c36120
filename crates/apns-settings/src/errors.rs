//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while locating, reading, or validating configuration.
///
/// These are the only failures that reach the caller as a hard error: without
/// a valid configuration no notification can be sent at all.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The configuration source does not exist.
    #[error("configuration not found at {}", path.display())]
    NotFound {
        /// Location that was probed.
        path: PathBuf,
    },
    /// A required key is absent or empty.
    #[error("the \"{0}\" configuration is required")]
    MissingKey(&'static str),
    /// A present key holds a value that cannot be used.
    #[error("invalid configuration value for \"{key}\": {reason}")]
    InvalidValue {
        /// Offending key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// Failed to read the configuration file from disk.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse JSON in the configuration file.
    #[error("failed to parse configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigurationError {
    /// The configuration key this error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey(key) => Some(key),
            Self::InvalidValue { key, .. } => Some(key),
            _ => None,
        }
    }

    pub(crate) fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_path() {
        let err = ConfigurationError::NotFound {
            path: PathBuf::from("/etc/apns/config.json"),
        };
        assert_eq!(
            err.to_string(),
            "configuration not found at /etc/apns/config.json"
        );
    }

    #[test]
    fn missing_key_display_names_key() {
        let err = ConfigurationError::MissingKey("team_id");
        assert_eq!(err.to_string(), "the \"team_id\" configuration is required");
        assert_eq!(err.key(), Some("team_id"));
    }

    #[test]
    fn invalid_value_display() {
        let err = ConfigurationError::invalid("environment", "expected sandbox or production");
        assert_eq!(
            err.to_string(),
            "invalid configuration value for \"environment\": expected sandbox or production"
        );
        assert_eq!(err.key(), Some("environment"));
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ConfigurationError = io_err.into();
        assert!(matches!(err, ConfigurationError::Io(_)));
        assert!(err.key().is_none());
    }

    #[test]
    fn json_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let err: ConfigurationError = json_err.into();
        assert!(matches!(err, ConfigurationError::Json(_)));
        assert!(err.to_string().contains("parse configuration JSON"));
    }
}
