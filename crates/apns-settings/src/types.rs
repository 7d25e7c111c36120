//! Validated configuration types.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigurationError, Result};

/// Flat key/value view of a configuration source.
pub type ConfigMap = BTreeMap<String, String>;

/// Recognised configuration keys.
pub mod keys {
    /// App bundle identifier, sent as `apns-topic`.
    pub const BUNDLE_ID: &str = "bundle_id";
    /// Identifier of the signing key registered with Apple.
    pub const KEY_ID: &str = "key_id";
    /// Developer team identifier, the token issuer.
    pub const TEAM_ID: &str = "team_id";
    /// Filesystem location of the `.p8` signing key.
    pub const PRIVATE_KEY_PATH: &str = "private_key_path";
    /// `sandbox` or `production`.
    pub const ENVIRONMENT: &str = "environment";
    /// Per-request timeout in milliseconds.
    pub const REQUEST_TIMEOUT_MS: &str = "request_timeout_ms";
    /// Base URL override (local gateways, tests).
    pub const ENDPOINT: &str = "endpoint";

    /// Required keys in validation order.
    pub const REQUIRED: [&str; 4] = [BUNDLE_ID, KEY_ID, TEAM_ID, PRIVATE_KEY_PATH];

    /// Every key a provider may supply.
    pub const ALL: [&str; 7] = [
        BUNDLE_ID,
        KEY_ID,
        TEAM_ID,
        PRIVATE_KEY_PATH,
        ENVIRONMENT,
        REQUEST_TIMEOUT_MS,
        ENDPOINT,
    ];
}

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Accepted range for `request_timeout_ms`.
const TIMEOUT_RANGE_MS: (u64, u64) = (1, 600_000);

// ─────────────────────────────────────────────────────────────────────────────
// Credentials
// ─────────────────────────────────────────────────────────────────────────────

/// Provider identity used to sign tokens and address the app.
///
/// All four fields are non-empty; construction fails otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    bundle_id: String,
    key_id: String,
    team_id: String,
    private_key_path: PathBuf,
}

impl Credentials {
    /// Build credentials, rejecting the first empty field in the order
    /// `bundle_id`, `key_id`, `team_id`, `private_key_path`.
    pub fn new(
        bundle_id: impl Into<String>,
        key_id: impl Into<String>,
        team_id: impl Into<String>,
        private_key_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let credentials = Self {
            bundle_id: bundle_id.into(),
            key_id: key_id.into(),
            team_id: team_id.into(),
            private_key_path: private_key_path.into(),
        };

        let fields = [
            (keys::BUNDLE_ID, credentials.bundle_id.trim().is_empty()),
            (keys::KEY_ID, credentials.key_id.trim().is_empty()),
            (keys::TEAM_ID, credentials.team_id.trim().is_empty()),
            (
                keys::PRIVATE_KEY_PATH,
                credentials.private_key_path.as_os_str().is_empty(),
            ),
        ];
        if let Some((key, _)) = fields.iter().find(|(_, empty)| *empty) {
            return Err(ConfigurationError::MissingKey(*key));
        }

        Ok(credentials)
    }

    /// Extract credentials from a configuration mapping.
    ///
    /// Absent and empty values are both reported as missing. A leading `~`
    /// in `private_key_path` expands to `$HOME`.
    pub fn from_map(map: &ConfigMap) -> Result<Self> {
        for key in keys::REQUIRED {
            if map.get(key).is_none_or(|v| v.trim().is_empty()) {
                return Err(ConfigurationError::MissingKey(key));
            }
        }

        let get = |key: &str| map.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

        Self::new(
            get(keys::BUNDLE_ID),
            get(keys::KEY_ID),
            get(keys::TEAM_ID),
            expand_home(&get(keys::PRIVATE_KEY_PATH)),
        )
    }

    /// App bundle identifier (the `apns-topic`).
    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }

    /// Signing key identifier (the token `kid`).
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Team identifier (the token `iss`).
    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    /// Location of the PEM-encoded P-256 private key.
    pub fn private_key_path(&self) -> &Path {
        &self.private_key_path
    }
}

/// Expand a leading `~` to the user's home directory.
pub(crate) fn expand_home(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/root".to_string());
        let rest = path.trim_start_matches('~').trim_start_matches('/');
        if rest.is_empty() {
            return PathBuf::from(home);
        }
        return PathBuf::from(home).join(rest);
    }
    PathBuf::from(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Environment
// ─────────────────────────────────────────────────────────────────────────────

/// APNs server environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApnsEnvironment {
    /// Development builds (`api.sandbox.push.apple.com`).
    #[default]
    Sandbox,
    /// App Store / TestFlight builds (`api.push.apple.com`).
    Production,
}

impl ApnsEnvironment {
    /// APNs server hostname.
    pub fn host(self) -> &'static str {
        match self {
            Self::Sandbox => "api.sandbox.push.apple.com",
            Self::Production => "api.push.apple.com",
        }
    }

    /// Base URL requests are issued against.
    pub fn base_url(self) -> String {
        format!("https://{}", self.host())
    }
}

impl fmt::Display for ApnsEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sandbox => f.write_str("sandbox"),
            Self::Production => f.write_str("production"),
        }
    }
}

impl FromStr for ApnsEnvironment {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" | "development" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(ConfigurationError::invalid(
                keys::ENVIRONMENT,
                format!("expected \"sandbox\" or \"production\", got \"{other}\""),
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ApnsSettings
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the dispatcher needs: credentials plus transport options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApnsSettings {
    /// Validated provider identity.
    pub credentials: Credentials,
    /// Target APNs environment.
    pub environment: ApnsEnvironment,
    /// Per-request timeout; expiry is a transport failure.
    pub request_timeout: Duration,
    /// Base URL override. When set it replaces the environment host.
    pub endpoint: Option<String>,
}

impl ApnsSettings {
    /// Settings for the given credentials with default options.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            environment: ApnsEnvironment::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            endpoint: None,
        }
    }

    /// Validate a configuration mapping.
    ///
    /// Required keys are checked first so a missing credential is always the
    /// reported error, even when optional keys are malformed too.
    pub fn from_map(map: &ConfigMap) -> Result<Self> {
        let credentials = Credentials::from_map(map)?;

        let environment = match non_empty(map, keys::ENVIRONMENT) {
            Some(v) => v.parse()?,
            None => ApnsEnvironment::default(),
        };
        let request_timeout = match non_empty(map, keys::REQUEST_TIMEOUT_MS) {
            Some(v) => parse_request_timeout(v)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };
        let endpoint = non_empty(map, keys::ENDPOINT).map(parse_endpoint).transpose()?;

        Ok(Self {
            credentials,
            environment,
            request_timeout,
            endpoint,
        })
    }

    /// Set the environment.
    #[must_use]
    pub fn with_environment(mut self, environment: ApnsEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Override the base URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
        self
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| self.environment.base_url())
    }
}

fn non_empty<'a>(map: &'a ConfigMap, key: &str) -> Option<&'a str> {
    map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Request timeout in milliseconds, range-checked.
fn parse_request_timeout(value: &str) -> Result<Duration> {
    let (min, max) = TIMEOUT_RANGE_MS;
    crate::loader::parse_u64_range(value, min, max)
        .map(Duration::from_millis)
        .ok_or_else(|| {
            ConfigurationError::invalid(
                keys::REQUEST_TIMEOUT_MS,
                format!("expected milliseconds in {min}..={max}, got \"{value}\""),
            )
        })
}

/// Base URL override; must be http(s). A trailing `/` is dropped.
fn parse_endpoint(value: &str) -> Result<String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value.trim_end_matches('/').to_string())
    } else {
        Err(ConfigurationError::invalid(
            keys::ENDPOINT,
            format!("expected an http(s) URL, got \"{value}\""),
        ))
    }
}

/// Check a single optional value the way [`ApnsSettings::from_map`] would.
///
/// Keys without a format constraint always pass.
pub(crate) fn check_value(key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        keys::ENVIRONMENT => value.parse::<ApnsEnvironment>().map(drop),
        keys::REQUEST_TIMEOUT_MS => parse_request_timeout(value).map(drop),
        keys::ENDPOINT => parse_endpoint(value).map(drop),
        _ => Ok(()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
