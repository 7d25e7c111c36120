//! Settings loading with environment variable overrides.
//!
//! Loading flow:
//! 1. Read the JSON configuration file (required; a missing file is
//!    [`ConfigurationError::NotFound`])
//! 2. Apply `APNS_*` environment variable overrides (highest priority)
//! 3. Validate the merged mapping into [`ApnsSettings`]

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Result;
use crate::provider::{ConfigProvider, EnvConfigProvider, FileConfigProvider, LayeredConfigProvider};
use crate::types::ApnsSettings;

/// Resolve the default configuration path (`~/.apns/config.json`).
pub fn default_config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".apns").join("config.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<ApnsSettings> {
    load_settings_from_path(&default_config_path())
}

/// Load settings from a specific path with env var overrides.
pub fn load_settings_from_path(path: &Path) -> Result<ApnsSettings> {
    let provider = LayeredConfigProvider::new()
        .layer(FileConfigProvider::new(path))
        .layer(EnvConfigProvider::new());
    resolve(&provider)
}

/// Resolve and validate settings from any provider.
pub fn resolve(provider: &dyn ConfigProvider) -> Result<ApnsSettings> {
    let map = provider.load()?;
    debug!(keys = ?map.keys().collect::<Vec<_>>(), "configuration resolved");
    let settings = ApnsSettings::from_map(&map)?;
    debug!(
        key_id = %settings.credentials.key_id(),
        team_id = %settings.credentials.team_id(),
        bundle_id = %settings.credentials.bundle_id(),
        environment = %settings.environment,
        "APNS settings validated"
    );
    Ok(settings)
}

/// Environment variable carrying the override for a configuration key.
///
/// `bundle_id` → `APNS_BUNDLE_ID`.
pub fn env_var_name(key: &str) -> String {
    format!("APNS_{}", key.to_ascii_uppercase())
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
