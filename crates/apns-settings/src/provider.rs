//! Configuration sources.
//!
//! A [`ConfigProvider`] produces the flat [`ConfigMap`] the validator
//! consumes. Where the mapping comes from is the provider's business; the
//! dispatcher never sees it.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{ConfigurationError, Result};
use crate::loader::env_var_name;
use crate::types::{ConfigMap, check_value, keys};

/// A source of configuration values.
pub trait ConfigProvider: Send + Sync {
    /// Produce the configuration mapping.
    ///
    /// A source that cannot be located is [`ConfigurationError::NotFound`].
    fn load(&self) -> Result<ConfigMap>;
}

// ─────────────────────────────────────────────────────────────────────────────
// File
// ─────────────────────────────────────────────────────────────────────────────

/// Reads a flat JSON object from disk.
///
/// String values are taken as-is, numbers and booleans are stringified,
/// `null` entries are skipped. Nested objects and arrays are rejected.
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: PathBuf,
    optional: bool,
}

impl FileConfigProvider {
    /// Provider for a file that must exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            optional: false,
        }
    }

    /// Treat a missing file as an empty mapping instead of an error.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Location this provider reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for FileConfigProvider {
    fn load(&self) -> Result<ConfigMap> {
        if !self.path.exists() {
            if self.optional {
                debug!(path = ?self.path, "optional configuration file absent");
                return Ok(ConfigMap::new());
            }
            return Err(ConfigurationError::NotFound {
                path: self.path.clone(),
            });
        }

        debug!(path = ?self.path, "loading configuration from file");
        let content = std::fs::read_to_string(&self.path)?;
        let value: Value = serde_json::from_str(&content)?;
        flatten_object(value)
    }
}

/// Convert a top-level JSON object into a [`ConfigMap`].
fn flatten_object(value: Value) -> Result<ConfigMap> {
    let Value::Object(object) = value else {
        return Err(ConfigurationError::invalid(
            "<root>",
            "configuration file must contain a JSON object",
        ));
    };

    let mut map = ConfigMap::new();
    for (key, value) in object {
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(ConfigurationError::invalid(
                    key,
                    "expected a string, number, or boolean",
                ));
            }
        };
        let _ = map.insert(key, text);
    }
    Ok(map)
}

// ─────────────────────────────────────────────────────────────────────────────
// Environment
// ─────────────────────────────────────────────────────────────────────────────

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads `APNS_<KEY>` variables for every recognised key.
///
/// Empty variables are ignored, as are values that fail the key's format or
/// range check (each logged with `warn!`). The variable lookup is injectable so tests do
/// not have to mutate the process environment.
pub struct EnvConfigProvider {
    lookup: Lookup,
}

impl EnvConfigProvider {
    /// Provider backed by the process environment.
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Provider backed by a custom variable lookup.
    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Default for EnvConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EnvConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvConfigProvider").finish_non_exhaustive()
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn load(&self) -> Result<ConfigMap> {
        let mut map = ConfigMap::new();
        for key in keys::ALL {
            let name = env_var_name(key);
            match (self.lookup)(&name) {
                Some(v) if !v.trim().is_empty() => {
                    if let Err(e) = check_value(key, &v) {
                        warn!(var = %name, error = %e, "invalid environment override, ignoring");
                        continue;
                    }
                    debug!(var = %name, "configuration override from environment");
                    let _ = map.insert(key.to_string(), v);
                }
                Some(_) => {
                    warn!(var = %name, "empty environment override, ignoring");
                }
                None => {}
            }
        }
        Ok(map)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Static
// ─────────────────────────────────────────────────────────────────────────────

/// A fixed mapping supplied by the host application.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    map: ConfigMap,
}

impl StaticConfigProvider {
    /// Wrap an existing mapping.
    pub fn new(map: ConfigMap) -> Self {
        Self { map }
    }

    /// Add or replace one entry.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.map.insert(key.into(), value.into());
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn load(&self) -> Result<ConfigMap> {
        Ok(self.map.clone())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Layered
// ─────────────────────────────────────────────────────────────────────────────

/// Merges several providers; later layers override earlier ones per key.
///
/// The first layer error aborts loading.
#[derive(Default)]
pub struct LayeredConfigProvider {
    layers: Vec<Box<dyn ConfigProvider>>,
}

impl LayeredConfigProvider {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a layer on top of the existing ones.
    #[must_use]
    pub fn layer(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.layers.push(Box::new(provider));
        self
    }
}

impl ConfigProvider for LayeredConfigProvider {
    fn load(&self) -> Result<ConfigMap> {
        let mut merged = ConfigMap::new();
        for layer in &self.layers {
            merged.extend(layer.load()?);
        }
        Ok(merged)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
