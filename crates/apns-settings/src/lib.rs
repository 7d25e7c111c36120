//! # apns-settings
//!
//! Provider identity and transport options for token-based APNs delivery.
//!
//! Configuration arrives as a flat string mapping from a [`ConfigProvider`]
//! (JSON file, environment, static map, or a layered combination). It is
//! validated into [`ApnsSettings`] before any key or network work happens;
//! a missing source or missing required key is a [`ConfigurationError`].

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod provider;
pub mod types;

pub use errors::{ConfigurationError, Result};
pub use loader::{default_config_path, env_var_name, load_settings, load_settings_from_path, resolve};
pub use provider::{
    ConfigProvider, EnvConfigProvider, FileConfigProvider, LayeredConfigProvider,
    StaticConfigProvider,
};
pub use types::{ApnsEnvironment, ApnsSettings, ConfigMap, Credentials, DEFAULT_REQUEST_TIMEOUT, keys};
