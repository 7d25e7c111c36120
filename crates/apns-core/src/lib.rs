//! # apns-core
//!
//! Foundation utilities shared by the APNs crates:
//!
//! - **Logging**: `tracing` subscriber setup and an in-memory capture layer for tests
//! - **Text**: UTF-8–safe truncation used to log device-token prefixes

#![deny(unsafe_code)]

pub mod logging;
pub mod text;
