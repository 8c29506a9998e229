// src/config/mod.rs
//! Driver configuration

pub mod constants;
pub mod device_config;

pub use device_config::{ConfigError, DeviceConfig};
