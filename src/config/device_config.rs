// src/config/device_config.rs
//! Device session configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::constants::{device, stream};
use crate::hal::types::OutputMask;

/// Tunables for one sensor session.
///
/// The defaults reproduce the behavior most GestIC deployments expect:
/// every result category enabled at a 100 ms frame interval, a 16-slot
/// event stream, and immediate re-poll after a no-data cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Signal categories the sensor should stream.
    pub signal_mask: OutputMask,
    /// Position categories the sensor should stream.
    pub position_mask: OutputMask,
    /// Gesture categories the sensor should stream.
    pub gesture_mask: OutputMask,
    /// Interval between sensor result frames, in milliseconds.
    pub poll_interval_ms: u32,
    /// Timeout handed to each transport refresh call, in milliseconds.
    pub refresh_timeout_ms: u32,
    /// Capacity of the bounded event stream.
    pub stream_capacity: usize,
    /// Sleep after a no-data cycle, in milliseconds. Zero re-polls
    /// immediately.
    pub no_data_backoff_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            signal_mask: OutputMask::ALL,
            position_mask: OutputMask::ALL,
            gesture_mask: OutputMask::ALL,
            poll_interval_ms: device::DEFAULT_POLL_INTERVAL_MS,
            refresh_timeout_ms: device::DEFAULT_REFRESH_TIMEOUT_MS,
            stream_capacity: stream::DEFAULT_CAPACITY,
            no_data_backoff_ms: 0,
        }
    }
}

impl DeviceConfig {
    /// Check every field against its supported range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms < device::MIN_POLL_INTERVAL_MS
            || self.poll_interval_ms > device::MAX_POLL_INTERVAL_MS
        {
            return Err(ConfigError::PollInterval(self.poll_interval_ms));
        }
        if self.refresh_timeout_ms == 0 || self.refresh_timeout_ms > device::MAX_REFRESH_TIMEOUT_MS
        {
            return Err(ConfigError::RefreshTimeout(self.refresh_timeout_ms));
        }
        if self.stream_capacity == 0 || self.stream_capacity > stream::MAX_CAPACITY {
            return Err(ConfigError::StreamCapacity(self.stream_capacity));
        }
        if self.no_data_backoff_ms > stream::MAX_NO_DATA_BACKOFF_MS {
            return Err(ConfigError::NoDataBackoff(self.no_data_backoff_ms));
        }
        Ok(())
    }

    pub(crate) fn no_data_backoff(&self) -> Duration {
        Duration::from_millis(self.no_data_backoff_ms)
    }
}

/// Rejected [`DeviceConfig`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Frame interval outside the supported range.
    #[error("poll interval of {0} ms is out of range")]
    PollInterval(u32),
    /// Refresh timeout outside the supported range.
    #[error("refresh timeout of {0} ms is out of range")]
    RefreshTimeout(u32),
    /// Stream capacity outside the supported range.
    #[error("stream capacity of {0} is out of range")]
    StreamCapacity(usize),
    /// No-data backoff above the supported cap.
    #[error("no-data backoff of {0} ms is out of range")]
    NoDataBackoff(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = DeviceConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.refresh_timeout_ms, 100);
        assert_eq!(config.stream_capacity, 16);
        assert_eq!(config.no_data_backoff_ms, 0);
        assert_eq!(config.signal_mask, OutputMask::ALL);
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let config = DeviceConfig {
            poll_interval_ms: 0,
            ..DeviceConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PollInterval(0)));
    }

    #[test]
    fn zero_capacity_stream_is_rejected() {
        let config = DeviceConfig {
            stream_capacity: 0,
            ..DeviceConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::StreamCapacity(0)));
    }

    #[test]
    fn oversized_backoff_is_rejected() {
        let config = DeviceConfig {
            no_data_backoff_ms: 30_000,
            ..DeviceConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoDataBackoff(30_000)));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = DeviceConfig {
            poll_interval_ms: 25,
            stream_capacity: 64,
            ..DeviceConfig::default()
        };
        let encoded = serde_json::to_string(&config).unwrap();
        let decoded: DeviceConfig = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let decoded: DeviceConfig = serde_json::from_str(r#"{"poll_interval_ms": 50}"#).unwrap();
        assert_eq!(decoded.poll_interval_ms, 50);
        assert_eq!(decoded.stream_capacity, 16);
    }
}
