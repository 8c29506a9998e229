// src/config/constants.rs
//! Driver-wide defaults and validation bounds

/// Device session constants.
pub mod device {
    /// Interval between sensor result frames, in milliseconds.
    pub const DEFAULT_POLL_INTERVAL_MS: u32 = 100;
    /// Timeout handed to each transport refresh call, in milliseconds.
    pub const DEFAULT_REFRESH_TIMEOUT_MS: u32 = 100;
    /// Reply buffer size for firmware-version queries, in bytes.
    pub const FW_VERSION_BUF_LEN: usize = 120;
    /// Timeout for firmware-version queries, in milliseconds.
    pub const FW_QUERY_TIMEOUT_MS: u32 = 100;

    /// Validation bounds for the frame interval.
    pub const MIN_POLL_INTERVAL_MS: u32 = 1;
    /// Upper bound for the frame interval.
    pub const MAX_POLL_INTERVAL_MS: u32 = 1_000;
    /// Upper bound for the refresh timeout.
    pub const MAX_REFRESH_TIMEOUT_MS: u32 = 10_000;
}

/// Event-stream constants.
pub mod stream {
    /// Bounded queue capacity between the polling loop and consumers.
    pub const DEFAULT_CAPACITY: usize = 16;
    /// Upper bound for the stream capacity.
    pub const MAX_CAPACITY: usize = 1_024;
    /// Upper bound for the optional no-data backoff.
    pub const MAX_NO_DATA_BACKOFF_MS: u64 = 1_000;
    /// How often a blocked publish re-checks the stop flag, in
    /// milliseconds.
    pub const PUBLISH_STOP_POLL_MS: u64 = 20;
}
