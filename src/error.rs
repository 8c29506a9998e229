// src/error.rs
//! Driver error taxonomy
//!
//! Three things can go wrong from a caller's point of view: the session
//! never came up, a synchronous query failed, or the streaming session
//! died. Transient no-data polls are handled inside the polling loop
//! and never surface here.

use thiserror::Error;

use crate::config::device_config::ConfigError;
use crate::hal::types::TransportError;

/// Errors surfaced by the driver core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GesticError {
    /// The supplied device configuration was rejected.
    #[error("invalid device configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Allocating or opening the sensor session failed. The transport
    /// was released; retry with a fresh one.
    #[error("could not connect to GestIC device ({0})")]
    ConnectionFailed(TransportError),

    /// The firmware-version query did not produce a usable string.
    /// The session stays usable; the caller may retry.
    #[error("could not read firmware version ({0})")]
    QueryFailed(QueryFailure),

    /// The transport failed in a way the streaming session cannot
    /// recover from. The polling loop has stopped for good.
    #[error("fatal transport error ({0})")]
    Fatal(TransportError),
}

/// Reason a firmware-version query was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryFailure {
    /// The transport reported a non-success status.
    #[error("{0}")]
    Transport(TransportError),
    /// The reply buffer carried no NUL terminator.
    #[error("reply missing NUL terminator")]
    MissingTerminator,
    /// The reply bytes were not valid UTF-8.
    #[error("reply is not valid UTF-8")]
    InvalidUtf8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::types::status;

    #[test]
    fn connection_error_names_the_status_code() {
        let err = GesticError::ConnectionFailed(TransportError::new(status::IO_OPEN_ERROR));
        assert!(err.to_string().contains("-18"));
        assert!(err.to_string().contains("connect"));
    }

    #[test]
    fn query_failure_reasons_are_distinguishable() {
        let status = GesticError::QueryFailed(QueryFailure::Transport(TransportError::new(
            status::NO_RESPONSE,
        )));
        let nul = GesticError::QueryFailed(QueryFailure::MissingTerminator);
        let utf8 = GesticError::QueryFailed(QueryFailure::InvalidUtf8);

        assert!(status.to_string().contains("-9"));
        assert!(nul.to_string().contains("NUL"));
        assert!(utf8.to_string().contains("UTF-8"));
    }

    #[test]
    fn errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GesticError>();
    }
}
