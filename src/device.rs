// src/device.rs
//! Device handle: session lifecycle and the public driver surface

use std::str;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::acquisition::event_stream::{stream_pair, EventStream, FaultSlot};
use crate::acquisition::poller::{PollerHandle, PollerStats, StatsCounters};
use crate::config::constants::device;
use crate::config::DeviceConfig;
use crate::error::{GesticError, QueryFailure};
use crate::hal::traits::GesticTransport;

/// Open handle on one GestIC sensor session.
///
/// The handle exclusively owns its transport. [`open`](Self::open)
/// establishes the connection and configures the output mask;
/// [`data_stream`](Self::data_stream) starts the background polling
/// loop. Dropping the handle performs the same orderly shutdown as
/// [`close`](Self::close): the polling loop is stopped and joined
/// first, then the transport connection is released, so the loop never
/// observes a closed session.
#[derive(Debug)]
pub struct GesticDevice<T: GesticTransport> {
    transport: Arc<Mutex<T>>,
    config: DeviceConfig,
    fault: FaultSlot,
    stats: Arc<StatsCounters>,
    poller: Option<PollerHandle>,
    stream: Option<EventStream>,
    closed: bool,
}

impl<T: GesticTransport> GesticDevice<T> {
    /// Open a session with the default configuration.
    pub fn open(transport: T) -> Result<Self, GesticError> {
        Self::open_with_config(transport, DeviceConfig::default())
    }

    /// Open a session with an explicit configuration.
    ///
    /// Takes ownership of the transport. On any failure the transport
    /// is released with the session never half-open; retry with a fresh
    /// transport.
    pub fn open_with_config(mut transport: T, config: DeviceConfig) -> Result<Self, GesticError> {
        config.validate()?;

        transport.open().map_err(GesticError::ConnectionFailed)?;
        if let Err(error) = transport.set_output_mask(
            config.signal_mask,
            config.position_mask,
            config.gesture_mask,
            config.poll_interval_ms,
        ) {
            transport.close();
            return Err(GesticError::ConnectionFailed(error));
        }

        debug!(
            interval_ms = config.poll_interval_ms,
            capacity = config.stream_capacity,
            "GestIC session opened"
        );
        Ok(Self {
            transport: Arc::new(Mutex::new(transport)),
            config,
            fault: Arc::new(Mutex::new(None)),
            stats: Arc::new(StatsCounters::default()),
            poller: None,
            stream: None,
            closed: false,
        })
    }

    /// Firmware version string reported by the sensor.
    ///
    /// Issues a bounded synchronous query and trims the reply at its
    /// first NUL. Safe to call while the polling loop is running; the
    /// query and the loop serialize on the transport.
    pub fn firmware_version(&self) -> Result<String, GesticError> {
        let mut reply = [0u8; device::FW_VERSION_BUF_LEN];
        self.transport
            .lock()
            .query_firmware_version(&mut reply, device::FW_QUERY_TIMEOUT_MS)
            .map_err(|error| GesticError::QueryFailed(QueryFailure::Transport(error)))?;

        let terminator = reply
            .iter()
            .position(|&byte| byte == 0)
            .ok_or(GesticError::QueryFailed(QueryFailure::MissingTerminator))?;
        let version = str::from_utf8(&reply[..terminator])
            .map_err(|_| GesticError::QueryFailed(QueryFailure::InvalidUtf8))?;
        Ok(version.to_owned())
    }

    /// Stream of decoded gesture messages.
    ///
    /// The first call starts the background polling loop; each call
    /// returns another consumer handle on the same bounded FIFO queue.
    /// Every message goes to exactly one consumer.
    pub fn data_stream(&mut self) -> EventStream {
        if let Some(stream) = &self.stream {
            return stream.clone();
        }
        let (publisher, stream) = stream_pair(self.config.stream_capacity, self.fault.clone());
        let poller = PollerHandle::spawn(
            self.transport.clone(),
            publisher,
            &self.config,
            self.stats.clone(),
        );
        self.poller = Some(poller);
        self.stream = Some(stream.clone());
        debug!("gesture polling loop attached");
        stream
    }

    /// Counters from the polling loop. All zeros before the first
    /// [`data_stream`](Self::data_stream) call.
    pub fn stats(&self) -> PollerStats {
        self.stats.snapshot()
    }

    /// The fatal error that stopped the polling loop, if one occurred.
    pub fn fault(&self) -> Option<GesticError> {
        self.fault.lock().clone()
    }

    /// The configuration this session was opened with.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Shut the session down: stop and join the polling loop, then
    /// release the transport connection.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
        self.transport.lock().close();
        debug!("GestIC session closed");
    }
}

impl<T: GesticTransport> Drop for GesticDevice<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
