// src/hal/traits.rs
//! Transport trait every GestIC backend implements

use crate::hal::types::{
    OutputMask, RawAirWheel, RawGesture, RawPosition, RawSnapshot, RawTouch, RefreshStatus,
    TransportError,
};

/// One exclusive request/response session with a GestIC sensor.
///
/// Implementations wrap a physical connection (vendor library handle,
/// serial bridge) or a simulated one. Constructing the value allocates
/// the session; [`open`](Self::open) establishes the connection and
/// [`close`](Self::close) releases it. All calls block; timeouts are
/// enforced inside the transport, never by callers.
///
/// The register getters return whatever the last successful
/// [`refresh`](Self::refresh) left behind. They stay valid until the
/// next refresh overwrites the result registers.
pub trait GesticTransport: Send + 'static {
    /// Establish the physical connection.
    fn open(&mut self) -> Result<(), TransportError>;

    /// Release the connection. Called exactly once, after the polling
    /// loop has stopped.
    fn close(&mut self);

    /// Select which result categories the sensor streams and the
    /// interval between frames.
    fn set_output_mask(
        &mut self,
        signals: OutputMask,
        position: OutputMask,
        gestures: OutputMask,
        interval_ms: u32,
    ) -> Result<(), TransportError>;

    /// Synchronous firmware-version query. On success the transport
    /// fills `reply` with a NUL-terminated version string; the query
    /// gives up after `timeout_ms`.
    fn query_firmware_version(
        &mut self,
        reply: &mut [u8],
        timeout_ms: u32,
    ) -> Result<(), TransportError>;

    /// Ask the sensor for a fresh result frame, blocking up to
    /// `timeout_ms` for one to arrive.
    fn refresh(&mut self, timeout_ms: u32) -> RefreshStatus;

    /// Raw CIC signal level per electrode channel.
    fn cic_signals(&self) -> [f32; super::types::CHANNEL_COUNT];

    /// Deviation of each channel from its calibrated baseline.
    fn signal_deviation(&self) -> [f32; super::types::CHANNEL_COUNT];

    /// Last reported 3D position.
    fn position(&self) -> RawPosition;

    /// Gesture result registers.
    fn gesture(&self) -> RawGesture;

    /// Touch and tap result registers.
    fn touch(&self) -> RawTouch;

    /// AirWheel result registers.
    fn air_wheel(&self) -> RawAirWheel;

    /// Pull one coherent snapshot of the current result registers.
    fn snapshot(&self) -> RawSnapshot {
        RawSnapshot {
            cic: self.cic_signals(),
            signal_deviation: self.signal_deviation(),
            position: self.position(),
            gesture: self.gesture(),
            touch: self.touch(),
            air_wheel: self.air_wheel(),
        }
    }
}
