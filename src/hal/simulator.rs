// src/hal/simulator.rs
//! In-memory GestIC transport for tests and demos
//!
//! The simulated transport answers every trait call from scripted
//! state: refresh outcomes pop from a queue, the register snapshot is
//! whatever was last installed, and the firmware reply is a settable
//! byte buffer. A [`SimulatorControls`] handle shares the same state,
//! so tests keep steering the transport after it moved into a device
//! handle.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;

use crate::hal::traits::GesticTransport;
use crate::hal::types::{
    OutputMask, RawAirWheel, RawGesture, RawPosition, RawTouch, RefreshStatus, TransportError,
    CHANNEL_COUNT,
};

const DEFAULT_FIRMWARE_REPLY: &[u8] = b"GestIC-sim 1.0.0;p:sim;DSP:0.0\0";

#[derive(Debug)]
struct SimInner {
    open_result: Result<(), TransportError>,
    mask_result: Result<(), TransportError>,
    fw_result: Result<(), TransportError>,
    firmware_reply: Vec<u8>,
    script: VecDeque<RefreshStatus>,
    idle: RefreshStatus,
    cic: [f32; CHANNEL_COUNT],
    signal_deviation: [f32; CHANNEL_COUNT],
    position: RawPosition,
    gesture: RawGesture,
    touch: RawTouch,
    air_wheel: RawAirWheel,
    jitter: f32,
    auto_advance: bool,
    opened: bool,
    closed: bool,
    recorded_mask: Option<RecordedMask>,
}

/// Arguments of the last `set_output_mask` call, as the transport saw
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedMask {
    /// Signal categories requested.
    pub signals: OutputMask,
    /// Position categories requested.
    pub position: OutputMask,
    /// Gesture categories requested.
    pub gestures: OutputMask,
    /// Frame interval requested, in milliseconds.
    pub interval_ms: u32,
}

impl Default for SimInner {
    fn default() -> Self {
        Self {
            open_result: Ok(()),
            mask_result: Ok(()),
            fw_result: Ok(()),
            firmware_reply: DEFAULT_FIRMWARE_REPLY.to_vec(),
            script: VecDeque::new(),
            idle: RefreshStatus::NoData,
            cic: [480.0, 500.0, 520.0, 540.0, 560.0],
            signal_deviation: [0.0; CHANNEL_COUNT],
            position: RawPosition::default(),
            gesture: RawGesture::default(),
            touch: RawTouch::default(),
            air_wheel: RawAirWheel::default(),
            jitter: 0.0,
            auto_advance: false,
            opened: false,
            closed: false,
            recorded_mask: None,
        }
    }
}

/// Simulated transport backend.
#[derive(Debug)]
pub struct SimulatedTransport {
    inner: Arc<Mutex<SimInner>>,
}

impl SimulatedTransport {
    /// Transport that opens successfully and reports no data until
    /// refresh outcomes are scripted.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SimInner::default())),
        }
    }

    /// Transport whose `open` fails with the given status code.
    pub fn failing_open(code: i32) -> Self {
        let transport = Self::new();
        transport.inner.lock().open_result = Err(TransportError::new(code));
        transport
    }

    /// Apply up to `jitter` of random perturbation to every signal
    /// channel on each ready frame.
    pub fn with_jitter(self, jitter: f32) -> Self {
        self.inner.lock().jitter = jitter;
        self
    }

    /// Steering handle sharing this transport's state.
    pub fn controls(&self) -> SimulatorControls {
        SimulatorControls {
            inner: self.inner.clone(),
        }
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// Steering handle for a [`SimulatedTransport`], usable after the
/// transport moved into a device handle.
#[derive(Clone)]
pub struct SimulatorControls {
    inner: Arc<Mutex<SimInner>>,
}

impl SimulatorControls {
    /// Queue the outcome of the next refresh call.
    pub fn push_refresh(&self, status: RefreshStatus) {
        self.inner.lock().script.push_back(status);
    }

    /// Queue `count` ready frames.
    pub fn push_ready_frames(&self, count: usize) {
        let mut inner = self.inner.lock();
        for _ in 0..count {
            inner.script.push_back(RefreshStatus::Ready);
        }
    }

    /// Outcome refresh reports once the script is drained.
    pub fn set_idle(&self, status: RefreshStatus) {
        self.inner.lock().idle = status;
    }

    /// Advance the x position register by one on every ready frame, so
    /// consecutive frames stay distinguishable.
    pub fn set_auto_advance(&self, enabled: bool) {
        self.inner.lock().auto_advance = enabled;
    }

    /// Install the position registers returned by the next frames.
    pub fn set_position(&self, position: RawPosition) {
        self.inner.lock().position = position;
    }

    /// Install the gesture registers returned by the next frames.
    pub fn set_gesture(&self, gesture: RawGesture) {
        self.inner.lock().gesture = gesture;
    }

    /// Install the touch registers returned by the next frames.
    pub fn set_touch(&self, touch: RawTouch) {
        self.inner.lock().touch = touch;
    }

    /// Install the AirWheel registers returned by the next frames.
    pub fn set_air_wheel(&self, air_wheel: RawAirWheel) {
        self.inner.lock().air_wheel = air_wheel;
    }

    /// Install the signal registers returned by the next frames.
    pub fn set_signals(&self, cic: [f32; CHANNEL_COUNT], deviation: [f32; CHANNEL_COUNT]) {
        let mut inner = self.inner.lock();
        inner.cic = cic;
        inner.signal_deviation = deviation;
    }

    /// Replace the raw firmware-version reply, including any NUL
    /// terminator.
    pub fn set_firmware_reply(&self, reply: &[u8]) {
        self.inner.lock().firmware_reply = reply.to_vec();
    }

    /// Make `set_output_mask` fail with the given status code.
    pub fn fail_output_mask(&self, code: i32) {
        self.inner.lock().mask_result = Err(TransportError::new(code));
    }

    /// Make firmware-version queries fail with the given status code.
    pub fn fail_firmware_query(&self, code: i32) {
        self.inner.lock().fw_result = Err(TransportError::new(code));
    }

    /// Arguments of the last `set_output_mask` call.
    pub fn recorded_mask(&self) -> Option<RecordedMask> {
        self.inner.lock().recorded_mask
    }

    /// True once the transport connection was opened.
    pub fn was_opened(&self) -> bool {
        self.inner.lock().opened
    }

    /// True once the transport connection was released.
    pub fn was_closed(&self) -> bool {
        self.inner.lock().closed
    }
}

impl GesticTransport for SimulatedTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.open_result?;
        inner.opened = true;
        Ok(())
    }

    fn close(&mut self) {
        self.inner.lock().closed = true;
    }

    fn set_output_mask(
        &mut self,
        signals: OutputMask,
        position: OutputMask,
        gestures: OutputMask,
        interval_ms: u32,
    ) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.mask_result?;
        inner.recorded_mask = Some(RecordedMask {
            signals,
            position,
            gestures,
            interval_ms,
        });
        Ok(())
    }

    fn query_firmware_version(
        &mut self,
        reply: &mut [u8],
        _timeout_ms: u32,
    ) -> Result<(), TransportError> {
        let inner = self.inner.lock();
        inner.fw_result?;
        let n = reply.len().min(inner.firmware_reply.len());
        reply[..n].copy_from_slice(&inner.firmware_reply[..n]);
        Ok(())
    }

    fn refresh(&mut self, _timeout_ms: u32) -> RefreshStatus {
        let mut inner = self.inner.lock();
        let status = inner.script.pop_front().unwrap_or(inner.idle);
        if status == RefreshStatus::Ready {
            if inner.auto_advance {
                inner.position.x = inner.position.x.wrapping_add(1);
            }
            if inner.jitter > 0.0 {
                let mut rng = rand::thread_rng();
                let jitter = inner.jitter;
                for channel in inner.cic.iter_mut() {
                    *channel += rng.gen_range(-jitter..=jitter);
                }
                for channel in inner.signal_deviation.iter_mut() {
                    *channel += rng.gen_range(-jitter..=jitter);
                }
            }
        }
        status
    }

    fn cic_signals(&self) -> [f32; CHANNEL_COUNT] {
        self.inner.lock().cic
    }

    fn signal_deviation(&self) -> [f32; CHANNEL_COUNT] {
        self.inner.lock().signal_deviation
    }

    fn position(&self) -> RawPosition {
        self.inner.lock().position
    }

    fn gesture(&self) -> RawGesture {
        self.inner.lock().gesture
    }

    fn touch(&self) -> RawTouch {
        self.inner.lock().touch
    }

    fn air_wheel(&self) -> RawAirWheel {
        self.inner.lock().air_wheel
    }
}
