// src/hal/types.rs
//! Register-level types shared between transports and the decoder

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of electrode channels on a GestIC frontend.
pub const CHANNEL_COUNT: usize = 5;

/// Status codes reported by GestIC transport backends.
///
/// Zero is success, `NO_DATA` is the only transient code, everything
/// else ends the session.
pub mod status {
    /// Request completed.
    pub const NO_ERROR: i32 = 0;
    /// No new frame arrived within the refresh timeout.
    pub const NO_DATA: i32 = -1;
    /// Backend library failure.
    pub const SYSTEM_ERROR: i32 = -8;
    /// The device did not answer a request.
    pub const NO_RESPONSE: i32 = -9;
    /// An expected protocol message never arrived.
    pub const MSG_MISSING: i32 = -10;
    /// I/O against the connection failed.
    pub const IO_ERROR: i32 = -16;
    /// Device control call failed.
    pub const IO_CTL_ERROR: i32 = -17;
    /// The connection could not be opened.
    pub const IO_OPEN_ERROR: i32 = -18;
    /// Device enumeration failed.
    pub const IO_ENUM_ERROR: i32 = -19;
    /// A request argument was rejected.
    pub const BAD_PARAM: i32 = -32;
    /// The backend does not implement the request.
    pub const NO_IMPLEMENTATION: i32 = -48;
}

/// Bit assignments used by the sensor's result registers.
pub mod flags {
    /// Touch flag, south electrode.
    pub const TOUCH_SOUTH: u16 = 0x0001;
    /// Touch flag, west electrode.
    pub const TOUCH_WEST: u16 = 0x0002;
    /// Touch flag, north electrode.
    pub const TOUCH_NORTH: u16 = 0x0004;
    /// Touch flag, east electrode.
    pub const TOUCH_EAST: u16 = 0x0008;
    /// Touch flag, center electrode.
    pub const TOUCH_CENTER: u16 = 0x0010;

    /// Tap flag, south electrode.
    pub const TAP_SOUTH: u16 = 0x0020;
    /// Tap flag, west electrode.
    pub const TAP_WEST: u16 = 0x0040;
    /// Tap flag, north electrode.
    pub const TAP_NORTH: u16 = 0x0080;
    /// Tap flag, east electrode.
    pub const TAP_EAST: u16 = 0x0100;
    /// Tap flag, center electrode.
    pub const TAP_CENTER: u16 = 0x0200;

    /// Double-tap flag, south electrode.
    pub const DOUBLE_TAP_SOUTH: u16 = 0x0400;
    /// Double-tap flag, west electrode.
    pub const DOUBLE_TAP_WEST: u16 = 0x0800;
    /// Double-tap flag, north electrode.
    pub const DOUBLE_TAP_NORTH: u16 = 0x1000;
    /// Double-tap flag, east electrode.
    pub const DOUBLE_TAP_EAST: u16 = 0x2000;
    /// Double-tap flag, center electrode.
    pub const DOUBLE_TAP_CENTER: u16 = 0x4000;

    /// The flick started from an electrode edge.
    pub const GESTURE_EDGE_FLICK: u32 = 0x0001_0000;
    /// Gesture recognition is still in progress.
    pub const GESTURE_IN_PROGRESS: u32 = 0x8000_0000;
}

/// Selection of result categories the sensor streams with each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputMask(pub u16);

impl OutputMask {
    /// DSP status word.
    pub const DSP_STATUS: OutputMask = OutputMask(0x0001);
    /// Recognized gestures.
    pub const GESTURE: OutputMask = OutputMask(0x0002);
    /// Touch and tap flags.
    pub const TOUCH: OutputMask = OutputMask(0x0004);
    /// AirWheel rotation counter.
    pub const AIR_WHEEL: OutputMask = OutputMask(0x0008);
    /// 3D position.
    pub const POSITION: OutputMask = OutputMask(0x0010);
    /// Per-channel noise power.
    pub const NOISE_POWER: OutputMask = OutputMask(0x0020);
    /// Raw CIC signal levels.
    pub const CIC: OutputMask = OutputMask(0x0800);
    /// Signal deviation from the calibrated baseline.
    pub const SD: OutputMask = OutputMask(0x1000);
    /// Every category the firmware can stream.
    pub const ALL: OutputMask = OutputMask(0x183F);

    /// Raw mask bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// True when every category in `other` is selected here too.
    pub const fn contains(self, other: OutputMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for OutputMask {
    fn default() -> Self {
        OutputMask::ALL
    }
}

impl BitOr for OutputMask {
    type Output = OutputMask;

    fn bitor(self, rhs: OutputMask) -> OutputMask {
        OutputMask(self.0 | rhs.0)
    }
}

impl fmt::Display for OutputMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// Outcome of one transport refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStatus {
    /// A complete new result frame is available.
    Ready,
    /// No frame arrived within the refresh timeout; poll again.
    NoData,
    /// The transport failed with the given status code and the session
    /// cannot recover.
    Fatal(i32),
}

impl RefreshStatus {
    /// Classify a raw backend status code.
    pub fn from_code(code: i32) -> Self {
        match code {
            status::NO_ERROR => RefreshStatus::Ready,
            status::NO_DATA => RefreshStatus::NoData,
            other => RefreshStatus::Fatal(other),
        }
    }
}

/// Non-success status reported by a transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("transport status {code}")]
pub struct TransportError {
    /// Raw backend status code.
    pub code: i32,
}

impl TransportError {
    /// Wrap a raw backend status code.
    pub fn new(code: i32) -> Self {
        Self { code }
    }
}

/// 3D position registers, device units, full `0..=65535` range per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawPosition {
    /// West to east.
    pub x: i32,
    /// South to north.
    pub y: i32,
    /// Surface towards open air.
    pub z: i32,
}

/// Gesture result registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawGesture {
    /// Recognized gesture code, zero while none.
    pub code: u8,
    /// Qualifier bits, see [`flags`].
    pub flags: u32,
    /// Sample ticks since the last recognized gesture.
    pub last_event: u32,
}

/// Touch and tap result registers.
///
/// Tap and double-tap activity share `tap_flags` and the single
/// `last_tap_event` counter; the firmware does not keep separate
/// double-tap timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawTouch {
    /// Touch flag bits, see [`flags`].
    pub flags: u16,
    /// Tap and double-tap flag bits, see [`flags`].
    pub tap_flags: u16,
    /// Sample ticks since the last touch event.
    pub last_event: u32,
    /// Sample ticks since the last tap or double-tap event.
    pub last_tap_event: u32,
}

/// AirWheel result registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawAirWheel {
    /// Rotation progress counter; one full clockwise turn advances it
    /// by roughly 32.
    pub counter: i32,
    /// An AirWheel gesture is currently being performed.
    pub active: bool,
    /// Sample ticks since the last AirWheel update.
    pub last_event: u32,
}

/// One coherent snapshot of the sensor's result registers, pulled after
/// a refresh reported [`RefreshStatus::Ready`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawSnapshot {
    /// Raw CIC signal level per channel.
    pub cic: [f32; CHANNEL_COUNT],
    /// Deviation of each channel from its calibrated baseline.
    pub signal_deviation: [f32; CHANNEL_COUNT],
    /// 3D position registers.
    pub position: RawPosition,
    /// Gesture registers.
    pub gesture: RawGesture,
    /// Touch and tap registers.
    pub touch: RawTouch,
    /// AirWheel registers.
    pub air_wheel: RawAirWheel,
}
