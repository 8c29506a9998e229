// src/message/mod.rs
//! Decoded gesture telemetry published on the event stream

pub mod decode;

pub use decode::decode;

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::hal::types::CHANNEL_COUNT;

/// Fixed five-channel signal vector.
///
/// Channel order follows the reference electrode layout: south, west,
/// north, east, center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Signal {
    /// Per-electrode readings.
    pub channels: [f32; CHANNEL_COUNT],
}

/// 3D position in device units.
///
/// `x` runs west to east, `y` south to north, `z` from the sensing
/// surface towards open air. Each axis spans the full `0..=65535`
/// range; values are passed through unclamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// West to east.
    pub x: i32,
    /// South to north.
    pub y: i32,
    /// Surface towards open air.
    pub z: i32,
}

/// Gestures the sensor firmware recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GestureType {
    /// No gesture recognized in this frame.
    #[default]
    None,
    /// Flick west to east.
    FlickWestToEast,
    /// Flick east to west.
    FlickEastToWest,
    /// Flick south to north.
    FlickSouthToNorth,
    /// Flick north to south.
    FlickNorthToSouth,
    /// Clockwise circle.
    CircleClockwise,
    /// Counter-clockwise circle.
    CircleCounterClockwise,
    /// A code this driver does not know, kept verbatim for diagnostics.
    Unknown(u8),
}

impl GestureType {
    /// Classify a raw firmware gesture code. Total: codes outside the
    /// known set come back as [`GestureType::Unknown`].
    pub fn from_code(code: u8) -> Self {
        match code {
            0x00 => GestureType::None,
            0x01 => GestureType::FlickWestToEast,
            0x02 => GestureType::FlickEastToWest,
            0x03 => GestureType::FlickSouthToNorth,
            0x04 => GestureType::FlickNorthToSouth,
            0x05 => GestureType::CircleClockwise,
            0x06 => GestureType::CircleCounterClockwise,
            other => GestureType::Unknown(other),
        }
    }

    /// Raw firmware code for this gesture.
    pub fn code(self) -> u8 {
        match self {
            GestureType::None => 0x00,
            GestureType::FlickWestToEast => 0x01,
            GestureType::FlickEastToWest => 0x02,
            GestureType::FlickSouthToNorth => 0x03,
            GestureType::FlickNorthToSouth => 0x04,
            GestureType::CircleClockwise => 0x05,
            GestureType::CircleCounterClockwise => 0x06,
            GestureType::Unknown(code) => code,
        }
    }
}

/// One recognized gesture with its qualifier flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GestureEvent {
    /// The recognized gesture, [`GestureType::None`] while idle.
    pub gesture: GestureType,
    /// The flick started from an electrode edge.
    pub edge_flick: bool,
    /// Recognition is still running; `gesture` stays `None` until it
    /// completes.
    pub in_progress: bool,
    /// Sample ticks since the last recognized gesture.
    pub count_since_last: u32,
}

/// Electrode zone activation for touch, tap or double-tap events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoneState {
    /// North electrode active.
    pub north: bool,
    /// East electrode active.
    pub east: bool,
    /// South electrode active.
    pub south: bool,
    /// West electrode active.
    pub west: bool,
    /// Center electrode active.
    pub center: bool,
    /// Sample ticks since the last event of this kind.
    pub count_since_last: u32,
}

impl ZoneState {
    /// True when any electrode zone is active.
    pub fn active(&self) -> bool {
        self.north || self.east || self.south || self.west || self.center
    }
}

/// Continuous rotary (AirWheel) gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AirWheelState {
    /// Rotation progress counter. One full clockwise turn advances it
    /// by roughly 32; counter-clockwise motion runs it backwards.
    pub counter: i32,
    /// An AirWheel gesture is currently being performed.
    pub active: bool,
    /// Sample ticks since the last AirWheel update.
    pub count_since_last: u32,
}

/// Everything the sensor reported for one result frame.
///
/// A message is decoded fresh each polling cycle and never mutated
/// afterwards; receiving one from the event stream transfers ownership
/// to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureMessage {
    /// When the frame was decoded, not when the sensor sampled it.
    pub time: SystemTime,
    /// Raw CIC signal levels.
    pub raw_cic_signals: Signal,
    /// Deviation of each channel from its calibrated baseline.
    pub signal_deviation: Signal,
    /// 3D position.
    pub position: Position,
    /// Recognized gesture.
    pub gesture: GestureEvent,
    /// Touch zone activity.
    pub touch: ZoneState,
    /// Tap zone activity.
    pub tap: ZoneState,
    /// Double-tap zone activity.
    pub double_tap: ZoneState,
    /// AirWheel rotation state.
    pub air_wheel: AirWheelState,
}

impl GestureMessage {
    /// Decode timestamp as nanoseconds since the Unix epoch.
    pub fn decoded_at_nanos(&self) -> u64 {
        self.time
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.channels;
        write!(f, "[{},{},{},{},{}]", c[0], c[1], c[2], c[3], c[4])
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{X:{} Y:{} Z:{}}}", self.x, self.y, self.z)
    }
}

impl fmt::Display for GestureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureType::None => write!(f, "None"),
            GestureType::FlickWestToEast => write!(f, "FlickWestToEast"),
            GestureType::FlickEastToWest => write!(f, "FlickEastToWest"),
            GestureType::FlickSouthToNorth => write!(f, "FlickSouthToNorth"),
            GestureType::FlickNorthToSouth => write!(f, "FlickNorthToSouth"),
            GestureType::CircleClockwise => write!(f, "CircleClockwise"),
            GestureType::CircleCounterClockwise => write!(f, "CircleCounterClockwise"),
            GestureType::Unknown(code) => write!(f, "Unknown({code:#04x})"),
        }
    }
}

impl fmt::Display for GestureEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{} edge_flick:{} in_progress:{}}}",
            self.gesture, self.edge_flick, self.in_progress
        )
    }
}

impl fmt::Display for ZoneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut zones = [""; 5];
        let mut n = 0;
        for (active, name) in [
            (self.north, "North"),
            (self.south, "South"),
            (self.east, "East"),
            (self.west, "West"),
            (self.center, "Center"),
        ] {
            if active {
                zones[n] = name;
                n += 1;
            }
        }
        write!(f, "{{{}}}", zones[..n].join(", "))
    }
}
