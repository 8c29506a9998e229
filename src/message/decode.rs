// src/message/decode.rs
//! Pure mapping from raw result registers to a [`GestureMessage`]

use std::time::SystemTime;

use crate::hal::types::{flags, RawGesture, RawSnapshot, RawTouch};
use crate::message::{
    AirWheelState, GestureEvent, GestureMessage, GestureType, Position, Signal, ZoneState,
};

/// Decode one register snapshot into an immutable gesture message.
///
/// Total over every possible snapshot: unknown gesture codes classify
/// as [`GestureType::Unknown`] and unassigned flag bits are ignored.
/// The timestamp is taken at decode time.
pub fn decode(snapshot: &RawSnapshot) -> GestureMessage {
    GestureMessage {
        time: SystemTime::now(),
        raw_cic_signals: Signal {
            channels: snapshot.cic,
        },
        signal_deviation: Signal {
            channels: snapshot.signal_deviation,
        },
        position: Position {
            x: snapshot.position.x,
            y: snapshot.position.y,
            z: snapshot.position.z,
        },
        gesture: gesture_event(&snapshot.gesture),
        touch: touch_zones(&snapshot.touch),
        tap: tap_zones(&snapshot.touch),
        double_tap: double_tap_zones(&snapshot.touch),
        air_wheel: AirWheelState {
            counter: snapshot.air_wheel.counter,
            active: snapshot.air_wheel.active,
            count_since_last: snapshot.air_wheel.last_event,
        },
    }
}

fn gesture_event(raw: &RawGesture) -> GestureEvent {
    GestureEvent {
        gesture: GestureType::from_code(raw.code),
        edge_flick: raw.flags & flags::GESTURE_EDGE_FLICK != 0,
        in_progress: raw.flags & flags::GESTURE_IN_PROGRESS != 0,
        count_since_last: raw.last_event,
    }
}

fn touch_zones(raw: &RawTouch) -> ZoneState {
    ZoneState {
        north: raw.flags & flags::TOUCH_NORTH != 0,
        east: raw.flags & flags::TOUCH_EAST != 0,
        south: raw.flags & flags::TOUCH_SOUTH != 0,
        west: raw.flags & flags::TOUCH_WEST != 0,
        center: raw.flags & flags::TOUCH_CENTER != 0,
        count_since_last: raw.last_event,
    }
}

fn tap_zones(raw: &RawTouch) -> ZoneState {
    ZoneState {
        north: raw.tap_flags & flags::TAP_NORTH != 0,
        east: raw.tap_flags & flags::TAP_EAST != 0,
        south: raw.tap_flags & flags::TAP_SOUTH != 0,
        west: raw.tap_flags & flags::TAP_WEST != 0,
        center: raw.tap_flags & flags::TAP_CENTER != 0,
        count_since_last: raw.last_tap_event,
    }
}

fn double_tap_zones(raw: &RawTouch) -> ZoneState {
    ZoneState {
        north: raw.tap_flags & flags::DOUBLE_TAP_NORTH != 0,
        east: raw.tap_flags & flags::DOUBLE_TAP_EAST != 0,
        south: raw.tap_flags & flags::DOUBLE_TAP_SOUTH != 0,
        west: raw.tap_flags & flags::DOUBLE_TAP_WEST != 0,
        center: raw.tap_flags & flags::DOUBLE_TAP_CENTER != 0,
        // The firmware keeps one shared tick counter for taps and
        // double taps.
        count_since_last: raw.last_tap_event,
    }
}
