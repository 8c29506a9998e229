// src/hal/mod.rs
//! Hardware abstraction layer for GestIC transports

pub mod simulator;
pub mod traits;
pub mod types;

pub use simulator::{RecordedMask, SimulatedTransport, SimulatorControls};
pub use traits::GesticTransport;
pub use types::{
    flags, status, OutputMask, RawAirWheel, RawGesture, RawPosition, RawSnapshot, RawTouch,
    RefreshStatus, TransportError, CHANNEL_COUNT,
};
