//! gestic-core: event-streaming driver core for GestIC 3D gesture sensors
//!
//! GestIC chips sit behind a request/response transport and report
//! capacitive signal levels, a 3D hand position, recognized gestures,
//! touch/tap activity and AirWheel rotation. This crate turns that
//! register interface into a continuous stream of decoded events:
//!
//! - A [`GesticDevice`] handle that exclusively owns one transport
//!   session and manages its lifecycle
//! - A pure decoder from raw result registers to [`GestureMessage`]
//! - A background polling loop feeding a bounded FIFO [`EventStream`]
//!   that throttles the producer instead of dropping messages
//! - A scriptable [`SimulatedTransport`] for tests and demos
//!
//! # Quick Start
//!
//! ```rust
//! use gestic_core::{GesticDevice, RefreshStatus, SimulatedTransport};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = SimulatedTransport::new();
//!     transport.controls().push_refresh(RefreshStatus::Ready);
//!
//!     let mut device = GesticDevice::open(transport)?;
//!     println!("firmware: {}", device.firmware_version()?);
//!
//!     let stream = device.data_stream();
//!     let message = stream.recv()?;
//!     println!("position: {}", message.position);
//!
//!     device.close();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod acquisition;
pub mod config;
pub mod device;
pub mod error;
pub mod hal;
pub mod message;

// Re-export the everyday surface at the crate root.
pub use acquisition::{EventStream, PollerStats, StreamClosed};
pub use config::{ConfigError, DeviceConfig};
pub use device::GesticDevice;
pub use error::{GesticError, QueryFailure};
pub use hal::{
    GesticTransport, OutputMask, RawAirWheel, RawGesture, RawPosition, RawSnapshot, RawTouch,
    RefreshStatus, SimulatedTransport, SimulatorControls, TransportError,
};
pub use message::{
    decode, AirWheelState, GestureEvent, GestureMessage, GestureType, Position, Signal, ZoneState,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Version of this driver, available without an open device handle.
pub fn driver_version() -> &'static str {
    VERSION
}
