// demos/fw_version.rs
//! Query the sensor firmware version over an open session

use gestic_core::{GesticDevice, SimulatedTransport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let transport = SimulatedTransport::new();
    let device = GesticDevice::open(transport)?;
    println!("Successfully connected to GestIC device");

    let version = device.firmware_version()?;
    println!("Device firmware version: {version}");

    device.close();
    Ok(())
}
