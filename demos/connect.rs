// demos/connect.rs
//! Open a GestIC session and close it cleanly

use gestic_core::{driver_version, GesticDevice, SimulatedTransport};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("GestIC connect demo (driver {})", driver_version());

    let transport = SimulatedTransport::new();
    let device = GesticDevice::open(transport)?;
    println!("Successfully connected to GestIC device");

    device.close();
    println!("Session closed");
    Ok(())
}
