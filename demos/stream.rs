// demos/stream.rs
//! Stream decoded gesture messages from a simulated sensor
//!
//! The simulator produces an endless run of frames with a wandering
//! position and jittering signal levels; partway through, a gesture and
//! a touch are injected so every part of a message shows up. A small
//! stream capacity keeps the decode pipeline close behind the consumer.

use std::time::Duration;

use gestic_core::hal::flags;
use gestic_core::{
    DeviceConfig, GesticDevice, GestureType, RawGesture, RawTouch, RefreshStatus,
    SimulatedTransport,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let transport = SimulatedTransport::new().with_jitter(4.0);
    let controls = transport.controls();
    controls.set_auto_advance(true);
    controls.set_idle(RefreshStatus::Ready);

    let config = DeviceConfig {
        stream_capacity: 4,
        ..DeviceConfig::default()
    };
    let mut device = GesticDevice::open_with_config(transport, config)?;
    println!("Successfully connected to GestIC device");
    println!("Firmware: {}", device.firmware_version()?);
    println!();

    let stream = device.data_stream();
    for (frame, message) in stream.iter().take(20).enumerate() {
        println!(
            "frame {frame:>2}: pos {}  touch {}  wheel {:>3}  cic {}",
            message.position, message.touch, message.air_wheel.counter, message.raw_cic_signals
        );
        if message.gesture.gesture != GestureType::None {
            println!("          gesture recognized: {}", message.gesture);
        }

        // Steer the registers mid-run; the injected values reach the
        // consumer a few frames later, once the queued tail drains.
        match frame {
            5 => controls.set_gesture(RawGesture {
                code: 0x05,
                flags: 0,
                last_event: 0,
            }),
            7 => controls.set_gesture(RawGesture::default()),
            10 => controls.set_touch(RawTouch {
                flags: flags::TOUCH_NORTH | flags::TOUCH_CENTER,
                tap_flags: 0,
                last_event: 0,
                last_tap_event: 0,
            }),
            13 => controls.set_touch(RawTouch::default()),
            _ => {}
        }

        // A deliberately slow consumer; the bounded stream throttles
        // the polling loop to match.
        std::thread::sleep(Duration::from_millis(50));
    }

    let stats = device.stats();
    println!();
    println!(
        "polling loop ran {} cycles, published {} messages",
        stats.cycles, stats.published
    );

    device.close();
    println!("Session closed");
    Ok(())
}
