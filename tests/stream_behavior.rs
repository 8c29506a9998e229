// tests/stream_behavior.rs
//! Delivery semantics of the bounded gesture event stream

use std::time::{Duration, Instant};

use serial_test::serial;

use gestic_core::hal::flags;
use gestic_core::{
    DeviceConfig, GesticDevice, GestureType, RawGesture, RawTouch, RefreshStatus,
    SimulatedTransport, StreamClosed,
};

fn wait_until(deadline: Duration, mut condition: impl FnMut() -> bool) {
    let start = Instant::now();
    while !condition() {
        assert!(
            start.elapsed() < deadline,
            "condition not reached within {deadline:?}"
        );
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn a_full_queue_drains_in_publish_order_unmodified() {
    let transport = SimulatedTransport::new();
    let controls = transport.controls();
    controls.set_auto_advance(true);
    controls.set_gesture(RawGesture {
        code: 0x01,
        flags: 0,
        last_event: 4,
    });
    controls.set_touch(RawTouch {
        flags: flags::TOUCH_WEST,
        tap_flags: 0,
        last_event: 9,
        last_tap_event: 0,
    });

    let mut device = GesticDevice::open(transport).unwrap();
    let stream = device.data_stream();
    let capacity = stream.capacity();
    assert_eq!(capacity, 16);

    // Fill the queue to capacity before the first receive.
    controls.push_ready_frames(capacity);
    wait_until(Duration::from_secs(2), || {
        device.stats().published == capacity as u64
    });

    for expected_x in 1..=capacity as i32 {
        let message = stream
            .recv_timeout(Duration::from_secs(2))
            .unwrap()
            .expect("a scripted frame");
        assert_eq!(message.position.x, expected_x);
        assert_eq!(message.gesture.gesture, GestureType::FlickWestToEast);
        assert_eq!(message.gesture.count_since_last, 4);
        assert!(message.touch.west && message.touch.active());
        assert_eq!(message.touch.count_since_last, 9);
    }
    assert!(stream.try_recv().unwrap().is_none());
    device.close();
}

#[test]
#[serial]
fn a_full_queue_blocks_the_producer_until_a_slot_frees() {
    let transport = SimulatedTransport::new();
    let controls = transport.controls();
    controls.set_auto_advance(true);
    controls.set_idle(RefreshStatus::Ready);

    let config = DeviceConfig {
        stream_capacity: 2,
        ..DeviceConfig::default()
    };
    let mut device = GesticDevice::open_with_config(transport, config).unwrap();
    let stream = device.data_stream();

    // The producer fills both slots, then parks inside its third
    // publish instead of dropping or reordering.
    wait_until(Duration::from_secs(2), || device.stats().published == 2);
    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(device.stats().published, 2);
    assert_eq!(stream.len(), 2);

    // One drained slot unblocks exactly one pending publish.
    assert_eq!(stream.recv().unwrap().position.x, 1);
    wait_until(Duration::from_secs(2), || device.stats().published == 3);

    assert_eq!(stream.recv().unwrap().position.x, 2);
    assert_eq!(stream.recv().unwrap().position.x, 3);
    device.close();
}

#[test]
#[serial]
fn close_interrupts_a_publish_parked_on_a_full_queue() {
    let transport = SimulatedTransport::new();
    let controls = transport.controls();
    controls.set_idle(RefreshStatus::Ready);

    let config = DeviceConfig {
        stream_capacity: 1,
        ..DeviceConfig::default()
    };
    let mut device = GesticDevice::open_with_config(transport, config).unwrap();
    let stream = device.data_stream();

    wait_until(Duration::from_secs(2), || device.stats().published == 1);

    // Nothing consumes; the producer is parked. Close must still
    // return promptly and release the transport.
    let closing = Instant::now();
    device.close();
    assert!(closing.elapsed() < Duration::from_secs(1));
    assert!(controls.was_closed());

    // The queued message survives the shutdown, then the terminal
    // condition follows.
    assert!(stream.recv().is_ok());
    assert_eq!(stream.recv(), Err(StreamClosed::Closed));
}

#[test]
fn each_message_reaches_exactly_one_consumer() {
    let transport = SimulatedTransport::new();
    let controls = transport.controls();
    controls.set_auto_advance(true);
    controls.push_ready_frames(8);

    let mut device = GesticDevice::open(transport).unwrap();
    let first = device.data_stream();
    let second = device.data_stream();

    let mut seen = Vec::new();
    for round in 0..4 {
        let from_first = first
            .recv_timeout(Duration::from_secs(2))
            .unwrap()
            .unwrap_or_else(|| panic!("first consumer starved in round {round}"));
        let from_second = second
            .recv_timeout(Duration::from_secs(2))
            .unwrap()
            .unwrap_or_else(|| panic!("second consumer starved in round {round}"));
        seen.push(from_first.position.x);
        seen.push(from_second.position.x);
    }

    assert_eq!(seen, (1..=8).collect::<Vec<_>>());
    device.close();
}

#[test]
fn recv_timeout_distinguishes_quiet_from_terminated() {
    let transport = SimulatedTransport::new();
    let config = DeviceConfig {
        no_data_backoff_ms: 1,
        ..DeviceConfig::default()
    };
    let mut device = GesticDevice::open_with_config(transport, config).unwrap();
    let stream = device.data_stream();

    // Alive but quiet: the timeout elapses without a terminal error.
    assert!(stream
        .recv_timeout(Duration::from_millis(30))
        .unwrap()
        .is_none());

    device.close();
    assert_eq!(
        stream.recv_timeout(Duration::from_secs(1)),
        Err(StreamClosed::Closed)
    );
}

#[test]
fn iterator_ends_when_the_stream_terminates() {
    let transport = SimulatedTransport::new();
    let controls = transport.controls();
    controls.set_auto_advance(true);
    controls.push_ready_frames(3);
    controls.push_refresh(RefreshStatus::Fatal(gestic_core::hal::status::IO_ERROR));

    let mut device = GesticDevice::open(transport).unwrap();
    let stream = device.data_stream();

    let positions: Vec<i32> = stream.iter().map(|message| message.position.x).collect();
    assert_eq!(positions, vec![1, 2, 3]);
    assert!(matches!(stream.recv(), Err(StreamClosed::Fault(_))));
    device.close();
}

#[test]
fn late_consumers_share_the_same_queue() {
    let transport = SimulatedTransport::new();
    let controls = transport.controls();
    controls.set_auto_advance(true);
    controls.push_ready_frames(2);

    let mut device = GesticDevice::open(transport).unwrap();
    let first = device.data_stream();
    assert_eq!(
        first
            .recv_timeout(Duration::from_secs(2))
            .unwrap()
            .unwrap()
            .position
            .x,
        1
    );

    // A consumer attached after messages flowed sees the live queue,
    // not a replay.
    let second = device.data_stream();
    assert_eq!(
        second
            .recv_timeout(Duration::from_secs(2))
            .unwrap()
            .unwrap()
            .position
            .x,
        2
    );
    device.close();
}
