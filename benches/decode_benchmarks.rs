
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gestic_core::hal::{flags, RawAirWheel, RawGesture, RawPosition, RawSnapshot, RawTouch};
use gestic_core::{decode, GestureType};

fn idle_snapshot() -> RawSnapshot {
    RawSnapshot {
        cic: [480.0, 500.0, 520.0, 540.0, 560.0],
        ..RawSnapshot::default()
    }
}

fn busy_snapshot() -> RawSnapshot {
    RawSnapshot {
        cic: [412.5, 430.0, 401.25, 455.75, 420.0],
        signal_deviation: [12.5, -3.0, 8.25, -15.75, 4.0],
        position: RawPosition {
            x: 21_000,
            y: 47_000,
            z: 9_000,
        },
        gesture: RawGesture {
            code: 0x06,
            flags: flags::GESTURE_EDGE_FLICK | flags::GESTURE_IN_PROGRESS,
            last_event: 42,
        },
        touch: RawTouch {
            flags: flags::TOUCH_NORTH | flags::TOUCH_CENTER,
            tap_flags: flags::TAP_EAST | flags::DOUBLE_TAP_WEST,
            last_event: 11,
            last_tap_event: 13,
        },
        air_wheel: RawAirWheel {
            counter: 96,
            active: true,
            last_event: 3,
        },
    }
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(1));

    for (name, snapshot) in [("idle", idle_snapshot()), ("busy", busy_snapshot())] {
        group.bench_with_input(BenchmarkId::new("snapshot", name), &snapshot, |b, raw| {
            b.iter(|| decode(black_box(raw)));
        });
    }

    group.finish();
}

fn benchmark_gesture_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("gesture_classification");
    group.throughput(Throughput::Elements(256));

    group.bench_function("from_code_full_range", |b| {
        b.iter(|| {
            for code in 0u8..=255 {
                black_box(GestureType::from_code(black_box(code)));
            }
        });
    });

    group.finish();
}

fn benchmark_decode_rate(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_rate");
    let snapshot = busy_snapshot();

    // One second of frames at the default 100 ms interval is 10
    // decodes; benchmark a bursty 1000 to expose per-call overhead.
    group.throughput(Throughput::Elements(1000));
    group.bench_function("burst_1000", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                black_box(decode(black_box(&snapshot)));
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_decode,
    benchmark_gesture_classification,
    benchmark_decode_rate
);
criterion_main!(benches);
