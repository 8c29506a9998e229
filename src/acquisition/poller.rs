// src/acquisition/poller.rs
//! Background polling loop driving a transport session
//!
//! One dedicated thread owns the refresh cadence: ask the transport for
//! a frame, decode it, publish it, repeat. A no-data cycle just polls
//! again. A fatal transport status records the fault and ends the loop;
//! it never panics and never retries a dead session.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, debug_span, error, trace};

use crate::acquisition::event_stream::{EventPublisher, Publish};
use crate::config::DeviceConfig;
use crate::error::GesticError;
use crate::hal::traits::GesticTransport;
use crate::hal::types::{RawSnapshot, RefreshStatus, TransportError};
use crate::message::decode;

/// Counters kept by the polling loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollerStats {
    /// Refresh cycles executed, whatever their outcome.
    pub cycles: u64,
    /// Messages published to the event stream.
    pub published: u64,
    /// Cycles that ended without new data.
    pub no_data: u64,
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    cycles: AtomicU64,
    published: AtomicU64,
    no_data: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn snapshot(&self) -> PollerStats {
        PollerStats {
            cycles: self.cycles.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
            no_data: self.no_data.load(Ordering::Relaxed),
        }
    }
}

/// Owning handle on the spawned polling thread.
#[derive(Debug)]
pub(crate) struct PollerHandle {
    thread: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl PollerHandle {
    pub(crate) fn spawn<T: GesticTransport>(
        transport: Arc<Mutex<T>>,
        publisher: EventPublisher,
        config: &DeviceConfig,
        stats: Arc<StatsCounters>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let refresh_timeout_ms = config.refresh_timeout_ms;
        let backoff = config.no_data_backoff();
        let thread = {
            let stop = stop.clone();
            thread::spawn(move || {
                run_poll_loop(transport, publisher, stop, refresh_timeout_ms, backoff, stats)
            })
        };
        Self {
            thread: Some(thread),
            stop,
        }
    }

    /// Signal the loop to stop and wait for the thread to finish. The
    /// loop observes the flag within one refresh timeout, one publish
    /// re-check or one backoff sleep, whichever it is blocked in.
    pub(crate) fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("gesture polling thread panicked");
            }
        }
    }
}

enum Cycle {
    Frame(RawSnapshot),
    Empty,
    Failed(i32),
}

fn run_poll_loop<T: GesticTransport>(
    transport: Arc<Mutex<T>>,
    publisher: EventPublisher,
    stop: Arc<AtomicBool>,
    refresh_timeout_ms: u32,
    backoff: Duration,
    stats: Arc<StatsCounters>,
) {
    let _span = debug_span!("gestic_poll").entered();
    debug!("polling loop started");
    loop {
        if stop.load(Ordering::Acquire) {
            debug!("stop requested; polling loop exiting");
            return;
        }
        stats.cycles.fetch_add(1, Ordering::Relaxed);

        // Hold the transport lock for the refresh and the register
        // snapshot only, never across a publish.
        let cycle = {
            let mut session = transport.lock();
            match session.refresh(refresh_timeout_ms) {
                RefreshStatus::Ready => Cycle::Frame(session.snapshot()),
                RefreshStatus::NoData => Cycle::Empty,
                RefreshStatus::Fatal(code) => Cycle::Failed(code),
            }
        };

        match cycle {
            Cycle::Frame(snapshot) => {
                let message = decode(&snapshot);
                match publisher.publish(message, &stop) {
                    Publish::Sent => {
                        stats.published.fetch_add(1, Ordering::Relaxed);
                    }
                    Publish::Stopped => {
                        debug!("stop requested during publish; polling loop exiting");
                        return;
                    }
                    Publish::ConsumersGone => {
                        debug!("all stream consumers dropped; polling loop exiting");
                        return;
                    }
                }
            }
            Cycle::Empty => {
                stats.no_data.fetch_add(1, Ordering::Relaxed);
                trace!("no new frame; re-polling");
                if !backoff.is_zero() {
                    thread::sleep(backoff);
                }
            }
            Cycle::Failed(code) => {
                error!(code, "fatal transport status; gesture polling stopped");
                publisher.record_fault(GesticError::Fatal(TransportError::new(code)));
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::event_stream::{stream_pair, StreamClosed};
    use crate::hal::simulator::SimulatedTransport;
    use crate::hal::types::status;

    fn spawn_with(
        transport: SimulatedTransport,
        config: &DeviceConfig,
    ) -> (
        PollerHandle,
        crate::acquisition::event_stream::EventStream,
        Arc<Mutex<Option<GesticError>>>,
        Arc<StatsCounters>,
    ) {
        let fault: Arc<Mutex<Option<GesticError>>> = Arc::new(Mutex::new(None));
        let (publisher, stream) = stream_pair(config.stream_capacity, fault.clone());
        let stats = Arc::new(StatsCounters::default());
        let handle = PollerHandle::spawn(
            Arc::new(Mutex::new(transport)),
            publisher,
            config,
            stats.clone(),
        );
        (handle, stream, fault, stats)
    }

    #[test]
    fn fatal_status_records_fault_and_ends_the_loop() {
        let transport = SimulatedTransport::new();
        transport.controls().push_refresh(RefreshStatus::Fatal(status::IO_ERROR));
        let config = DeviceConfig::default();
        let (mut handle, stream, fault, _stats) = spawn_with(transport, &config);

        assert_eq!(
            stream.recv(),
            Err(StreamClosed::Fault(GesticError::Fatal(TransportError::new(
                status::IO_ERROR
            ))))
        );
        assert_eq!(
            *fault.lock(),
            Some(GesticError::Fatal(TransportError::new(status::IO_ERROR)))
        );
        handle.stop();
    }

    #[test]
    fn scripted_frames_are_published_in_order() {
        let transport = SimulatedTransport::new();
        let controls = transport.controls();
        controls.set_auto_advance(true);
        controls.push_refresh(RefreshStatus::Ready);
        controls.push_refresh(RefreshStatus::Ready);
        controls.push_refresh(RefreshStatus::Ready);
        let config = DeviceConfig::default();
        let (mut handle, stream, _fault, stats) = spawn_with(transport, &config);

        let first = stream.recv().unwrap().position.x;
        let second = stream.recv().unwrap().position.x;
        let third = stream.recv().unwrap().position.x;
        assert_eq!((second - first, third - second), (1, 1));

        handle.stop();
        assert_eq!(stats.snapshot().published, 3);
    }

    #[test]
    fn stop_interrupts_an_idle_loop() {
        let transport = SimulatedTransport::new();
        let config = DeviceConfig {
            no_data_backoff_ms: 1,
            ..DeviceConfig::default()
        };
        let (mut handle, stream, fault, stats) = spawn_with(transport, &config);

        thread::sleep(Duration::from_millis(20));
        handle.stop();

        assert!(stats.snapshot().no_data > 0);
        assert!(fault.lock().is_none());
        assert_eq!(stream.recv(), Err(StreamClosed::Closed));
    }
}
