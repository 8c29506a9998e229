// src/acquisition/mod.rs
//! Polling loop and event-stream plumbing

pub mod event_stream;
pub mod poller;

pub use event_stream::{EventStream, StreamClosed};
pub use poller::PollerStats;
