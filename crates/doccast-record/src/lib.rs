//! Live session capture for doccast recordings.
//!
//! [`ActiveRecording`] turns a live editing session into an
//! [`EventLog`](doccast_core::EventLog): it captures the initial document
//! snapshot, then consumes a stamped event feed of deltas and viewport
//! movements until stopped.
//!
//! # Architecture
//!
//! - [`ActiveRecording::start`] captures the snapshot atomically and hands
//!   back a [`FeedSender`] — the session's single live subscription pair
//! - the host emits deltas and viewport moves through the feed as they
//!   happen; each event is stamped with its elapsed-time offset at emission
//! - the host calls [`pump`](ActiveRecording::pump) once per frame to drain
//!   the feed into the log (viewport moves pass through a debouncer so
//!   continuous scrolling does not flood the log)
//! - [`stop`](ActiveRecording::stop) drains once more, flushes the
//!   debouncer, stops audio capture, and seals the recording
//!
//! Dropping the recording (or every `FeedSender` clone) severs the feed;
//! no listener survives a start/stop cycle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod debounce;
pub mod feed;
pub mod recorder;

pub use clock::MonotonicClock;
pub use debounce::Debounce;
pub use feed::FeedSender;
pub use recorder::{
    ActiveRecording, CompletedRecording, RecorderConfig, RecorderError, DEFAULT_SCROLL_DEBOUNCE,
};
