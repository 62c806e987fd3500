//! Core types and traits for the doccast session recording framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the recorded-session data model ([`EventLog`], [`DeltaSet`],
//! [`ViewportPosition`]), the trait seams through which the external
//! document, clock, and audio collaborators are consumed, and the core
//! error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ApplyError, AudioError, LogError, SnapshotError};
pub use traits::{
    AudioCapture, DeltaApplier, PlaybackClock, SessionClock, SnapshotSource, ViewportSink,
};
pub use types::{
    AudioSource, DeltaSet, EventLog, Recording, Scroll, Seconds, Step, ViewportPosition,
};
