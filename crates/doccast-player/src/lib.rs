//! Time-synchronized bidirectional replay engine for doccast recordings.
//!
//! [`Player`] keeps a live document and its viewport consistent with an
//! external scalar clock (typically an audio element's playback
//! position), supporting arbitrary forward and backward seeks.
//!
//! # Architecture
//!
//! - the host forwards clock notifications via
//!   [`clock_event`](Player::clock_event) and drives
//!   [`on_frame`](Player::on_frame) once per presentation frame while
//!   [`FrameReport::wants_frame`] is true
//! - each frame runs at most one reconciliation pass, applying or
//!   undoing the steps between the playback cursor and the clock's
//!   current reading
//! - inverses returned by the document's [`DeltaApplier`] are kept in a
//!   [`ReverseCache`] so backward seeks can undo previously applied
//!   steps exactly
//!
//! Seeking backward past territory never visited forward is a
//! [`SyncError::ReplayGap`]: the timeline segment's inverses were never
//! computed, and skipping them would leave the document inconsistent.
//! Recovery is re-deriving the document from the log's initial
//! snapshot, handing its applier to [`Player::reset`], then playing
//! forward again.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod error;
pub mod player;

pub use cache::ReverseCache;
pub use error::{ConfigError, SyncError};
pub use player::{ClockEvent, FrameReport, Player, PlayerConfig, SkippedStep};
