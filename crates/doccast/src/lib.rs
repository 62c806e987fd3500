//! Doccast: session recording and time-synchronized replay for reactive
//! documents.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all doccast sub-crates. For most users, adding `doccast` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use doccast::prelude::*;
//!
//! // A one-cell document whose deltas are single-byte writes.
//! struct Cell(u8);
//! impl DeltaApplier for Cell {
//!     fn apply(&mut self, delta: &DeltaSet) -> Result<DeltaSet, ApplyError> {
//!         let mut inverse = DeltaSet::new();
//!         for op in delta.ops() {
//!             inverse.push(vec![self.0]);
//!             self.0 = op[0];
//!         }
//!         Ok(inverse)
//!     }
//! }
//!
//! // A viewport that resolves every anchor.
//! struct AnyAnchor;
//! impl ViewportSink for AnyAnchor {
//!     fn scroll_to(&mut self, _target: &ViewportPosition) -> bool { true }
//! }
//!
//! // A recorded session: the cell becomes 7 at 1.0s, then 9 at 2.0s.
//! let mut log = EventLog::new(vec![0]);
//! log.steps.push(Step { at: 1.0, delta: DeltaSet::from_ops(vec![vec![7]]) });
//! log.steps.push(Step { at: 2.0, delta: DeltaSet::from_ops(vec![vec![9]]) });
//!
//! // Replay it against a fresh document, driven by a host clock.
//! struct At(f64);
//! impl PlaybackClock for At {
//!     fn current_time(&self) -> Seconds { self.0 }
//!     fn paused(&self) -> bool { true }
//! }
//!
//! let config = PlayerConfig::new(log, Box::new(Cell(0)), Box::new(AnyAnchor));
//! let mut player = Player::new(config).unwrap();
//!
//! player.clock_event(ClockEvent::Seeked);
//! let report = player.on_frame(&At(1.5)).unwrap();
//! assert_eq!(report.applied, 1);
//! assert_eq!(player.cursor(), 1.5);
//!
//! player.clock_event(ClockEvent::Seeked);
//! let report = player.on_frame(&At(0.0)).unwrap();
//! assert_eq!(report.reverted, 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `doccast-core` | Event log, deltas, viewport positions, trait seams |
//! | [`record`] | `doccast-record` | Live session capture and the event feed |
//! | [`codec`] | `doccast-codec` | Binary serialization of recordings |
//! | [`player`] | `doccast-player` | Clock-driven bidirectional replay |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and trait seams (`doccast-core`).
///
/// The recorded-session data model ([`types::EventLog`],
/// [`types::DeltaSet`], [`types::ViewportPosition`]) and the traits
/// through which the host document, clocks, and audio capture are
/// consumed.
pub use doccast_core as types;

/// Live session capture (`doccast-record`).
///
/// Start a session with [`record::ActiveRecording::start`], feed it
/// through the returned [`record::FeedSender`], pump once per frame,
/// and stop to seal the [`types::Recording`].
pub use doccast_record as record;

/// Binary serialization (`doccast-codec`).
///
/// [`codec::encode_recording`] and [`codec::decode_recording`]
/// round-trip a recording to a compact self-describing blob.
pub use doccast_codec as codec;

/// Clock-driven bidirectional replay (`doccast-player`).
///
/// [`player::Player`] reconciles a live document with an external
/// playback clock, forward and backward.
pub use doccast_player as player;

/// Common imports for typical doccast usage.
///
/// ```rust
/// use doccast::prelude::*;
/// ```
///
/// This imports the data model, the trait seams, the recorder entry
/// points, the codec functions, and the player.
pub mod prelude {
    // Data model
    pub use doccast_core::{
        AudioSource, DeltaSet, EventLog, Recording, Scroll, Seconds, Step, ViewportPosition,
    };

    // Trait seams
    pub use doccast_core::{
        AudioCapture, DeltaApplier, PlaybackClock, SessionClock, SnapshotSource, ViewportSink,
    };

    // Errors
    pub use doccast_core::{ApplyError, AudioError, LogError, SnapshotError};

    // Recording
    pub use doccast_record::{
        ActiveRecording, CompletedRecording, FeedSender, MonotonicClock, RecorderConfig,
        RecorderError,
    };

    // Serialization
    pub use doccast_codec::{decode_recording, encode_recording, CodecError};

    // Playback
    pub use doccast_player::{
        ClockEvent, ConfigError, FrameReport, Player, PlayerConfig, SyncError,
    };
}
