//! Trait seams for the external collaborators: the document's patch
//! system, the presentation-layer viewport, snapshot export, clocks,
//! and audio capture.
//!
//! Everything outside the recorded session itself is consumed through
//! these traits, so recording and playback are testable with mocks and
//! free of any UI or media dependency.

use crate::error::{ApplyError, AudioError, SnapshotError};
use crate::types::{AudioSource, DeltaSet, Seconds, ViewportPosition};

/// Applies deltas to the live document state it fronts.
///
/// The implementation owns (or exclusively borrows) the document for the
/// duration of a playback session; no other writer may mutate it
/// concurrently. `apply` must be deterministic, and applying a delta
/// followed by the inverse it returned must restore the prior state
/// exactly.
pub trait DeltaApplier {
    /// Apply `delta` to the document, returning its inverse.
    ///
    /// On error the document must be left unchanged; the player then
    /// treats the step as a no-op and continues with the next one.
    fn apply(&mut self, delta: &DeltaSet) -> Result<DeltaSet, ApplyError>;
}

/// Presentation-layer viewport control.
pub trait ViewportSink {
    /// Move the viewport to `target`.
    ///
    /// Returns `false` when the anchor is not present in the currently
    /// rendered document; the caller skips the update for that cycle.
    fn scroll_to(&mut self, target: &ViewportPosition) -> bool;
}

/// Exports the full current document state for the initial snapshot.
pub trait SnapshotSource {
    /// Produce an opaque serialized rendering of the document.
    fn export(&self) -> Result<Vec<u8>, SnapshotError>;
}

/// Monotonic time source driving the recording side.
pub trait SessionClock {
    /// Current time in seconds from an arbitrary fixed origin.
    fn now(&self) -> Seconds;
}

/// The external scalar clock driving playback, typically backed by a
/// media element's playback position.
///
/// Abstractly just a value that changes over time and can be asked for
/// its current reading; the player consumes nothing else.
pub trait PlaybackClock {
    /// Current playback position in seconds.
    fn current_time(&self) -> Seconds;

    /// Whether the clock is paused (not advancing on its own).
    fn paused(&self) -> bool;
}

/// The external audio-recording collaborator.
pub trait AudioCapture {
    /// Begin capturing audio. Fails on e.g. permission denial.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop capturing and return the playable artifact.
    fn stop(&mut self) -> Result<AudioSource, AudioError>;
}
