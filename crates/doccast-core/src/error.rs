//! Error types shared across the doccast crates.

use std::error::Error;
use std::fmt;

use crate::types::Seconds;

/// The external patch system rejected a delta.
///
/// Carried per-step in the player's frame report; a single failing step
/// never aborts a playback session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplyError {
    /// Human-readable description from the patch system.
    pub reason: String,
}

impl ApplyError {
    /// Wrap a reason string from the external patch system.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "delta application failed: {}", self.reason)
    }
}

impl Error for ApplyError {}

/// Capturing the initial document snapshot failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotError {
    /// Human-readable description of the capture failure.
    pub reason: String,
}

impl SnapshotError {
    /// Wrap a reason string from the snapshot exporter.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snapshot capture failed: {}", self.reason)
    }
}

impl Error for SnapshotError {}

/// The external audio-recording collaborator failed to start or stop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioError {
    /// Human-readable description (e.g. permission denial upstream).
    pub reason: String,
}

impl AudioError {
    /// Wrap a reason string from the audio collaborator.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "audio capture failed: {}", self.reason)
    }
}

impl Error for AudioError {}

/// An [`EventLog`](crate::EventLog) violates its timestamp invariants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LogError {
    /// A timestamp is NaN, infinite, or negative.
    InvalidTimestamp {
        /// Which sequence (`"steps"` or `"scrolls"`) held the timestamp.
        sequence: &'static str,
        /// Index of the offending entry.
        index: usize,
        /// The timestamp found.
        found: Seconds,
    },
    /// A timestamp is smaller than its predecessor.
    NonMonotonic {
        /// Which sequence (`"steps"` or `"scrolls"`) held the timestamp.
        sequence: &'static str,
        /// Index of the offending entry.
        index: usize,
        /// The preceding timestamp.
        prev: Seconds,
        /// The timestamp found.
        found: Seconds,
    },
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimestamp {
                sequence,
                index,
                found,
            } => {
                write!(f, "invalid timestamp {found} in {sequence}[{index}]")
            }
            Self::NonMonotonic {
                sequence,
                index,
                prev,
                found,
            } => {
                write!(
                    f,
                    "non-monotonic timestamp in {sequence}[{index}]: {found} after {prev}"
                )
            }
        }
    }
}

impl Error for LogError {}
