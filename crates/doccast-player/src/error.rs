//! Error types for playback construction and reconciliation.

use std::error::Error;
use std::fmt;

use doccast_core::{LogError, Seconds};

/// Errors rejecting a [`PlayerConfig`](crate::PlayerConfig).
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The event log violates its timestamp invariants.
    InvalidLog(LogError),
    /// The resume position is not a non-negative finite number.
    InvalidResumePoint {
        /// The resume position found in the config.
        found: Seconds,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLog(e) => write!(f, "invalid event log: {e}"),
            Self::InvalidResumePoint { found } => {
                write!(f, "invalid resume position: {found}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLog(e) => Some(e),
            Self::InvalidResumePoint { .. } => None,
        }
    }
}

impl From<LogError> for ConfigError {
    fn from(e: LogError) -> Self {
        Self::InvalidLog(e)
    }
}

/// Errors aborting a reconciliation pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SyncError {
    /// A backward seek reached a step whose inverse was never computed
    /// (the step was never applied forward in this session).
    ///
    /// Skipping it would leave the document inconsistent, so the pass
    /// fails instead. Recovery: re-derive the document from the initial
    /// snapshot, hand its applier to
    /// [`Player::reset`](crate::Player::reset), replay forward.
    ReplayGap {
        /// Index of the unvisited step.
        step_index: usize,
        /// Timestamp of the unvisited step.
        timestamp: Seconds,
    },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReplayGap {
                step_index,
                timestamp,
            } => {
                write!(
                    f,
                    "replay gap: step {step_index} at {timestamp}s was never applied forward"
                )
            }
        }
    }
}

impl Error for SyncError {}
