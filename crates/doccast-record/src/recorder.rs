//! Session recording lifecycle: start, pump, stop.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver};

use doccast_core::{
    AudioCapture, AudioError, AudioSource, DeltaSet, EventLog, Recording, Scroll, Seconds,
    SessionClock, SnapshotError, SnapshotSource, Step, ViewportPosition,
};

use crate::debounce::Debounce;
use crate::feed::{FeedSender, Stamped};

/// Default trailing-debounce window for viewport captures, in seconds.
pub const DEFAULT_SCROLL_DEBOUNCE: Seconds = 0.25;

// ── Config ──────────────────────────────────────────────────────

/// Configuration for starting a recording session.
///
/// Consumed by [`ActiveRecording::start`]: the audio capture collaborator
/// is moved into the recording for the session's duration.
pub struct RecorderConfig {
    /// Monotonic time source used to stamp events.
    pub clock: Arc<dyn SessionClock + Send + Sync>,
    /// External audio-recording collaborator; `None` records silently.
    pub audio: Option<Box<dyn AudioCapture>>,
    /// Trailing-debounce window for viewport captures, in seconds.
    pub scroll_debounce_secs: Seconds,
}

impl RecorderConfig {
    /// Config with no audio capture and the default debounce window.
    pub fn new(clock: Arc<dyn SessionClock + Send + Sync>) -> Self {
        Self {
            clock,
            audio: None,
            scroll_debounce_secs: DEFAULT_SCROLL_DEBOUNCE,
        }
    }
}

// ── Errors ──────────────────────────────────────────────────────

/// Errors aborting an in-progress [`ActiveRecording::start`].
///
/// A failed start leaves no partial state behind: whatever was acquired
/// before the failure is released before the error is returned.
#[derive(Clone, Debug, PartialEq)]
pub enum RecorderError {
    /// The audio collaborator refused to start (e.g. permission denied).
    AudioStart(AudioError),
    /// Exporting the initial document snapshot failed.
    SnapshotCapture(SnapshotError),
    /// The configured debounce window is not a positive finite number.
    InvalidDebounce {
        /// The window found in the config.
        found: Seconds,
    },
}

impl fmt::Display for RecorderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AudioStart(e) => write!(f, "recording start failed: {e}"),
            Self::SnapshotCapture(e) => write!(f, "recording start failed: {e}"),
            Self::InvalidDebounce { found } => {
                write!(f, "invalid scroll debounce window: {found}")
            }
        }
    }
}

impl Error for RecorderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AudioStart(e) => Some(e),
            Self::SnapshotCapture(e) => Some(e),
            Self::InvalidDebounce { .. } => None,
        }
    }
}

// ── CompletedRecording ──────────────────────────────────────────

/// Outcome of [`ActiveRecording::stop`].
///
/// Audio-capture failure at stop time degrades the session to a silent
/// recording instead of discarding the event log; the failure is
/// reported here rather than swallowed.
#[derive(Debug)]
pub struct CompletedRecording {
    /// The sealed recording (log plus audio reference, if any).
    pub recording: Recording,
    /// The full audio artifact, when capture succeeded.
    pub audio: Option<AudioSource>,
    /// Set when audio capture failed to stop cleanly.
    pub audio_error: Option<AudioError>,
}

// ── ActiveRecording ─────────────────────────────────────────────

/// A recording session in progress.
///
/// Owns the receiving end of the event feed and the growing
/// [`EventLog`]. The host pumps the feed once per frame and stops the
/// session to seal the log.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use doccast_core::{DeltaSet, SnapshotSource, SnapshotError, ViewportPosition};
/// use doccast_record::{ActiveRecording, MonotonicClock, RecorderConfig};
///
/// struct Doc;
/// impl SnapshotSource for Doc {
///     fn export(&self) -> Result<Vec<u8>, SnapshotError> {
///         Ok(b"<doc/>".to_vec())
///     }
/// }
///
/// let config = RecorderConfig::new(Arc::new(MonotonicClock::new()));
/// let start_pos = ViewportPosition { anchor_id: "top".into(), relative_offset: 0.0 };
/// let (mut recording, feed) = ActiveRecording::start(config, &Doc, start_pos).unwrap();
///
/// feed.emit_delta(DeltaSet::from_ops(vec![vec![1, 2]]));
/// recording.pump();
///
/// let done = recording.stop();
/// assert_eq!(done.recording.log.steps.len(), 1);
/// assert_eq!(done.recording.log.scrolls[0].at, 0.0);
/// ```
pub struct ActiveRecording {
    clock: Arc<dyn SessionClock + Send + Sync>,
    started_at: Seconds,
    log: EventLog,
    audio: Option<Box<dyn AudioCapture>>,
    deltas: Receiver<Stamped<DeltaSet>>,
    viewports: Receiver<Stamped<ViewportPosition>>,
    debounce: Debounce<ViewportPosition>,
}

impl ActiveRecording {
    /// Start a recording session.
    ///
    /// Starts audio capture (if configured), exports the initial
    /// snapshot, seeds the log with one scroll entry at timestamp 0 for
    /// the current viewport, and opens the event feed. Returns the
    /// recording and the [`FeedSender`] the host emits into.
    ///
    /// # Errors
    ///
    /// Fails atomically: on [`RecorderError::SnapshotCapture`] an already
    /// started audio capture is stopped and its artifact discarded, so a
    /// failed start leaves the system in its pre-recording state.
    pub fn start(
        config: RecorderConfig,
        snapshot_source: &dyn SnapshotSource,
        initial_viewport: ViewportPosition,
    ) -> Result<(Self, FeedSender), RecorderError> {
        if !config.scroll_debounce_secs.is_finite() || config.scroll_debounce_secs <= 0.0 {
            return Err(RecorderError::InvalidDebounce {
                found: config.scroll_debounce_secs,
            });
        }

        let mut audio = config.audio;
        if let Some(capture) = audio.as_mut() {
            capture.start().map_err(RecorderError::AudioStart)?;
        }

        let snapshot = match snapshot_source.export() {
            Ok(bytes) => bytes,
            Err(e) => {
                if let Some(capture) = audio.as_mut() {
                    let _ = capture.stop();
                }
                return Err(RecorderError::SnapshotCapture(e));
            }
        };

        let started_at = config.clock.now();
        let mut log = EventLog::new(snapshot);
        log.scrolls.push(Scroll {
            at: 0.0,
            position: initial_viewport,
        });

        let (delta_tx, delta_rx) = unbounded();
        let (viewport_tx, viewport_rx) = unbounded();
        let feed = FeedSender {
            deltas: delta_tx,
            viewports: viewport_tx,
            clock: Arc::clone(&config.clock),
            epoch: started_at,
        };

        let recording = Self {
            clock: config.clock,
            started_at,
            log,
            audio,
            deltas: delta_rx,
            viewports: viewport_rx,
            // The seeded scroll at 0 counts as the first capture.
            debounce: Debounce::primed(config.scroll_debounce_secs, 0.0),
        };
        Ok((recording, feed))
    }

    /// Seconds elapsed since recording start.
    pub fn elapsed(&self) -> Seconds {
        (self.clock.now() - self.started_at).max(0.0)
    }

    /// Drain the event feed into the log.
    ///
    /// Deltas are appended directly; viewport moves pass through the
    /// trailing debouncer. Call once per frame while recording.
    pub fn pump(&mut self) {
        while let Ok(event) = self.deltas.try_recv() {
            let prev = self.log.steps.last().map_or(0.0, |s| s.at);
            self.log.steps.push(Step {
                at: event.at.max(prev),
                delta: event.value,
            });
        }
        while let Ok(event) = self.viewports.try_recv() {
            if let Some((at, position)) = self.debounce.offer(event.at, event.value) {
                self.push_scroll(at, position);
            }
        }
        let now = self.elapsed();
        if let Some((at, position)) = self.debounce.poll(now) {
            self.push_scroll(at, position);
        }
    }

    fn push_scroll(&mut self, at: Seconds, position: ViewportPosition) {
        let prev = self.log.scrolls.last().map_or(0.0, |s| s.at);
        self.log.scrolls.push(Scroll {
            at: at.max(prev),
            position,
        });
    }

    /// Number of steps captured so far (after the last pump).
    pub fn step_count(&self) -> usize {
        self.log.steps.len()
    }

    /// Stop the session and seal the log.
    ///
    /// Performs a final pump, flushes any pending debounced scroll, stops
    /// audio capture, and detaches the feed (every `FeedSender` clone is
    /// disconnected once the receivers drop).
    pub fn stop(mut self) -> CompletedRecording {
        self.pump();
        if let Some((at, position)) = self.debounce.flush() {
            self.push_scroll(at, position);
        }

        let (audio, audio_error) = match self.audio.take() {
            Some(mut capture) => match capture.stop() {
                Ok(source) => (Some(source), None),
                Err(e) => (None, Some(e)),
            },
            None => (None, None),
        };

        CompletedRecording {
            recording: Recording {
                log: self.log,
                audio_url: audio.as_ref().map(|a| a.url.clone()),
            },
            audio,
            audio_error,
        }
    }
}
