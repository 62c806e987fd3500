//! Data types for recorded sessions: deltas, viewport positions, and the
//! [`EventLog`] they accumulate into.

use std::ops::Range;

use smallvec::SmallVec;

use crate::error::LogError;

/// Timestamp in seconds from recording start.
///
/// All timestamps in an [`EventLog`] are non-negative, finite, and
/// non-decreasing within each sequence. `f64` preserves sub-millisecond
/// precision over any realistic session length.
pub type Seconds = f64;

/// An opaque, ordered set of change operations.
///
/// Each operation is a byte blob produced and interpreted by the host's
/// external patch system; this crate never looks inside one. An empty
/// `DeltaSet` is a valid no-op (used as the inverse of a step that was
/// never applied).
///
/// Most deltas carry one or two operations, so the op list is a
/// `SmallVec` that only spills to the heap for larger batches.
///
/// # Examples
///
/// ```
/// use doccast_core::DeltaSet;
///
/// let mut delta = DeltaSet::new();
/// delta.push(vec![0x03, 0x41]);
/// assert_eq!(delta.len(), 1);
/// assert_eq!(delta.ops()[0], vec![0x03, 0x41]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeltaSet {
    ops: SmallVec<[Vec<u8>; 2]>,
}

impl DeltaSet {
    /// Create an empty delta set (a no-op when applied).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a delta set from an ordered sequence of operations.
    pub fn from_ops<I>(ops: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        Self {
            ops: ops.into_iter().collect(),
        }
    }

    /// Append an operation, preserving order.
    pub fn push(&mut self, op: Vec<u8>) {
        self.ops.push(op);
    }

    /// The operations in application order.
    pub fn ops(&self) -> &[Vec<u8>] {
        &self.ops
    }

    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the delta set carries no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// A viewport position within the document.
///
/// Identifies a document element by its anchor and a fractional offset
/// within it. Resolution to a pixel scroll coordinate happens in the
/// presentation layer, outside this crate.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportPosition {
    /// Identifier of the anchoring document element.
    pub anchor_id: String,
    /// Fractional offset within the element, typically in `[0, 1)`.
    pub relative_offset: f64,
}

/// A timestamped state delta within an [`EventLog`].
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Seconds from recording start.
    pub at: Seconds,
    /// The change applied to the document at this point.
    pub delta: DeltaSet,
}

/// A timestamped viewport position within an [`EventLog`].
#[derive(Clone, Debug, PartialEq)]
pub struct Scroll {
    /// Seconds from recording start.
    pub at: Seconds,
    /// Where the viewport was after this movement.
    pub position: ViewportPosition,
}

/// A recorded session: initial snapshot plus timestamped deltas and
/// viewport positions.
///
/// Appended to by the recorder while live, immutable afterwards. Both
/// `steps` and `scrolls` hold non-decreasing timestamps; [`validate`]
/// (EventLog::validate) checks that invariant after deserialization.
///
/// # Examples
///
/// ```
/// use doccast_core::{DeltaSet, EventLog, Step};
///
/// let mut log = EventLog::new(b"<snapshot>".to_vec());
/// log.steps.push(Step { at: 1.0, delta: DeltaSet::new() });
/// log.steps.push(Step { at: 2.5, delta: DeltaSet::new() });
/// assert!(log.validate().is_ok());
/// assert_eq!(log.duration(), 2.5);
/// assert_eq!(log.step_window(0.0, 1.0), 0..1);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    /// Opaque serialized document state at recording start.
    pub initial_snapshot: Vec<u8>,
    /// Timestamped state deltas, non-decreasing in time.
    pub steps: Vec<Step>,
    /// Timestamped viewport positions, non-decreasing in time.
    pub scrolls: Vec<Scroll>,
}

impl EventLog {
    /// Create an empty log around an initial snapshot.
    pub fn new(initial_snapshot: Vec<u8>) -> Self {
        Self {
            initial_snapshot,
            steps: Vec::new(),
            scrolls: Vec::new(),
        }
    }

    /// Check the timestamp invariants: every timestamp finite and
    /// non-negative, every sequence non-decreasing.
    pub fn validate(&self) -> Result<(), LogError> {
        Self::check_monotonic("steps", self.steps.iter().map(|s| s.at))?;
        Self::check_monotonic("scrolls", self.scrolls.iter().map(|s| s.at))?;
        Ok(())
    }

    fn check_monotonic(
        sequence: &'static str,
        timestamps: impl Iterator<Item = Seconds>,
    ) -> Result<(), LogError> {
        let mut prev = 0.0;
        for (index, at) in timestamps.enumerate() {
            if !at.is_finite() || at < 0.0 {
                return Err(LogError::InvalidTimestamp {
                    sequence,
                    index,
                    found: at,
                });
            }
            if at < prev {
                return Err(LogError::NonMonotonic {
                    sequence,
                    index,
                    prev,
                    found: at,
                });
            }
            prev = at;
        }
        Ok(())
    }

    /// Timestamp of the last recorded event, or `0.0` for an empty log.
    pub fn duration(&self) -> Seconds {
        let last_step = self.steps.last().map_or(0.0, |s| s.at);
        let last_scroll = self.scrolls.last().map_or(0.0, |s| s.at);
        last_step.max(last_scroll)
    }

    /// Index range of steps with `lower < at <= upper`.
    ///
    /// The half-open-then-closed interval means a step exactly at the old
    /// cursor position is never selected twice by abutting passes, while a
    /// step exactly at the new position is always included.
    pub fn step_window(&self, lower: Seconds, upper: Seconds) -> Range<usize> {
        let start = self.steps.partition_point(|s| s.at <= lower);
        let end = self.steps.partition_point(|s| s.at <= upper);
        start..end.max(start)
    }

    /// Index range of scrolls with `lower < at <= upper`.
    pub fn scroll_window(&self, lower: Seconds, upper: Seconds) -> Range<usize> {
        let start = self.scrolls.partition_point(|s| s.at <= lower);
        let end = self.scrolls.partition_point(|s| s.at <= upper);
        start..end.max(start)
    }
}

/// A completed, exportable session: the event log plus an optional
/// reference to the audio asset recorded alongside it.
///
/// This is the only durable artifact the framework produces; the codec
/// crate round-trips it to a binary blob.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Recording {
    /// The recorded session events.
    pub log: EventLog,
    /// Reference to the audio asset, if audio was captured.
    pub audio_url: Option<String>,
}

/// A playable audio artifact returned by the external audio-recording
/// collaborator when capture stops.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSource {
    /// Host-resolvable reference to the captured audio.
    pub url: String,
    /// Duration of the captured audio in seconds.
    pub duration: Seconds,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(at: Seconds) -> Step {
        Step {
            at,
            delta: DeltaSet::new(),
        }
    }

    fn scroll(at: Seconds) -> Scroll {
        Scroll {
            at,
            position: ViewportPosition {
                anchor_id: "a".into(),
                relative_offset: 0.0,
            },
        }
    }

    #[test]
    fn empty_log_is_valid() {
        let log = EventLog::new(vec![]);
        assert!(log.validate().is_ok());
        assert_eq!(log.duration(), 0.0);
    }

    #[test]
    fn equal_timestamps_are_valid() {
        let mut log = EventLog::new(vec![]);
        log.steps = vec![step(1.0), step(1.0), step(2.0)];
        assert!(log.validate().is_ok());
    }

    #[test]
    fn decreasing_timestamps_rejected() {
        let mut log = EventLog::new(vec![]);
        log.steps = vec![step(2.0), step(1.0)];
        let err = log.validate().unwrap_err();
        assert!(matches!(
            err,
            LogError::NonMonotonic {
                sequence: "steps",
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn nan_timestamp_rejected() {
        let mut log = EventLog::new(vec![]);
        log.scrolls = vec![scroll(f64::NAN)];
        assert!(matches!(
            log.validate().unwrap_err(),
            LogError::InvalidTimestamp {
                sequence: "scrolls",
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn negative_timestamp_rejected() {
        let mut log = EventLog::new(vec![]);
        log.steps = vec![step(-0.5)];
        assert!(log.validate().is_err());
    }

    #[test]
    fn step_window_is_half_open_then_closed() {
        let mut log = EventLog::new(vec![]);
        log.steps = vec![step(1.0), step(2.5), step(4.0)];

        // Boundary at a step's exact timestamp: excluded at the lower
        // bound, included at the upper bound.
        assert_eq!(log.step_window(1.0, 4.0), 1..3);
        assert_eq!(log.step_window(0.0, 1.0), 0..1);
        assert_eq!(log.step_window(0.0, 0.99), 0..0);
        assert_eq!(log.step_window(4.0, 9.0), 3..3);
    }

    #[test]
    fn scroll_window_selects_same_range_both_directions() {
        let mut log = EventLog::new(vec![]);
        log.scrolls = vec![scroll(0.5), scroll(1.2), scroll(1.8)];
        assert_eq!(log.scroll_window(0.0, 2.0), 0..3);
        assert_eq!(log.scroll_window(1.2, 2.0), 2..3);
    }

    #[test]
    fn duration_takes_later_of_steps_and_scrolls() {
        let mut log = EventLog::new(vec![]);
        log.steps = vec![step(1.0)];
        log.scrolls = vec![scroll(3.5)];
        assert_eq!(log.duration(), 3.5);
    }

    #[test]
    fn delta_set_preserves_op_order() {
        let delta = DeltaSet::from_ops(vec![vec![1], vec![2], vec![3]]);
        assert_eq!(delta.ops(), &[vec![1], vec![2], vec![3]]);
        assert!(!delta.is_empty());
        assert!(DeltaSet::new().is_empty());
    }
}
