//! Clock-driven playback synchronizer.

use std::fmt;

use doccast_core::{
    DeltaApplier, DeltaSet, EventLog, PlaybackClock, Seconds, ViewportPosition, ViewportSink,
};

use crate::cache::ReverseCache;
use crate::error::{ConfigError, SyncError};

/// A notification from the host's playback surface.
///
/// Every variant schedules a reconciliation pass on the next frame; the
/// variants are distinguished only so hosts can forward their native
/// media events without translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockEvent {
    /// Playback started or resumed.
    Play,
    /// Playback paused.
    Pause,
    /// The playhead jumped to a new position.
    Seeked,
    /// Playback reached the end of the audio.
    Ended,
    /// Playback stalled waiting for data.
    Waiting,
}

// Reconciliation happens synchronously inside `on_frame`, so the only
// states that persist between calls are "nothing pending" and "a pass
// is owed on the next frame".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SyncState {
    Idle,
    Scheduled,
}

/// Consumed configuration for [`Player::new`].
pub struct PlayerConfig {
    /// The recorded session to replay.
    pub log: EventLog,
    /// Collaborator that applies deltas to the live document and
    /// returns their inverses.
    pub applier: Box<dyn DeltaApplier>,
    /// Collaborator that moves the host viewport.
    pub viewport: Box<dyn ViewportSink>,
    /// Whether reconciliation passes drive the viewport. Toggled at
    /// runtime with [`Player::set_follow`].
    pub follow_viewport: bool,
    /// Playback position the document is already synchronized to when
    /// the player is created. `0.0` for a fresh document restored from
    /// the initial snapshot.
    pub resume_at: Seconds,
}

impl PlayerConfig {
    /// Configuration for a fresh document at position zero with
    /// viewport following enabled.
    pub fn new(log: EventLog, applier: Box<dyn DeltaApplier>, viewport: Box<dyn ViewportSink>) -> Self {
        Self {
            log,
            applier,
            viewport,
            follow_viewport: true,
            resume_at: 0.0,
        }
    }
}

impl fmt::Debug for PlayerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerConfig")
            .field("steps", &self.log.steps.len())
            .field("scrolls", &self.log.scrolls.len())
            .field("follow_viewport", &self.follow_viewport)
            .field("resume_at", &self.resume_at)
            .finish_non_exhaustive()
    }
}

/// A step whose delta (or cached inverse) failed to apply during a
/// reconciliation pass.
///
/// The pass continues past a skipped step; the host decides whether the
/// divergence warrants a [`Player::reset`].
#[derive(Debug)]
pub struct SkippedStep {
    /// Index of the step in the log.
    pub step_index: usize,
    /// Timestamp of the step.
    pub timestamp: Seconds,
    /// Why the apply failed.
    pub reason: doccast_core::ApplyError,
}

/// What a single [`Player::on_frame`] call did.
#[derive(Debug, Default)]
pub struct FrameReport {
    /// Whether a reconciliation pass ran at all.
    pub reconciled: bool,
    /// Whether the host should keep scheduling frames.
    pub wants_frame: bool,
    /// Cursor position before the pass.
    pub from: Seconds,
    /// Cursor position after the pass.
    pub to: Seconds,
    /// Steps applied forward.
    pub applied: usize,
    /// Steps reverted via cached inverses.
    pub reverted: usize,
    /// Viewport target selected by this pass, if any.
    pub viewport: Option<ViewportPosition>,
    /// Whether the viewport sink accepted the target.
    pub viewport_moved: bool,
    /// Steps that failed to apply and were passed over.
    pub skipped: Vec<SkippedStep>,
}

/// Replays a recorded session against a live document, keeping it
/// synchronized with an external playback clock.
///
/// The player never owns a timer. The host forwards its media events
/// through [`clock_event`](Player::clock_event) and calls
/// [`on_frame`](Player::on_frame) once per animation frame while the
/// returned report's `wants_frame` is set.
pub struct Player {
    log: EventLog,
    cache: ReverseCache,
    cursor: Seconds,
    applier: Box<dyn DeltaApplier>,
    viewport: Box<dyn ViewportSink>,
    follow: bool,
    marker: Option<ViewportPosition>,
    state: SyncState,
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("cursor", &self.cursor)
            .field("steps", &self.log.steps.len())
            .field("cached", &self.cache.populated())
            .field("follow", &self.follow)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Player {
    /// Build a player around a validated log.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidLog`] if the log's timestamps are out of
    /// order or non-finite, [`ConfigError::InvalidResumePoint`] if
    /// `resume_at` is negative or non-finite.
    pub fn new(config: PlayerConfig) -> Result<Self, ConfigError> {
        config.log.validate()?;
        if !config.resume_at.is_finite() || config.resume_at < 0.0 {
            return Err(ConfigError::InvalidResumePoint {
                found: config.resume_at,
            });
        }
        let cache = ReverseCache::new(config.log.steps.len());
        Ok(Self {
            log: config.log,
            cache,
            cursor: config.resume_at,
            applier: config.applier,
            viewport: config.viewport,
            follow: config.follow_viewport,
            marker: None,
            state: SyncState::Idle,
        })
    }

    /// Record a playback event; the next [`on_frame`](Player::on_frame)
    /// will reconcile even if the clock reads the same position.
    pub fn clock_event(&mut self, _event: ClockEvent) {
        self.state = SyncState::Scheduled;
    }

    /// Reconcile the document with the clock's current position if
    /// anything warrants it.
    ///
    /// A pass runs when an event was received since the last frame, the
    /// clock is playing, or the clock's position differs from the
    /// cursor. Otherwise the call is a cheap no-op.
    ///
    /// # Errors
    ///
    /// [`SyncError::ReplayGap`] when a backward pass reaches a step that
    /// was never applied forward in this session. The cursor is left at
    /// its pre-pass position; recover by re-deriving the document from
    /// the initial snapshot, handing its applier to
    /// [`reset`](Player::reset), and seeking again.
    pub fn on_frame(&mut self, clock: &dyn PlaybackClock) -> Result<FrameReport, SyncError> {
        let now = clock.current_time();
        let paused = clock.paused();

        // A clock that reports NaN or infinity gets ignored rather than
        // poisoning the cursor.
        if !now.is_finite() {
            return Ok(FrameReport {
                from: self.cursor,
                to: self.cursor,
                wants_frame: !paused,
                ..FrameReport::default()
            });
        }

        let due = self.state == SyncState::Scheduled || !paused || now != self.cursor;
        if !due {
            return Ok(FrameReport {
                from: self.cursor,
                to: self.cursor,
                wants_frame: false,
                ..FrameReport::default()
            });
        }

        let mut report = self.reconcile(now)?;
        self.state = if paused {
            SyncState::Idle
        } else {
            SyncState::Scheduled
        };
        report.wants_frame = !paused;
        Ok(report)
    }

    /// Run one reconciliation pass from the cursor to `new_time`.
    fn reconcile(&mut self, new_time: Seconds) -> Result<FrameReport, SyncError> {
        let old_time = self.cursor;
        let forward = new_time >= old_time;
        let (lower, upper) = if forward {
            (old_time, new_time)
        } else {
            (new_time, old_time)
        };

        let mut report = FrameReport {
            reconciled: true,
            from: old_time,
            to: new_time,
            ..FrameReport::default()
        };

        // Viewport moves before content so the user sees the region a
        // burst of deltas is about to land in. The target is selected
        // and recorded as the marker on every pass; only the actual
        // move is gated on follow mode.
        let window = self.log.scroll_window(lower, upper);
        if !window.is_empty() {
            // The window entry temporally nearest the destination:
            // the last one going forward, the first one going back.
            let index = if forward { window.end - 1 } else { window.start };
            let target = self.log.scrolls[index].position.clone();
            if self.follow {
                report.viewport_moved = self.viewport.scroll_to(&target);
            }
            self.marker = Some(target.clone());
            report.viewport = Some(target);
        }

        let window = self.log.step_window(lower, upper);
        if forward {
            for i in window {
                let step = &self.log.steps[i];
                match self.applier.apply(&step.delta) {
                    Ok(inverse) => {
                        self.cache.set(i, inverse);
                        report.applied += 1;
                    }
                    Err(reason) => {
                        // The document is unchanged, so the step's
                        // inverse for this session is a no-op. Caching
                        // it keeps later backward passes consistent.
                        self.cache.set(i, DeltaSet::new());
                        report.skipped.push(SkippedStep {
                            step_index: i,
                            timestamp: step.at,
                            reason,
                        });
                    }
                }
            }
        } else {
            // Validate the whole window before touching the document:
            // a gap discovered mid-pass would leave the document in a
            // state no cursor position describes.
            if let Some(i) = window.clone().rev().find(|&i| self.cache.get(i).is_none()) {
                return Err(SyncError::ReplayGap {
                    step_index: i,
                    timestamp: self.log.steps[i].at,
                });
            }
            for i in window.rev() {
                let inverse = self.cache.get(i).cloned().unwrap_or_default();
                match self.applier.apply(&inverse) {
                    Ok(_) => report.reverted += 1,
                    Err(reason) => report.skipped.push(SkippedStep {
                        step_index: i,
                        timestamp: self.log.steps[i].at,
                        reason,
                    }),
                }
            }
        }

        self.cursor = new_time;
        Ok(report)
    }

    /// Discard all session state and adopt the applier fronting the
    /// document the host re-derived from the initial snapshot.
    ///
    /// The applier exclusively owns the document during a session, so
    /// recovery hands a fresh seam back in; the previous applier is
    /// returned to the host for teardown. The cursor returns to zero
    /// and every cached inverse is dropped; inverses describe a
    /// document that no longer exists.
    pub fn reset(&mut self, applier: Box<dyn DeltaApplier>) -> Box<dyn DeltaApplier> {
        let previous = std::mem::replace(&mut self.applier, applier);
        self.cache.clear();
        self.cursor = 0.0;
        self.marker = None;
        self.state = SyncState::Idle;
        previous
    }

    /// The playback position the document currently reflects.
    pub fn cursor(&self) -> Seconds {
        self.cursor
    }

    /// The most recent viewport target selected by a pass, whether or
    /// not the sink accepted it. Tracked with follow disabled too, so a
    /// host can offer a "jump to where the narration is" affordance.
    pub fn marker(&self) -> Option<&ViewportPosition> {
        self.marker.as_ref()
    }

    /// Whether reconciliation passes drive the viewport.
    pub fn follow(&self) -> bool {
        self.follow
    }

    /// Enable or disable viewport following; content synchronization is
    /// unaffected.
    pub fn set_follow(&mut self, follow: bool) {
        self.follow = follow;
    }

    /// The log being replayed.
    pub fn log(&self) -> &EventLog {
        &self.log
    }
}
