//! The live event feed from the host document into a recording.

use std::sync::Arc;

use crossbeam_channel::Sender;

use doccast_core::{DeltaSet, Seconds, SessionClock, ViewportPosition};

/// An event stamped with its elapsed-time offset from recording start.
#[derive(Clone, Debug)]
pub(crate) struct Stamped<T> {
    pub(crate) at: Seconds,
    pub(crate) value: T,
}

/// Emitting end of a recording session's event feed.
///
/// Handed out by [`ActiveRecording::start`](crate::ActiveRecording::start);
/// the host wires it to its delta-broadcast stream and viewport-move
/// notifications. Each event is stamped at emission time, so late pumping
/// on the recording side does not distort timestamps.
///
/// Cloning is cheap and all clones feed the same session. Emitting after
/// the recording has stopped is a silent no-op — the feed is disconnected,
/// never dangling.
#[derive(Clone)]
pub struct FeedSender {
    pub(crate) deltas: Sender<Stamped<DeltaSet>>,
    pub(crate) viewports: Sender<Stamped<ViewportPosition>>,
    pub(crate) clock: Arc<dyn SessionClock + Send + Sync>,
    pub(crate) epoch: Seconds,
}

impl FeedSender {
    fn elapsed(&self) -> Seconds {
        (self.clock.now() - self.epoch).max(0.0)
    }

    /// Emit a delta produced by the live document.
    pub fn emit_delta(&self, delta: DeltaSet) {
        let _ = self.deltas.send(Stamped {
            at: self.elapsed(),
            value: delta,
        });
    }

    /// Emit a user-driven viewport movement.
    pub fn emit_viewport(&self, position: ViewportPosition) {
        let _ = self.viewports.send(Stamped {
            at: self.elapsed(),
            value: position,
        });
    }
}

impl std::fmt::Debug for FeedSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSender")
            .field("epoch", &self.epoch)
            .finish()
    }
}
