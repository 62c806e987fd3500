//! Event coalescing for high-frequency sources.
//!
//! A [`Debounce`] admits at most one capture per fixed window: the first
//! event in a quiet period passes through immediately (leading emission),
//! later events within the window are coalesced into a single pending
//! entry (latest value wins) that is released once the window has
//! elapsed. Time is supplied explicitly by the caller, so the utility is
//! independent of any timer or UI framework and fully testable.

use doccast_core::Seconds;

/// Coalesces rapid events, emitting at most one per fixed window.
///
/// # Examples
///
/// ```
/// use doccast_record::Debounce;
///
/// let mut d = Debounce::new(0.25);
/// assert_eq!(d.offer(0.0, "a"), Some((0.0, "a"))); // leading emission
/// assert_eq!(d.offer(0.1, "b"), None);             // coalesced
/// assert_eq!(d.offer(0.2, "c"), None);             // latest wins
/// assert_eq!(d.poll(0.24), None);                  // window not elapsed
/// assert_eq!(d.poll(0.3), Some((0.2, "c")));       // trailing emission
/// ```
#[derive(Debug)]
pub struct Debounce<T> {
    window: Seconds,
    last_capture: Option<Seconds>,
    pending: Option<(Seconds, T)>,
}

impl<T> Debounce<T> {
    /// Create a debouncer with the given window in seconds.
    pub fn new(window: Seconds) -> Self {
        Self {
            window,
            last_capture: None,
            pending: None,
        }
    }

    /// Create a debouncer that counts an out-of-band capture at
    /// `last_capture` toward its first window, so an event arriving
    /// right after it coalesces instead of leading.
    pub fn primed(window: Seconds, last_capture: Seconds) -> Self {
        Self {
            window,
            last_capture: Some(last_capture),
            pending: None,
        }
    }

    fn ready(&self, now: Seconds) -> bool {
        self.last_capture.map_or(true, |t| now - t >= self.window)
    }

    /// Offer an event observed at `now`.
    ///
    /// Returns the event immediately if a full window has passed since the
    /// last capture (superseding any still-pending older value); otherwise
    /// the event is held as the pending trailing emission.
    pub fn offer(&mut self, now: Seconds, value: T) -> Option<(Seconds, T)> {
        if self.ready(now) {
            self.pending = None;
            self.last_capture = Some(now);
            Some((now, value))
        } else {
            self.pending = Some((now, value));
            None
        }
    }

    /// Release the pending event if the window has elapsed by `now`.
    ///
    /// The emitted entry keeps the stamp of the event itself, not the
    /// poll time.
    pub fn poll(&mut self, now: Seconds) -> Option<(Seconds, T)> {
        if self.pending.is_some() && self.ready(now) {
            self.last_capture = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Release the pending event unconditionally (end of session).
    pub fn flush(&mut self) -> Option<(Seconds, T)> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_emission_passes_through() {
        let mut d = Debounce::new(0.25);
        assert_eq!(d.offer(1.0, 7), Some((1.0, 7)));
    }

    #[test]
    fn rapid_events_coalesce_to_latest() {
        let mut d = Debounce::new(0.25);
        d.offer(0.0, 1);
        assert_eq!(d.offer(0.05, 2), None);
        assert_eq!(d.offer(0.10, 3), None);
        assert_eq!(d.poll(0.20), None);
        assert_eq!(d.poll(0.25), Some((0.10, 3)));
    }

    #[test]
    fn at_most_one_capture_per_window() {
        let mut d = Debounce::new(0.25);
        let mut captures = Vec::new();
        let mut now = 0.0;
        // A 50Hz event stream for one second.
        for i in 0..50 {
            now = i as f64 * 0.02;
            if let Some(c) = d.offer(now, i) {
                captures.push((now, c));
            }
            if let Some(c) = d.poll(now) {
                captures.push((now, c));
            }
        }
        assert!(captures.len() <= 5, "too many captures: {captures:?}");
        for pair in captures.windows(2) {
            assert!(pair[1].0 - pair[0].0 >= 0.25);
        }
        // The tail of the stream survives as a pending trailing emission.
        assert!(d.poll(now + 0.25).is_some());
    }

    #[test]
    fn primed_window_coalesces_immediate_events() {
        let mut d = Debounce::primed(0.25, 0.0);
        assert_eq!(d.offer(0.1, 1), None);
        assert_eq!(d.poll(0.2), None);
        assert_eq!(d.poll(0.3), Some((0.1, 1)));
        // After the first window the leading edge behaves as usual.
        assert_eq!(d.offer(1.0, 2), Some((1.0, 2)));
    }

    #[test]
    fn quiet_period_resets_leading_edge() {
        let mut d = Debounce::new(0.25);
        assert!(d.offer(0.0, 1).is_some());
        assert!(d.offer(0.1, 2).is_none());
        assert_eq!(d.poll(0.5), Some((0.1, 2)));
        // A long quiet gap: the next event leads again.
        assert_eq!(d.offer(5.0, 3), Some((5.0, 3)));
    }

    #[test]
    fn stale_pending_superseded_by_leading_emission() {
        let mut d = Debounce::new(0.25);
        d.offer(0.0, 1);
        d.offer(0.1, 2);
        // Never polled; a late event supersedes the stale pending value.
        assert_eq!(d.offer(1.0, 3), Some((1.0, 3)));
        assert_eq!(d.flush(), None);
    }

    #[test]
    fn flush_releases_pending() {
        let mut d = Debounce::new(0.25);
        d.offer(0.0, 1);
        d.offer(0.1, 2);
        assert_eq!(d.flush(), Some((0.1, 2)));
        assert_eq!(d.flush(), None);
    }

    proptest::proptest! {
        // For any forward-moving event stream, captures stay at least
        // one window apart and emitted stamps never run backwards.
        #[test]
        fn captures_are_spaced_and_stamps_ordered(
            gaps in proptest::collection::vec(0.0f64..0.5, 1..60),
        ) {
            let mut d = Debounce::new(0.25);
            let mut now = 0.0;
            let mut capture_times = Vec::new();
            let mut stamps = Vec::new();
            for (i, gap) in gaps.iter().enumerate() {
                now += gap;
                if let Some((at, _)) = d.offer(now, i) {
                    capture_times.push(now);
                    stamps.push(at);
                }
                if let Some((at, _)) = d.poll(now) {
                    capture_times.push(now);
                    stamps.push(at);
                }
            }
            if let Some((at, _)) = d.flush() {
                stamps.push(at);
            }
            for pair in capture_times.windows(2) {
                proptest::prop_assert!(pair[1] - pair[0] >= 0.25);
            }
            for pair in stamps.windows(2) {
                proptest::prop_assert!(pair[1] >= pair[0]);
            }
        }
    }
}
