//! Wall-clock implementation of [`SessionClock`].

use std::time::Instant;

use doccast_core::{Seconds, SessionClock};

/// Monotonic session clock backed by [`std::time::Instant`].
///
/// Reports seconds elapsed since construction. Monotonicity is inherited
/// from `Instant`, so event stamps derived from it never run backwards.
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose zero point is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock for MonotonicClock {
    fn now(&self) -> Seconds {
        self.origin.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_runs_backwards() {
        let clock = MonotonicClock::new();
        let mut prev = clock.now();
        for _ in 0..100 {
            let now = clock.now();
            assert!(now >= prev);
            prev = now;
        }
    }
}
