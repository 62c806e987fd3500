//! Lazily-populated inverse-delta storage for backward seeks.

use doccast_core::DeltaSet;

/// Index-aligned storage of inverse deltas, parallel to a log's steps.
///
/// Entry `i` is populated if and only if step `i` has been applied
/// forward at some point during the current playback session; the unset
/// state is a first-class `None`, never a sentinel value, so a backward
/// seek into unvisited territory is reliably detectable.
///
/// Rebuilt fresh for every playback session, never persisted.
#[derive(Clone, Debug)]
pub struct ReverseCache {
    entries: Vec<Option<DeltaSet>>,
}

impl ReverseCache {
    /// Create a cache with one unset entry per step.
    pub fn new(step_count: usize) -> Self {
        Self {
            entries: vec![None; step_count],
        }
    }

    /// Number of entries (equals the log's step count).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store the inverse for step `index`, overwriting any stale value;
    /// forward traversal is always authoritative.
    pub fn set(&mut self, index: usize, inverse: DeltaSet) {
        self.entries[index] = Some(inverse);
    }

    /// The cached inverse for step `index`, or `None` if that step has
    /// never been applied forward.
    pub fn get(&self, index: usize) -> Option<&DeltaSet> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// Number of populated entries.
    pub fn populated(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Unset every entry (session restart).
    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            *entry = None;
        }
    }
}
