//! Test utilities and mock collaborators for doccast development.
//!
//! Provides in-memory implementations of the core traits
//! ([`DeltaApplier`], [`ViewportSink`], [`SnapshotSource`],
//! [`SessionClock`], [`PlaybackClock`], [`AudioCapture`]) so recorder
//! and player behavior can be tested without a host document.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use doccast_core::{
    ApplyError, AudioCapture, AudioError, AudioSource, DeltaApplier, DeltaSet, PlaybackClock,
    Seconds, SessionClock, SnapshotError, SnapshotSource, ViewportPosition, ViewportSink,
};

/// Number of byte cells in a [`MockDocument`].
pub const MOCK_DOCUMENT_CELLS: usize = 256;

/// Build a delta whose operations each write one value to one cell of a
/// [`MockDocument`].
pub fn write_delta(writes: &[(u8, u8)]) -> DeltaSet {
    DeltaSet::from_ops(writes.iter().map(|&(index, value)| vec![index, value]))
}

/// An in-memory document of 256 byte cells, all zero initially.
///
/// Understands deltas built with [`write_delta`]: each operation is a
/// two-byte `[cell_index, value]` write. Applying a delta returns the
/// exact inverse (the overwritten values, in reverse order), so a
/// forward/backward replay pair restores the document bit for bit.
///
/// Clones share the underlying cells, so a test can hand one clone to a
/// player and inspect the document through another.
#[derive(Clone)]
pub struct MockDocument {
    cells: Arc<Mutex<Vec<u8>>>,
}

impl MockDocument {
    pub fn new() -> Self {
        Self {
            cells: Arc::new(Mutex::new(vec![0; MOCK_DOCUMENT_CELLS])),
        }
    }

    /// Current value of one cell.
    pub fn cell(&self, index: usize) -> u8 {
        self.cells.lock().unwrap()[index]
    }

    /// A copy of all cells.
    pub fn snapshot(&self) -> Vec<u8> {
        self.cells.lock().unwrap().clone()
    }

    /// Overwrite all cells from a snapshot taken earlier.
    pub fn restore(&self, snapshot: &[u8]) {
        let mut cells = self.cells.lock().unwrap();
        cells.clear();
        cells.extend_from_slice(snapshot);
    }
}

impl Default for MockDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl DeltaApplier for MockDocument {
    fn apply(&mut self, delta: &DeltaSet) -> Result<DeltaSet, ApplyError> {
        let mut cells = self.cells.lock().unwrap();
        // Validate every operation before touching any cell so a
        // rejected delta leaves the document unchanged.
        for op in delta.ops() {
            if op.len() != 2 {
                return Err(ApplyError::new(format!(
                    "malformed write op of {} bytes",
                    op.len()
                )));
            }
            if usize::from(op[0]) >= cells.len() {
                return Err(ApplyError::new(format!("cell {} out of range", op[0])));
            }
        }
        let mut inverse = DeltaSet::new();
        for op in delta.ops().iter().rev() {
            inverse.push(vec![op[0], cells[usize::from(op[0])]]);
        }
        for op in delta.ops() {
            cells[usize::from(op[0])] = op[1];
        }
        Ok(inverse)
    }
}

impl SnapshotSource for MockDocument {
    fn export(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(self.snapshot())
    }
}

/// Wraps a [`MockDocument`] and fails configured apply calls.
///
/// Call indices are zero-based and count every `apply` invocation,
/// forward and backward alike.
pub struct FlakyApplier {
    inner: MockDocument,
    fail_on: Vec<usize>,
    calls: usize,
}

impl FlakyApplier {
    pub fn new(inner: MockDocument, fail_on: Vec<usize>) -> Self {
        Self {
            inner,
            fail_on,
            calls: 0,
        }
    }
}

impl DeltaApplier for FlakyApplier {
    fn apply(&mut self, delta: &DeltaSet) -> Result<DeltaSet, ApplyError> {
        let call = self.calls;
        self.calls += 1;
        if self.fail_on.contains(&call) {
            return Err(ApplyError::new(format!("injected failure on call {call}")));
        }
        self.inner.apply(delta)
    }
}

/// A viewport sink that records every accepted move.
///
/// With no anchor filter it accepts everything; built via
/// [`accepting`](CaptureViewport::accepting) it rejects targets whose
/// anchor is not in the list, the way a host rejects an anchor deleted
/// from the document.
#[derive(Clone, Default)]
pub struct CaptureViewport {
    anchors: Option<Vec<String>>,
    moves: Arc<Mutex<Vec<ViewportPosition>>>,
}

impl CaptureViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that only resolves the given anchors.
    pub fn accepting(anchors: Vec<String>) -> Self {
        Self {
            anchors: Some(anchors),
            moves: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every move accepted so far, in order.
    pub fn moves(&self) -> Vec<ViewportPosition> {
        self.moves.lock().unwrap().clone()
    }
}

impl ViewportSink for CaptureViewport {
    fn scroll_to(&mut self, target: &ViewportPosition) -> bool {
        if let Some(anchors) = &self.anchors {
            if !anchors.iter().any(|a| *a == target.anchor_id) {
                return false;
            }
        }
        self.moves.lock().unwrap().push(target.clone());
        true
    }
}

/// A snapshot source returning a fixed byte string.
pub struct StaticSnapshot {
    bytes: Vec<u8>,
}

impl StaticSnapshot {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }
}

impl SnapshotSource for StaticSnapshot {
    fn export(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(self.bytes.clone())
    }
}

/// A snapshot source whose export always fails.
pub struct FailingSnapshot;

impl SnapshotSource for FailingSnapshot {
    fn export(&self) -> Result<Vec<u8>, SnapshotError> {
        Err(SnapshotError::new("serializer unavailable"))
    }
}

/// A manually advanced session clock.
///
/// Stores the reading as `f64` bits in an atomic so clones share the
/// same time and the clock can be driven from the test while a recorder
/// holds its own handle.
#[derive(Clone)]
pub struct FakeSessionClock {
    bits: Arc<AtomicU64>,
}

impl FakeSessionClock {
    pub fn new() -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(0.0f64.to_bits())),
        }
    }

    /// Move the clock to an absolute reading.
    pub fn set(&self, now: Seconds) {
        self.bits.store(now.to_bits(), Ordering::SeqCst);
    }

    /// Move the clock forward by `delta` seconds.
    pub fn advance(&self, delta: Seconds) {
        let now = f64::from_bits(self.bits.load(Ordering::SeqCst));
        self.set(now + delta);
    }
}

impl Default for FakeSessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionClock for FakeSessionClock {
    fn now(&self) -> Seconds {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

/// A playback clock with a fixed reading and pause flag.
#[derive(Clone, Copy, Debug)]
pub struct FakePlaybackClock {
    pub time: Seconds,
    pub is_paused: bool,
}

impl FakePlaybackClock {
    /// A running clock at `time`.
    pub fn playing(time: Seconds) -> Self {
        Self {
            time,
            is_paused: false,
        }
    }

    /// A paused clock at `time`.
    pub fn paused_at(time: Seconds) -> Self {
        Self {
            time,
            is_paused: true,
        }
    }
}

impl PlaybackClock for FakePlaybackClock {
    fn current_time(&self) -> Seconds {
        self.time
    }

    fn paused(&self) -> bool {
        self.is_paused
    }
}

/// Shared call counter handed out by audio mocks.
#[derive(Clone, Default)]
pub struct CallCount(Arc<AtomicU32>);

impl CallCount {
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// An audio capture that records nothing and returns a fixed artifact.
pub struct NullAudio {
    url: String,
    duration: Seconds,
    stops: CallCount,
}

impl NullAudio {
    pub fn new(url: &str, duration: Seconds) -> Self {
        Self {
            url: url.to_string(),
            duration,
            stops: CallCount::default(),
        }
    }

    /// Counter incremented every time capture is stopped.
    pub fn stop_calls(&self) -> CallCount {
        self.stops.clone()
    }
}

impl AudioCapture for NullAudio {
    fn start(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<AudioSource, AudioError> {
        self.stops.bump();
        Ok(AudioSource {
            url: self.url.clone(),
            duration: self.duration,
        })
    }
}

/// An audio capture whose start is always denied.
#[derive(Default)]
pub struct DenyAudio;

impl AudioCapture for DenyAudio {
    fn start(&mut self) -> Result<(), AudioError> {
        Err(AudioError::new("permission denied"))
    }

    fn stop(&mut self) -> Result<AudioSource, AudioError> {
        Err(AudioError::new("capture never started"))
    }
}

/// An audio capture that starts cleanly but fails to produce an
/// artifact on stop.
#[derive(Default)]
pub struct LossyAudio;

impl AudioCapture for LossyAudio {
    fn start(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<AudioSource, AudioError> {
        Err(AudioError::new("encoder crashed"))
    }
}
