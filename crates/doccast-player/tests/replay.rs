//! Replay consistency integration tests.
//!
//! Each test drives a [`Player`] over a [`MockDocument`] through seek
//! sequences and checks the document against a straight-line forward
//! replay of the same log.

use std::sync::Arc;

use doccast_codec::{decode_recording, encode_recording};
use doccast_core::{DeltaSet, EventLog, Seconds, Step};
use doccast_player::{ClockEvent, FrameReport, Player, PlayerConfig};
use doccast_record::{ActiveRecording, RecorderConfig};
use doccast_test_utils::{
    write_delta, CaptureViewport, FakePlaybackClock, FakeSessionClock, MockDocument,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────

fn log_of(steps: &[(f64, u8, u8)]) -> EventLog {
    let mut log = EventLog::new(vec![0; 256]);
    log.steps = steps
        .iter()
        .map(|&(at, index, value)| Step {
            at,
            delta: write_delta(&[(index, value)]),
        })
        .collect();
    log
}

fn player_over(doc: &MockDocument, log: EventLog) -> Player {
    Player::new(PlayerConfig::new(
        log,
        Box::new(doc.clone()),
        Box::new(CaptureViewport::new()),
    ))
    .unwrap()
}

fn seek(player: &mut Player, to: Seconds) -> FrameReport {
    player.clock_event(ClockEvent::Seeked);
    player.on_frame(&FakePlaybackClock::paused_at(to)).unwrap()
}

/// The document state a straight forward replay up to `to` produces.
fn straight_line(log: &EventLog, to: Seconds) -> Vec<u8> {
    use doccast_core::DeltaApplier;
    let mut doc = MockDocument::new();
    for step in log.steps.iter().filter(|s| s.at <= to) {
        doc.apply(&step.delta).unwrap();
    }
    doc.snapshot()
}

// ── Seek equivalence ────────────────────────────────────────────

#[test]
fn split_seek_matches_single_seek() {
    let steps = [(0.5, 0, 1), (1.5, 1, 2), (2.5, 0, 3), (4.0, 2, 4)];

    let direct_doc = MockDocument::new();
    let mut direct = player_over(&direct_doc, log_of(&steps));
    seek(&mut direct, 3.0);

    let split_doc = MockDocument::new();
    let mut split = player_over(&split_doc, log_of(&steps));
    seek(&mut split, 1.0);
    seek(&mut split, 3.0);

    assert_eq!(direct_doc.snapshot(), split_doc.snapshot());
    assert_eq!(direct.cursor(), split.cursor());
}

#[test]
fn forward_backward_round_trip_restores_every_prefix() {
    let steps = [(1.0, 0, 11), (2.0, 1, 22), (3.0, 0, 33), (4.0, 2, 44)];
    let log = log_of(&steps);

    let doc = MockDocument::new();
    let mut player = player_over(&doc, log.clone());
    seek(&mut player, 5.0);

    // Walking back to just before each step must land exactly on the
    // state a forward-only replay to that point produces.
    for target in [3.5, 2.5, 1.5, 0.0] {
        seek(&mut player, target);
        assert_eq!(doc.snapshot(), straight_line(&log, target));
    }
}

#[test]
fn oscillating_over_one_step_is_stable() {
    let log = log_of(&[(1.0, 0, 42)]);
    let doc = MockDocument::new();
    let mut player = player_over(&doc, log);

    for _ in 0..5 {
        seek(&mut player, 2.0);
        assert_eq!(doc.cell(0), 42);
        seek(&mut player, 0.5);
        assert_eq!(doc.cell(0), 0);
    }
}

#[test]
fn seek_to_exact_step_timestamp_includes_it() {
    let log = log_of(&[(1.0, 0, 1), (2.0, 1, 2)]);
    let doc = MockDocument::new();
    let mut player = player_over(&doc, log);

    seek(&mut player, 2.0);
    assert_eq!(doc.cell(1), 2);

    // Seeking back to exactly 1.0 keeps the step at 1.0 applied.
    seek(&mut player, 1.0);
    assert_eq!(doc.cell(0), 1);
    assert_eq!(doc.cell(1), 0);
}

// ── Randomized seek sequences ───────────────────────────────────

proptest! {
    // Starting from zero, any seek sequence leaves the document in the
    // state determined solely by the final position.
    #[test]
    fn any_seek_sequence_is_position_determined(
        stamps in prop::collection::vec(0.0f64..100.0, 1..40),
        writes in prop::collection::vec((0u8..16, 1u8..=255), 1..40),
        seeks in prop::collection::vec(0.0f64..110.0, 1..20),
        final_to in 0.0f64..110.0,
    ) {
        let mut stamps = stamps;
        stamps.sort_by(f64::total_cmp);
        let steps: Vec<(f64, u8, u8)> = stamps
            .iter()
            .zip(writes.iter().cycle())
            .map(|(&at, &(index, value))| (at, index, value))
            .collect();
        let log = log_of(&steps);

        let doc = MockDocument::new();
        let mut player = player_over(&doc, log.clone());
        for &to in &seeks {
            seek(&mut player, to);
        }
        seek(&mut player, final_to);

        prop_assert_eq!(doc.snapshot(), straight_line(&log, final_to));
        prop_assert_eq!(player.cursor(), final_to);
    }
}

// ── Record → encode → decode → replay ───────────────────────────

#[test]
fn recorded_session_replays_through_the_codec() {
    // Record: mutate a live document while mirroring each delta into
    // the session feed.
    let live = MockDocument::new();
    let clock = FakeSessionClock::new();
    let config = RecorderConfig::new(Arc::new(clock.clone()));
    let (mut session, feed) = ActiveRecording::start(
        config,
        &live,
        doccast_core::ViewportPosition {
            anchor_id: "top".into(),
            relative_offset: 0.0,
        },
    )
    .unwrap();

    let edits: [(f64, &[(u8, u8)]); 3] = [
        (0.5, &[(0, 10), (1, 11)]),
        (1.25, &[(0, 20)]),
        (3.0, &[(2, 30), (3, 31), (4, 32)]),
    ];
    for (at, writes) in edits {
        use doccast_core::DeltaApplier;
        clock.set(at);
        let delta = write_delta(writes);
        let mut editor = live.clone();
        editor.apply(&delta).unwrap();
        feed.emit_delta(delta);
    }
    session.pump();
    let done = session.stop();

    // Round-trip the recording through the binary format.
    let mut blob = Vec::new();
    encode_recording(&mut blob, &done.recording).unwrap();
    let decoded = decode_recording(&mut blob.as_slice()).unwrap();
    assert_eq!(decoded.log.steps.len(), 3);

    // Replay against a fresh document restored from the snapshot.
    let replayed = MockDocument::new();
    replayed.restore(&decoded.log.initial_snapshot);
    let duration = decoded.log.duration();
    let initial = decoded.log.initial_snapshot.clone();
    let mut player = player_over(&replayed, decoded.log);

    seek(&mut player, duration);
    assert_eq!(replayed.snapshot(), live.snapshot());

    seek(&mut player, 0.0);
    assert_eq!(replayed.snapshot(), initial);
}

// ── Empty and edge logs ─────────────────────────────────────────

#[test]
fn empty_log_seeks_are_no_ops() {
    let doc = MockDocument::new();
    let mut player = player_over(&doc, EventLog::new(vec![]));

    let report = seek(&mut player, 42.0);
    assert!(report.reconciled);
    assert_eq!(report.applied, 0);
    let report = seek(&mut player, 0.0);
    assert_eq!(report.reverted, 0);
    assert_eq!(doc.snapshot(), vec![0; 256]);
}

#[test]
fn seek_past_duration_applies_everything() {
    let log = log_of(&[(1.0, 0, 5)]);
    let doc = MockDocument::new();
    let mut player = player_over(&doc, log);

    let report = seek(&mut player, 1_000.0);
    assert_eq!(report.applied, 1);
    assert_eq!(doc.cell(0), 5);
}

#[test]
fn steps_sharing_a_timestamp_apply_and_revert_in_order() {
    let mut log = EventLog::new(vec![0; 256]);
    log.steps = vec![
        Step {
            at: 1.0,
            delta: write_delta(&[(0, 1)]),
        },
        Step {
            at: 1.0,
            delta: write_delta(&[(0, 2)]),
        },
    ];
    let doc = MockDocument::new();
    let mut player = player_over(&doc, log);

    seek(&mut player, 1.0);
    assert_eq!(doc.cell(0), 2);
    seek(&mut player, 0.0);
    assert_eq!(doc.cell(0), 0);
}

#[test]
fn empty_delta_round_trips_as_a_no_op() {
    let mut log = EventLog::new(vec![0; 256]);
    log.steps = vec![Step {
        at: 1.0,
        delta: DeltaSet::new(),
    }];
    let doc = MockDocument::new();
    let mut player = player_over(&doc, log);

    let report = seek(&mut player, 2.0);
    assert_eq!(report.applied, 1);
    let report = seek(&mut player, 0.0);
    assert_eq!(report.reverted, 1);
    assert_eq!(doc.snapshot(), vec![0; 256]);
}
