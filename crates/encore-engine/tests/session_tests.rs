use encore_domain_timeline::{ExpectedNote, ExpectedTimeline};
use encore_engine::{Session, SessionError};
use encore_ports::config::EngineSettings;
use encore_ports::stream::{PlayedNoteEvent, ReplaySource};
use encore_ports::summary::{Classification, SessionStatus};
use encore_ports::types::{Pitch, Shared};

fn note(index: u32, pitch: u8, onset_ms: i64, tolerance_ms: i64) -> ExpectedNote {
    ExpectedNote::new(index, Pitch::from_midi(pitch), onset_ms, 100).with_tolerance(tolerance_ms)
}

fn two_note_timeline() -> Shared<ExpectedTimeline> {
    Shared::new(
        ExpectedTimeline::new(vec![note(0, 60, 0, 100), note(1, 62, 500, 100)], 100, 0.5).unwrap(),
    )
}

fn played(pitch: u8, onset_ms: i64) -> PlayedNoteEvent {
    PlayedNoteEvent {
        pitch: Pitch::from_midi(pitch),
        onset_ms,
        duration_ms: None,
    }
}

#[test]
fn perfect_then_wrong_pitch_scenario() {
    let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();

    let first = session.submit(played(60, 10)).unwrap();
    assert_eq!(first.classification, Classification::Perfect);
    assert_eq!(first.expected_index, Some(0));

    // Pitch 64 matches nothing, but note 1's timing window does.
    let second = session.submit(played(64, 505)).unwrap();
    assert_eq!(second.classification, Classification::WrongPitch);
    assert_eq!(second.expected_index, Some(1));

    let missed = session.tick(700).unwrap();
    assert!(missed.is_empty());

    let summary = session.finish();
    assert_eq!(summary.status, SessionStatus::Completed);
    assert_eq!(summary.attempts.len(), 2);
    assert_eq!(summary.best_streak, 1);
}

#[test]
fn clock_regression_is_an_error() {
    let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();

    session.tick(100).unwrap();
    let err = session.tick(50).unwrap_err();

    assert_eq!(
        err,
        SessionError::ClockRegression {
            current: 100,
            requested: 50,
        }
    );
}

#[test]
fn extra_event_consumes_nothing_and_resets_streak() {
    let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();

    session.submit(played(60, 10)).unwrap();
    assert_eq!(session.combo().current_streak, 1);

    // Pitch 90 at onset 50: note 0 is consumed, note 1 is 450ms away.
    let extra = session.submit(played(90, 50)).unwrap();
    assert_eq!(extra.classification, Classification::Extra);
    assert_eq!(extra.expected_index, None);
    assert_eq!(session.combo().current_streak, 0);

    // Note 1 is still matchable afterwards.
    let hit = session.submit(played(62, 500)).unwrap();
    assert_eq!(hit.expected_index, Some(1));
}

#[test]
fn every_uncovered_note_is_missed_exactly_once() {
    let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();

    let missed_first = session.tick(300).unwrap();
    assert_eq!(missed_first.len(), 1);
    assert_eq!(missed_first[0].expected_index, Some(0));
    assert_eq!(missed_first[0].classification, Classification::Missed);

    let missed_second = session.tick(700).unwrap();
    assert_eq!(missed_second.len(), 1);
    assert_eq!(missed_second[0].expected_index, Some(1));

    let summary = session.finish();
    assert_eq!(summary.counts.missed, 2);
    assert_eq!(summary.counts.total() as usize, summary.attempts.len());
    let indices: Vec<_> = summary
        .attempts
        .iter()
        .filter_map(|attempt| attempt.expected_index)
        .collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn matched_note_is_never_referenced_twice() {
    let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();

    session.submit(played(60, 0)).unwrap();
    session.submit(played(60, 5)).unwrap();
    session.tick(700).unwrap();
    let summary = session.finish();

    let mut seen = std::collections::HashSet::new();
    for attempt in summary
        .attempts
        .iter()
        .filter(|attempt| attempt.expected_index.is_some())
    {
        assert!(seen.insert(attempt.expected_index));
    }
}

#[test]
fn replaying_identical_attempts_yields_identical_scores() {
    let events = vec![
        played(60, 10),
        played(90, 50),
        played(62, 520),
        played(64, 700),
    ];

    let mut totals = Vec::new();
    for _ in 0..2 {
        let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();
        let mut source = ReplaySource::new(events.clone());
        session.play_through(&mut source).unwrap();
        totals.push(session.finish());
    }

    assert_eq!(totals[0], totals[1]);
}

#[test]
fn finish_is_idempotent() {
    let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();
    session.submit(played(60, 10)).unwrap();
    session.tick(700).unwrap();

    let first = session.finish();
    let second = session.finish();
    assert_eq!(first, second);
}

#[test]
fn submit_after_finish_is_rejected() {
    let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();
    session.finish();

    let err = session.submit(played(60, 10)).unwrap_err();
    assert_eq!(err, SessionError::SessionNotActive);
    let err = session.tick(100).unwrap_err();
    assert_eq!(err, SessionError::SessionNotActive);
}

#[test]
fn finish_at_timeline_end_flushes_pending_notes_as_missed() {
    let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();

    session.submit(played(60, 10)).unwrap();
    // Clock reaches the end of the piece, but note 1's tolerance window is
    // still open, so it was not evicted by tick.
    session.tick(600).unwrap();
    assert_eq!(session.status(), SessionStatus::Active);

    let summary = session.finish();
    assert_eq!(summary.status, SessionStatus::Completed);
    assert_eq!(summary.counts.missed, 1);
    assert_eq!(summary.attempts.len(), 2);
}

#[test]
fn finish_before_timeline_end_abandons() {
    let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();
    session.submit(played(60, 10)).unwrap();

    let summary = session.finish();
    assert_eq!(summary.status, SessionStatus::Abandoned);
}

#[test]
fn input_silence_past_dead_time_abandons() {
    let timeline = Shared::new(
        ExpectedTimeline::new(vec![note(0, 60, 0, 100), note(1, 62, 60_000, 100)], 100, 0.5)
            .unwrap(),
    );
    let mut session = Session::open(timeline, &EngineSettings::default()).unwrap();

    session.tick(15_000).unwrap();
    assert_eq!(session.status(), SessionStatus::Abandoned);

    let summary = session.finish();
    assert_eq!(summary.status, SessionStatus::Abandoned);
    assert_eq!(summary.counts.missed, 1);
}

#[test]
fn completing_the_timeline_ends_the_session_on_tick() {
    let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();

    session.submit(played(60, 10)).unwrap();
    session.submit(played(62, 500)).unwrap();
    session.tick(700).unwrap();

    assert_eq!(session.status(), SessionStatus::Completed);
    let summary = session.finish();
    assert_eq!(summary.status, SessionStatus::Completed);
    assert!(summary.accuracy > 0.99);
}

#[test]
fn accuracy_counts_only_perfect_and_good() {
    let mut session = Session::open(two_note_timeline(), &EngineSettings::default()).unwrap();

    session.submit(played(60, 10)).unwrap();
    session.submit(played(64, 505)).unwrap();
    session.tick(700).unwrap();

    let summary = session.finish();
    assert_eq!(summary.accuracy, 0.5);
}
