use encore_domain_timeline::{
    import_timeline_json, ExpectedNote, ExpectedTimeline, TimelineError, TimelineImportError,
};
use encore_ports::config::EngineSettings;
use encore_ports::types::Pitch;

fn note(index: u32, pitch: u8, onset_ms: i64) -> ExpectedNote {
    ExpectedNote::new(index, Pitch::from_midi(pitch), onset_ms, 200)
}

#[test]
fn rejects_empty_timeline() {
    let result = ExpectedTimeline::new(Vec::new(), 120, 0.5);
    assert_eq!(result.unwrap_err(), TimelineError::Empty);
}

#[test]
fn rejects_non_increasing_onsets() {
    let notes = vec![note(0, 60, 0), note(1, 62, 500), note(2, 64, 500)];
    let result = ExpectedTimeline::new(notes, 120, 0.5);
    assert_eq!(result.unwrap_err(), TimelineError::UnorderedOnsets(2));
}

#[test]
fn rejects_duplicate_indices() {
    let notes = vec![note(0, 60, 0), note(0, 62, 500)];
    let result = ExpectedTimeline::new(notes, 120, 0.5);
    assert_eq!(result.unwrap_err(), TimelineError::DuplicateIndex(0));
}

#[test]
fn total_duration_covers_longest_sounding_note() {
    let notes = vec![
        ExpectedNote::new(0, Pitch::from_midi(60), 0, 2000),
        ExpectedNote::new(1, Pitch::from_midi(62), 500, 200),
    ];
    let timeline = ExpectedTimeline::new(notes, 120, 0.5).unwrap();
    assert_eq!(timeline.total_duration_ms(), 2000);
}

#[test]
fn per_note_tolerance_overrides_default() {
    let notes = vec![note(0, 60, 0).with_tolerance(80), note(1, 62, 500)];
    let timeline = ExpectedTimeline::new(notes, 120, 0.5).unwrap();
    assert_eq!(timeline.effective_tolerance_ms(&timeline.notes()[0]), 80);
    assert_eq!(timeline.effective_tolerance_ms(&timeline.notes()[1]), 120);
}

#[test]
fn json_import_builds_validated_timeline() {
    let json = br#"{
        "composition_id": "etude-1",
        "default_tolerance_ms": 90,
        "default_pitch_tolerance": null,
        "notes": [
            { "index": 0, "pitch": 60.0, "onset_ms": 0, "duration_ms": 400, "tolerance_ms": null },
            { "index": 1, "pitch": 62.0, "onset_ms": 500, "duration_ms": 400, "tolerance_ms": 150 }
        ]
    }"#;

    let settings = EngineSettings::default();
    let timeline = import_timeline_json(json, &settings).unwrap();

    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline.default_tolerance_ms(), 90);
    assert_eq!(timeline.default_pitch_tolerance(), settings.default_pitch_tolerance);
    assert_eq!(timeline.effective_tolerance_ms(&timeline.notes()[1]), 150);
}

#[test]
fn json_import_surfaces_validation_failure() {
    let json = br#"{
        "composition_id": "broken",
        "default_tolerance_ms": null,
        "default_pitch_tolerance": null,
        "notes": []
    }"#;

    let err = import_timeline_json(json, &EngineSettings::default()).unwrap_err();
    assert!(matches!(
        err,
        TimelineImportError::Invalid(TimelineError::Empty)
    ));
}

#[test]
fn json_import_rejects_malformed_payload() {
    let err = import_timeline_json(b"not json", &EngineSettings::default()).unwrap_err();
    assert!(matches!(err, TimelineImportError::Parse(_)));
}
