use encore_ports::catalog::TimelineDto;
use encore_ports::config::EngineSettings;
use encore_ports::types::{Millis, Pitch};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TimelineError {
    #[error("timeline has no notes")]
    Empty,
    #[error("note onsets not strictly increasing at index {0}")]
    UnorderedOnsets(u32),
    #[error("duplicate note index {0}")]
    DuplicateIndex(u32),
    #[error("negative duration at index {0}")]
    NegativeDuration(u32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpectedNote {
    index: u32,
    pitch: Pitch,
    onset_ms: Millis,
    duration_ms: Millis,
    tolerance_ms: Option<Millis>,
}

impl ExpectedNote {
    pub fn new(index: u32, pitch: Pitch, onset_ms: Millis, duration_ms: Millis) -> Self {
        Self {
            index,
            pitch,
            onset_ms,
            duration_ms,
            tolerance_ms: None,
        }
    }

    /// Overrides the timeline-wide tolerance for this note.
    pub fn with_tolerance(mut self, tolerance_ms: Millis) -> Self {
        self.tolerance_ms = Some(tolerance_ms);
        self
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn pitch(&self) -> Pitch {
        self.pitch
    }

    pub fn onset_ms(&self) -> Millis {
        self.onset_ms
    }

    pub fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    pub fn tolerance_ms(&self) -> Option<Millis> {
        self.tolerance_ms
    }
}

/// Reference composition timeline. Validated on construction and immutable
/// afterwards; shared read-only across sessions of the same composition.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpectedTimeline {
    notes: Vec<ExpectedNote>,
    total_duration_ms: Millis,
    default_tolerance_ms: Millis,
    default_pitch_tolerance: f32,
}

impl ExpectedTimeline {
    pub fn new(
        notes: Vec<ExpectedNote>,
        default_tolerance_ms: Millis,
        default_pitch_tolerance: f32,
    ) -> Result<Self, TimelineError> {
        if notes.is_empty() {
            return Err(TimelineError::Empty);
        }

        let mut seen = HashSet::with_capacity(notes.len());
        for (pos, note) in notes.iter().enumerate() {
            if !seen.insert(note.index) {
                return Err(TimelineError::DuplicateIndex(note.index));
            }
            if note.duration_ms < 0 {
                return Err(TimelineError::NegativeDuration(note.index));
            }
            if pos > 0 && note.onset_ms <= notes[pos - 1].onset_ms {
                return Err(TimelineError::UnorderedOnsets(note.index));
            }
        }

        let total_duration_ms = notes
            .iter()
            .map(|note| note.onset_ms + note.duration_ms)
            .max()
            .unwrap_or(0);

        Ok(Self {
            notes,
            total_duration_ms,
            default_tolerance_ms,
            default_pitch_tolerance,
        })
    }

    /// Validates a catalog DTO into a timeline; DTO-level defaults fall back
    /// to the engine settings.
    pub fn from_dto(dto: &TimelineDto, settings: &EngineSettings) -> Result<Self, TimelineError> {
        let notes = dto
            .notes
            .iter()
            .map(|note| ExpectedNote {
                index: note.index,
                pitch: Pitch::new(note.pitch),
                onset_ms: note.onset_ms,
                duration_ms: note.duration_ms,
                tolerance_ms: note.tolerance_ms,
            })
            .collect();

        Self::new(
            notes,
            dto.default_tolerance_ms.unwrap_or(settings.default_tolerance_ms),
            dto.default_pitch_tolerance.unwrap_or(settings.default_pitch_tolerance),
        )
    }

    pub fn notes(&self) -> &[ExpectedNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn total_duration_ms(&self) -> Millis {
        self.total_duration_ms
    }

    pub fn default_tolerance_ms(&self) -> Millis {
        self.default_tolerance_ms
    }

    pub fn default_pitch_tolerance(&self) -> f32 {
        self.default_pitch_tolerance
    }

    pub fn effective_tolerance_ms(&self, note: &ExpectedNote) -> Millis {
        note.tolerance_ms.unwrap_or(self.default_tolerance_ms)
    }
}
