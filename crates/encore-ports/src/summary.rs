use crate::types::{Millis, SessionId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Perfect,
    Good,
    Early,
    Late,
    WrongPitch,
    Missed,
    Extra,
}

/// Result of aligning one played event (or a missed-note timeout) against
/// at most one expected note. Immutable once created.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteAttempt {
    /// None marks an extra unmatched input.
    pub expected_index: Option<u32>,
    pub classification: Classification,
    pub timing_offset_ms: Millis,
    pub score_delta: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationCounts {
    pub perfect: u32,
    pub good: u32,
    pub early: u32,
    pub late: u32,
    pub wrong_pitch: u32,
    pub missed: u32,
    pub extra: u32,
}

impl ClassificationCounts {
    pub fn record(&mut self, classification: Classification) {
        match classification {
            Classification::Perfect => self.perfect += 1,
            Classification::Good => self.good += 1,
            Classification::Early => self.early += 1,
            Classification::Late => self.late += 1,
            Classification::WrongPitch => self.wrong_pitch += 1,
            Classification::Missed => self.missed += 1,
            Classification::Extra => self.extra += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.perfect
            + self.good
            + self.early
            + self.late
            + self.wrong_pitch
            + self.missed
            + self.extra
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Active,
    Completed,
    Abandoned,
}

/// Final session record handed to the external persistence collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub status: SessionStatus,
    pub total_score: i64,
    pub best_streak: u32,
    pub counts: ClassificationCounts,
    /// Perfect + Good over the number of expected notes, 0..=1.
    pub accuracy: f32,
    pub duration_ms: Millis,
    pub attempts: Vec<NoteAttempt>,
}

#[derive(thiserror::Error, Debug)]
pub enum SummaryStoreError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

pub trait SummaryStorePort: Send + Sync {
    fn store_summary(
        &self,
        session_id: SessionId,
        summary: &SessionSummary,
    ) -> Result<(), SummaryStoreError>;
}
