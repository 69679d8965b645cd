use crate::types::Millis;
use serde::{Deserialize, Serialize};

/// Composition as stored by the external catalog collaborator, not yet
/// validated against the timeline invariants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimelineDto {
    pub composition_id: String,
    pub default_tolerance_ms: Option<Millis>,
    pub default_pitch_tolerance: Option<f32>,
    pub notes: Vec<NoteDto>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct NoteDto {
    pub index: u32,
    pub pitch: f32,
    pub onset_ms: Millis,
    pub duration_ms: Millis,
    pub tolerance_ms: Option<Millis>,
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("composition not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
}

pub trait CatalogPort: Send + Sync {
    fn load_timeline(&self, composition_id: &str) -> Result<TimelineDto, CatalogError>;
}
