use crate::model::{ExpectedTimeline, TimelineError};
use encore_ports::catalog::TimelineDto;
use encore_ports::config::EngineSettings;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum TimelineImportError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid timeline: {0}")]
    Invalid(#[from] TimelineError),
}

pub fn import_timeline_path(
    path: &Path,
    settings: &EngineSettings,
) -> Result<ExpectedTimeline, TimelineImportError> {
    let data = std::fs::read(path).map_err(|e| TimelineImportError::Io(e.to_string()))?;
    import_timeline_json(&data, settings)
}

pub fn import_timeline_json(
    data: &[u8],
    settings: &EngineSettings,
) -> Result<ExpectedTimeline, TimelineImportError> {
    let dto = parse_timeline_dto(data)?;
    Ok(ExpectedTimeline::from_dto(&dto, settings)?)
}

pub fn parse_timeline_dto(data: &[u8]) -> Result<TimelineDto, TimelineImportError> {
    serde_json::from_slice(data).map_err(|e| TimelineImportError::Parse(e.to_string()))
}
