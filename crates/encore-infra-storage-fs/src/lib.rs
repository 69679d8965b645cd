use encore_ports::catalog::{CatalogError, CatalogPort, TimelineDto};
use encore_ports::config::{EngineSettings, StorageError, StoragePort};
use encore_ports::summary::{SessionSummary, SummaryStoreError, SummaryStorePort};
use encore_ports::types::SessionId;
use std::fs;
use std::path::{Path, PathBuf};

pub struct FsStorage {
    base_dir: PathBuf,
}

impl FsStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_base_dir() -> Result<PathBuf, StorageError> {
        let base = dirs_next::config_dir()
            .ok_or_else(|| StorageError::Io("config dir not found".to_string()))?;
        Ok(base.join("Encore"))
    }

    fn settings_path(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }
}

impl Default for FsStorage {
    fn default() -> Self {
        let base_dir = Self::default_base_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { base_dir }
    }
}

impl StoragePort for FsStorage {
    fn load_settings(&self) -> Result<EngineSettings, StorageError> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(EngineSettings::default());
        }
        read_json(&path).map_err(|err| match err {
            JsonFsError::Io(msg) => StorageError::Io(msg),
            JsonFsError::Serde(msg) => StorageError::Serde(msg),
        })
    }

    fn save_settings(&self, s: &EngineSettings) -> Result<(), StorageError> {
        write_json(&self.settings_path(), s).map_err(|err| match err {
            JsonFsError::Io(msg) => StorageError::Io(msg),
            JsonFsError::Serde(msg) => StorageError::Serde(msg),
        })
    }
}

/// Catalog adapter over a directory of `<composition_id>.json` files.
pub struct FsCatalog {
    compositions_dir: PathBuf,
}

impl FsCatalog {
    pub fn new(compositions_dir: PathBuf) -> Self {
        Self { compositions_dir }
    }

    fn composition_path(&self, composition_id: &str) -> PathBuf {
        self.compositions_dir.join(format!("{composition_id}.json"))
    }
}

impl CatalogPort for FsCatalog {
    fn load_timeline(&self, composition_id: &str) -> Result<TimelineDto, CatalogError> {
        let path = self.composition_path(composition_id);
        if !path.exists() {
            return Err(CatalogError::NotFound(composition_id.to_string()));
        }
        read_json(&path).map_err(|err| match err {
            JsonFsError::Io(msg) => CatalogError::Io(msg),
            JsonFsError::Serde(msg) => CatalogError::Parse(msg),
        })
    }
}

/// Summary persistence: one `<session_id>.json` record per finished session.
pub struct FsSummaryStore {
    sessions_dir: PathBuf,
}

impl FsSummaryStore {
    pub fn new(sessions_dir: PathBuf) -> Self {
        Self { sessions_dir }
    }

    pub fn summary_path(&self, session_id: SessionId) -> PathBuf {
        self.sessions_dir.join(format!("{session_id}.json"))
    }
}

impl SummaryStorePort for FsSummaryStore {
    fn store_summary(
        &self,
        session_id: SessionId,
        summary: &SessionSummary,
    ) -> Result<(), SummaryStoreError> {
        write_json(&self.summary_path(session_id), summary).map_err(|err| match err {
            JsonFsError::Io(msg) => SummaryStoreError::Io(msg),
            JsonFsError::Serde(msg) => SummaryStoreError::Serde(msg),
        })
    }
}

enum JsonFsError {
    Io(String),
    Serde(String),
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, JsonFsError> {
    let data = fs::read(path).map_err(|e| JsonFsError::Io(e.to_string()))?;
    serde_json::from_slice(&data).map_err(|e| JsonFsError::Serde(e.to_string()))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), JsonFsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| JsonFsError::Io(e.to_string()))?;
    }
    let data = serde_json::to_vec_pretty(value).map_err(|e| JsonFsError::Serde(e.to_string()))?;
    fs::write(path, data).map_err(|e| JsonFsError::Io(e.to_string()))
}
