use crate::types::Millis;
use serde::{Deserialize, Serialize};

fn default_tolerance_ms() -> Millis {
    120
}

fn default_perfect_window_ms() -> Millis {
    40
}

fn default_outer_grace_ms() -> Millis {
    250
}

fn default_pitch_tolerance() -> f32 {
    0.5
}

fn default_lookahead_ms() -> Millis {
    1000
}

fn default_max_window_notes() -> usize {
    16
}

fn default_dead_time_threshold_ms() -> Millis {
    10_000
}

fn default_combo_table() -> Vec<ComboStep> {
    vec![
        ComboStep { min_streak: 0, multiplier: 1 },
        ComboStep { min_streak: 10, multiplier: 2 },
        ComboStep { min_streak: 25, multiplier: 3 },
        ComboStep { min_streak: 50, multiplier: 4 },
    ]
}

/// One step of the combo multiplier table: streaks of at least `min_streak`
/// score with `multiplier`, until the next step takes over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboStep {
    pub min_streak: u32,
    pub multiplier: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseScores {
    pub perfect: i64,
    pub good: i64,
    pub early: i64,
    pub late: i64,
    pub wrong_pitch: i64,
    /// Applied to Extra attempts, never combo-scaled.
    pub extra_penalty: i64,
}

impl Default for BaseScores {
    fn default() -> Self {
        Self {
            perfect: 100,
            good: 70,
            early: 40,
            late: 40,
            wrong_pitch: 20,
            extra_penalty: -5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    #[serde(default = "default_tolerance_ms")]
    pub default_tolerance_ms: Millis,
    #[serde(default = "default_perfect_window_ms")]
    pub perfect_window_ms: Millis,
    #[serde(default = "default_outer_grace_ms")]
    pub outer_grace_ms: Millis,
    #[serde(default = "default_pitch_tolerance")]
    pub default_pitch_tolerance: f32,
    #[serde(default = "default_lookahead_ms")]
    pub lookahead_ms: Millis,
    #[serde(default = "default_max_window_notes")]
    pub max_window_notes: usize,
    #[serde(default = "default_dead_time_threshold_ms")]
    pub dead_time_threshold_ms: Millis,
    pub base_scores: BaseScores,
    #[serde(default = "default_combo_table")]
    pub combo_table: Vec<ComboStep>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_tolerance_ms: default_tolerance_ms(),
            perfect_window_ms: default_perfect_window_ms(),
            outer_grace_ms: default_outer_grace_ms(),
            default_pitch_tolerance: default_pitch_tolerance(),
            lookahead_ms: default_lookahead_ms(),
            max_window_notes: default_max_window_notes(),
            dead_time_threshold_ms: default_dead_time_threshold_ms(),
            base_scores: BaseScores::default(),
            combo_table: default_combo_table(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
}

pub trait StoragePort: Send + Sync {
    fn load_settings(&self) -> Result<EngineSettings, StorageError>;
    fn save_settings(&self, s: &EngineSettings) -> Result<(), StorageError>;
}
