use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

pub type Millis = i64; // session-relative time, monotonic per session

/// Fractional semitone on the MIDI note scale (60.0 = middle C).
/// Pitch detection may report values between semitones.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pitch(pub f32);

impl Pitch {
    pub fn new(semitones: f32) -> Self {
        Self(semitones.clamp(0.0, 127.0))
    }

    pub fn from_midi(note: u8) -> Self {
        Self(note.min(127) as f32)
    }

    pub fn get(self) -> f32 {
        self.0
    }

    pub fn distance(self, other: Pitch) -> f32 {
        (self.0 - other.0).abs()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type Shared<T> = Arc<T>;
