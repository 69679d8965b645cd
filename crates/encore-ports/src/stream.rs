use crate::types::{Millis, Pitch};
use serde::{Deserialize, Serialize};

/// One detected note from the external pitch-detection collaborator.
/// Onsets are session-relative and may arrive slightly out of order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayedNoteEvent {
    pub pitch: Pitch,
    pub onset_ms: Millis,
    pub duration_ms: Option<Millis>,
}

/// Pull-based stream of played notes. `None` means end of stream.
pub trait NoteEventSource: Send {
    fn next_event(&mut self) -> Option<PlayedNoteEvent>;
}

/// Replays a fixed list of events in the order given.
pub struct ReplaySource {
    events: std::vec::IntoIter<PlayedNoteEvent>,
}

impl ReplaySource {
    pub fn new(events: Vec<PlayedNoteEvent>) -> Self {
        Self {
            events: events.into_iter(),
        }
    }
}

impl NoteEventSource for ReplaySource {
    fn next_event(&mut self) -> Option<PlayedNoteEvent> {
        self.events.next()
    }
}
