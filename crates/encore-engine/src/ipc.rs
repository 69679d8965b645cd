use encore_ports::stream::PlayedNoteEvent;
use encore_ports::summary::{NoteAttempt, SessionSummary};
use encore_ports::types::{Millis, SessionId};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Command {
    OpenSession { session_id: SessionId, composition_id: String },
    SubmitNote { session_id: SessionId, event: PlayedNoteEvent },
    Tick { session_id: SessionId, clock_ms: Millis },
    AbandonSession { session_id: SessionId },
    FinishSession { session_id: SessionId },
}

impl Command {
    /// Routing key: one session is always serviced by the same worker.
    pub fn session_id(&self) -> SessionId {
        match self {
            Command::OpenSession { session_id, .. }
            | Command::SubmitNote { session_id, .. }
            | Command::Tick { session_id, .. }
            | Command::AbandonSession { session_id }
            | Command::FinishSession { session_id } => *session_id,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    SessionOpened {
        session_id: SessionId,
    },
    AttemptJudged {
        session_id: SessionId,
        attempt: NoteAttempt,
        combo: u32,
        total_score: i64,
    },
    SessionFinished {
        session_id: SessionId,
        summary: SessionSummary,
    },
    CommandFailed {
        session_id: SessionId,
        message: String,
    },
}
