use crate::ipc::{Command, Event};
use crate::session::{Session, SessionError};
use encore_domain_timeline::ExpectedTimeline;
use encore_ports::catalog::{CatalogError, CatalogPort};
use encore_ports::config::EngineSettings;
use encore_ports::types::{SessionId, Shared};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};

#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),
    #[error("session already open: {0}")]
    DuplicateSession(SessionId),
}

/// Validated timelines keyed by composition id, shared read-only across
/// sessions and workers. Loaded through the catalog port on first use.
pub struct TimelineCache {
    inner: RwLock<HashMap<String, Shared<ExpectedTimeline>>>,
}

impl TimelineCache {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_or_load(
        &self,
        composition_id: &str,
        catalog: &dyn CatalogPort,
        settings: &EngineSettings,
    ) -> Result<Shared<ExpectedTimeline>, EngineError> {
        if let Some(timeline) = self.inner.read().get(composition_id) {
            return Ok(timeline.clone());
        }

        let dto = catalog.load_timeline(composition_id)?;
        let timeline = Shared::new(
            ExpectedTimeline::from_dto(&dto, settings).map_err(SessionError::from)?,
        );
        self.inner
            .write()
            .insert(composition_id.to_string(), timeline.clone());
        Ok(timeline)
    }
}

impl Default for TimelineCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Command-driven multi-session core. Sessions are exclusively owned here;
/// callers interact through commands and drain the emitted events.
pub struct EngineCore {
    settings: EngineSettings,
    catalog: Box<dyn CatalogPort>,
    timelines: Shared<TimelineCache>,
    sessions: HashMap<SessionId, Session>,
    events: VecDeque<Event>,
}

impl EngineCore {
    pub fn new(settings: EngineSettings, catalog: Box<dyn CatalogPort>) -> Self {
        Self::with_timeline_cache(settings, catalog, Shared::new(TimelineCache::new()))
    }

    /// Workers of a pool share one cache so each composition loads once.
    pub fn with_timeline_cache(
        settings: EngineSettings,
        catalog: Box<dyn CatalogPort>,
        timelines: Shared<TimelineCache>,
    ) -> Self {
        Self {
            settings,
            catalog,
            timelines,
            sessions: HashMap::new(),
            events: VecDeque::new(),
        }
    }

    pub fn handle_command(&mut self, cmd: Command) -> Result<(), EngineError> {
        match cmd {
            Command::OpenSession {
                session_id,
                composition_id,
            } => {
                if self.sessions.contains_key(&session_id) {
                    return Err(EngineError::DuplicateSession(session_id));
                }
                let timeline = self.timelines.get_or_load(
                    &composition_id,
                    self.catalog.as_ref(),
                    &self.settings,
                )?;
                let session = Session::open(timeline, &self.settings)?;
                self.sessions.insert(session_id, session);
                self.events.push_back(Event::SessionOpened { session_id });
            }
            Command::SubmitNote { session_id, event } => {
                let session = self.session_mut(session_id)?;
                let attempt = session.submit(event)?;
                let combo = session.combo().current_streak;
                let total_score = session.total_score();
                self.events.push_back(Event::AttemptJudged {
                    session_id,
                    attempt,
                    combo,
                    total_score,
                });
            }
            Command::Tick {
                session_id,
                clock_ms,
            } => {
                let session = self.session_mut(session_id)?;
                let missed = session.tick(clock_ms)?;
                let combo = session.combo().current_streak;
                let total_score = session.total_score();
                for attempt in missed {
                    self.events.push_back(Event::AttemptJudged {
                        session_id,
                        attempt,
                        combo,
                        total_score,
                    });
                }
            }
            Command::AbandonSession { session_id } => {
                self.session_mut(session_id)?.abandon();
            }
            Command::FinishSession { session_id } => {
                let mut session = self
                    .sessions
                    .remove(&session_id)
                    .ok_or(EngineError::UnknownSession(session_id))?;
                let summary = session.finish();
                self.events.push_back(Event::SessionFinished {
                    session_id,
                    summary,
                });
            }
        }
        Ok(())
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain(..).collect()
    }

    pub fn session(&self, session_id: SessionId) -> Option<&Session> {
        self.sessions.get(&session_id)
    }

    fn session_mut(&mut self, session_id: SessionId) -> Result<&mut Session, EngineError> {
        self.sessions
            .get_mut(&session_id)
            .ok_or(EngineError::UnknownSession(session_id))
    }
}
