use encore_domain_align::{Aligner, AlignerConfig, ComboState, MatchWindow, Scorer, WindowConfig};
use encore_domain_timeline::{ExpectedTimeline, TimelineError};
use encore_ports::config::EngineSettings;
use encore_ports::stream::{NoteEventSource, PlayedNoteEvent};
use encore_ports::summary::{
    Classification, ClassificationCounts, NoteAttempt, SessionStatus, SessionSummary,
};
use encore_ports::types::{Millis, Shared};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid timeline: {0}")]
    InvalidTimeline(#[from] TimelineError),
    #[error("session is not active")]
    SessionNotActive,
    #[error("clock moved backward: {requested} < {current}")]
    ClockRegression { current: Millis, requested: Millis },
}

/// One user's play-through of one composition. Owns all mutable state;
/// exactly one caller may drive it at a time.
pub struct Session {
    timeline: Shared<ExpectedTimeline>,
    window: MatchWindow,
    aligner: Aligner,
    scorer: Scorer,
    combo: ComboState,
    attempts: Vec<NoteAttempt>,
    counts: ClassificationCounts,
    total_score: i64,
    clock_ms: Millis,
    last_input_ms: Millis,
    dead_time_threshold_ms: Millis,
    status: SessionStatus,
    summary: Option<SessionSummary>,
}

impl Session {
    pub fn open(
        timeline: Shared<ExpectedTimeline>,
        settings: &EngineSettings,
    ) -> Result<Self, SessionError> {
        if timeline.is_empty() {
            return Err(SessionError::InvalidTimeline(TimelineError::Empty));
        }

        let window = MatchWindow::new(
            timeline.clone(),
            WindowConfig {
                lookahead_ms: settings.lookahead_ms,
                max_window_notes: settings.max_window_notes,
            },
        );
        let aligner = Aligner::new(AlignerConfig {
            perfect_window_ms: settings.perfect_window_ms,
            outer_grace_ms: settings.outer_grace_ms,
        });
        let scorer = Scorer::new(settings.base_scores, settings.combo_table.clone());

        Ok(Self {
            timeline,
            window,
            aligner,
            scorer,
            combo: ComboState::default(),
            attempts: Vec::new(),
            counts: ClassificationCounts::default(),
            total_score: 0,
            clock_ms: 0,
            last_input_ms: 0,
            dead_time_threshold_ms: settings.dead_time_threshold_ms,
            status: SessionStatus::Active,
            summary: None,
        })
    }

    /// Advances session time. Expired notes become Missed attempts; the
    /// session may auto-complete (timeline done) or auto-abandon (input
    /// silence past the dead-time threshold). Returns the Missed attempts.
    pub fn tick(&mut self, new_clock_ms: Millis) -> Result<Vec<NoteAttempt>, SessionError> {
        if self.status != SessionStatus::Active {
            return Err(SessionError::SessionNotActive);
        }
        if new_clock_ms < self.clock_ms {
            return Err(SessionError::ClockRegression {
                current: self.clock_ms,
                requested: new_clock_ms,
            });
        }

        self.clock_ms = new_clock_ms;
        let missed: Vec<NoteAttempt> = self
            .window
            .advance(new_clock_ms)
            .into_iter()
            .map(|pos| {
                let index = self.timeline.notes()[pos].index();
                self.record(Some(index), Classification::Missed, 0)
            })
            .collect();

        if self.clock_ms >= self.timeline.total_duration_ms() && self.window.is_exhausted() {
            self.status = SessionStatus::Completed;
        } else if self.clock_ms - self.last_input_ms > self.dead_time_threshold_ms {
            self.status = SessionStatus::Abandoned;
        }

        Ok(missed)
    }

    /// Aligns and scores one played event. Noisy input never fails: events
    /// that match nothing are recorded as Extra.
    pub fn submit(&mut self, event: PlayedNoteEvent) -> Result<NoteAttempt, SessionError> {
        if self.status != SessionStatus::Active {
            return Err(SessionError::SessionNotActive);
        }

        self.last_input_ms = self.last_input_ms.max(self.clock_ms).max(event.onset_ms);
        let alignment = self.aligner.align(&mut self.window, event);
        Ok(self.record(
            alignment.expected_index,
            alignment.classification,
            alignment.timing_offset_ms,
        ))
    }

    /// Explicit stop. Terminal states are unaffected.
    pub fn abandon(&mut self) {
        if self.status == SessionStatus::Active {
            self.status = SessionStatus::Abandoned;
        }
    }

    /// Ends the session and returns its summary. Idempotent: the summary is
    /// built once and repeated calls return the identical value.
    pub fn finish(&mut self) -> SessionSummary {
        if let Some(summary) = &self.summary {
            return summary.clone();
        }

        if self.status == SessionStatus::Active {
            if self.clock_ms >= self.timeline.total_duration_ms() {
                // The piece is over: notes still unresolved can never be
                // matched, so they go into the log as Missed.
                for pos in self.window.drain_remaining() {
                    let index = self.timeline.notes()[pos].index();
                    self.record(Some(index), Classification::Missed, 0);
                }
                self.status = SessionStatus::Completed;
            } else {
                self.status = SessionStatus::Abandoned;
            }
        }

        let hits = self.counts.perfect + self.counts.good;
        let summary = SessionSummary {
            status: self.status,
            total_score: self.total_score,
            best_streak: self.combo.best_streak,
            counts: self.counts,
            accuracy: hits as f32 / self.timeline.len() as f32,
            duration_ms: self.clock_ms,
            attempts: self.attempts.clone(),
        };
        self.summary = Some(summary.clone());
        summary
    }

    /// Drains a pull-based event source, ticking to each event's onset before
    /// submitting it. Stops early if the session leaves the Active state.
    pub fn play_through(
        &mut self,
        source: &mut dyn NoteEventSource,
    ) -> Result<(), SessionError> {
        while let Some(event) = source.next_event() {
            if self.status != SessionStatus::Active {
                break;
            }
            // Jittered arrivals may be older than the clock; never regress.
            if event.onset_ms > self.clock_ms {
                self.tick(event.onset_ms)?;
            }
            if self.status != SessionStatus::Active {
                break;
            }
            self.submit(event)?;
        }
        Ok(())
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn clock_ms(&self) -> Millis {
        self.clock_ms
    }

    pub fn total_score(&self) -> i64 {
        self.total_score
    }

    pub fn combo(&self) -> ComboState {
        self.combo
    }

    pub fn attempts(&self) -> &[NoteAttempt] {
        &self.attempts
    }

    pub fn timeline(&self) -> &ExpectedTimeline {
        &self.timeline
    }

    fn record(
        &mut self,
        expected_index: Option<u32>,
        classification: Classification,
        timing_offset_ms: Millis,
    ) -> NoteAttempt {
        let score_delta = self.scorer.score(classification, &mut self.combo);
        let attempt = NoteAttempt {
            expected_index,
            classification,
            timing_offset_ms,
            score_delta,
        };
        self.total_score += score_delta;
        self.counts.record(classification);
        self.attempts.push(attempt);
        attempt
    }
}
