use crate::window::MatchWindow;
use encore_ports::stream::PlayedNoteEvent;
use encore_ports::summary::Classification;
use encore_ports::types::Millis;

#[derive(Clone, Copy, Debug)]
pub struct AlignerConfig {
    pub perfect_window_ms: Millis,
    /// Widest |offset| still accepted for a pitch match (Early/Late tier).
    /// Effective per-note grace is never narrower than the note's tolerance.
    pub outer_grace_ms: Millis,
}

/// Outcome of aligning one played event against the window. Scoring is
/// applied separately; `expected_index` is None only for Extra.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Alignment {
    pub expected_index: Option<u32>,
    pub classification: Classification,
    pub timing_offset_ms: Millis,
}

pub struct Aligner {
    config: AlignerConfig,
}

impl Aligner {
    pub fn new(config: AlignerConfig) -> Self {
        Self { config }
    }

    /// Deterministic matching policy:
    /// 1. prefer pitch-matching candidates, closest onset first, ties to the
    ///    lowest index; the winner must lie within its grace window;
    /// 2. otherwise any candidate within timing tolerance becomes WrongPitch;
    /// 3. otherwise the event is Extra and consumes nothing.
    pub fn align(&self, window: &mut MatchWindow, event: PlayedNoteEvent) -> Alignment {
        let mut pitch_best: Option<Candidate> = None;
        let mut timing_best: Option<Candidate> = None;

        for pos in window.candidates() {
            let timeline = window.timeline();
            let note = &timeline.notes()[pos];
            let offset = event.onset_ms - note.onset_ms();
            let tolerance = timeline.effective_tolerance_ms(note);
            let grace = self.config.outer_grace_ms.max(tolerance);

            let candidate = Candidate {
                pos,
                index: note.index(),
                offset,
                tolerance,
            };

            if note.pitch().distance(event.pitch) <= timeline.default_pitch_tolerance() {
                if offset.abs() <= grace {
                    replace_if_closer(&mut pitch_best, candidate);
                }
            } else if offset.abs() <= tolerance {
                replace_if_closer(&mut timing_best, candidate);
            }
        }

        if let Some(found) = pitch_best {
            window.consume(found.pos);
            return Alignment {
                expected_index: Some(found.index),
                classification: self.timing_tier(found.offset, found.tolerance),
                timing_offset_ms: found.offset,
            };
        }

        if let Some(found) = timing_best {
            window.consume(found.pos);
            return Alignment {
                expected_index: Some(found.index),
                classification: Classification::WrongPitch,
                timing_offset_ms: found.offset,
            };
        }

        Alignment {
            expected_index: None,
            classification: Classification::Extra,
            timing_offset_ms: 0,
        }
    }

    fn timing_tier(&self, offset: Millis, tolerance: Millis) -> Classification {
        if offset.abs() <= self.config.perfect_window_ms {
            Classification::Perfect
        } else if offset.abs() <= tolerance {
            Classification::Good
        } else if offset < 0 {
            Classification::Early
        } else {
            Classification::Late
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    pos: usize,
    index: u32,
    offset: Millis,
    tolerance: Millis,
}

fn replace_if_closer(best: &mut Option<Candidate>, candidate: Candidate) {
    let closer = match best {
        Some(current) => candidate.offset.abs() < current.offset.abs(),
        None => true,
    };
    if closer {
        *best = Some(candidate);
    }
}
