use encore_domain_timeline::ExpectedTimeline;
use encore_ports::types::{Millis, Shared};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug)]
pub struct WindowConfig {
    pub lookahead_ms: Millis,
    pub max_window_notes: usize,
}

/// Bounded sliding view over the expected notes currently eligible for
/// matching: `[clock - tolerance, clock + lookahead]`, capped at
/// `max_window_notes` entries so matching stays O(window), not O(timeline).
pub struct MatchWindow {
    timeline: Shared<ExpectedTimeline>,
    config: WindowConfig,
    clock_ms: Millis,
    /// First timeline position not yet admitted or evicted.
    next_pos: usize,
    /// Admitted, unconsumed positions in timeline order.
    eligible: VecDeque<usize>,
    /// Count of notes consumed or evicted.
    resolved: usize,
}

impl MatchWindow {
    pub fn new(timeline: Shared<ExpectedTimeline>, config: WindowConfig) -> Self {
        let mut window = Self {
            timeline,
            config,
            clock_ms: 0,
            next_pos: 0,
            eligible: VecDeque::new(),
            resolved: 0,
        };
        window.admit();
        window
    }

    /// Moves the window forward and returns the positions of notes whose
    /// tolerance window fully elapsed without a match. The caller reports
    /// each as Missed; this is the only attempt path without a played event.
    pub fn advance(&mut self, new_clock_ms: Millis) -> Vec<usize> {
        self.clock_ms = new_clock_ms;

        let mut missed = Vec::new();

        let mut remaining = VecDeque::with_capacity(self.eligible.len());
        while let Some(pos) = self.eligible.pop_front() {
            if self.deadline(pos) < self.clock_ms {
                missed.push(pos);
                self.resolved += 1;
            } else {
                remaining.push_back(pos);
            }
        }
        self.eligible = remaining;

        // Notes the cap kept out of the window still time out.
        while self.next_pos < self.timeline.len() && self.deadline(self.next_pos) < self.clock_ms {
            missed.push(self.next_pos);
            self.next_pos += 1;
            self.resolved += 1;
        }

        self.admit();
        missed
    }

    /// Ordered positions of still-eligible notes, at most `max_window_notes`.
    pub fn candidates(&self) -> impl Iterator<Item = usize> + '_ {
        self.eligible.iter().copied()
    }

    /// Removes a matched note from eligibility. Returns false if the note
    /// was already consumed or evicted, enforcing at-most-one match.
    pub fn consume(&mut self, pos: usize) -> bool {
        if let Some(slot) = self.eligible.iter().position(|&p| p == pos) {
            self.eligible.remove(slot);
            self.resolved += 1;
            self.admit();
            true
        } else {
            false
        }
    }

    /// Evicts everything still unresolved, admitted or not. Used when a
    /// session ends and pending notes can never be matched anymore.
    pub fn drain_remaining(&mut self) -> Vec<usize> {
        let mut remaining: Vec<usize> = self.eligible.drain(..).collect();
        remaining.extend(self.next_pos..self.timeline.len());
        self.next_pos = self.timeline.len();
        self.resolved += remaining.len();
        remaining
    }

    /// True once every timeline note has been consumed or evicted.
    pub fn is_exhausted(&self) -> bool {
        self.resolved == self.timeline.len()
    }

    pub fn clock_ms(&self) -> Millis {
        self.clock_ms
    }

    pub fn timeline(&self) -> &ExpectedTimeline {
        &self.timeline
    }

    fn deadline(&self, pos: usize) -> Millis {
        let note = &self.timeline.notes()[pos];
        note.onset_ms() + self.timeline.effective_tolerance_ms(note)
    }

    fn admit(&mut self) {
        while self.next_pos < self.timeline.len()
            && self.eligible.len() < self.config.max_window_notes
        {
            let note = &self.timeline.notes()[self.next_pos];
            if note.onset_ms() > self.clock_ms + self.config.lookahead_ms {
                break;
            }
            self.eligible.push_back(self.next_pos);
            self.next_pos += 1;
        }
    }
}
