//! One bounded review pass over the currently due words.
//!
//! Words rated forgot or vague are moved to the back of the queue and come
//! back later in the same pass; only a remembered rating advances the cursor.
//! `correct` counts words remembered on their first showing.

use crate::scheduler::{select_due_words, Scheduler};
use crate::{CoreError, Difficulty, Storage, Word, WordId};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Empty,
    InProgress,
    Complete,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionTotals {
    pub total: u32,
    pub completed: u32,
    pub correct: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub total: u32,
    pub completed: u32,
    pub correct: u32,
    pub accuracy: u32,
}

pub struct ReviewSession {
    storage: Arc<dyn Storage>,
    scheduler: Scheduler,
    queue: Vec<Word>,
    cursor: usize,
    totals: SessionTotals,
    missed: HashSet<WordId>,
    started: bool,
}

impl ReviewSession {
    pub fn new(storage: Arc<dyn Storage>, scheduler: Scheduler) -> Self {
        Self {
            storage,
            scheduler,
            queue: Vec::new(),
            cursor: 0,
            totals: SessionTotals::default(),
            missed: HashSet::new(),
            started: false,
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<SessionTotals, CoreError> {
        self.start_with_rng(now, &mut rand::rng())
    }

    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<SessionTotals, CoreError> {
        let words = self.storage.get_words()?;
        let mut progress = HashMap::with_capacity(words.len());
        for w in &words {
            if let Some(p) = self.storage.get_progress(w.id)? {
                progress.insert(w.id, p);
            }
        }

        let mut queue = select_due_words(&words, &progress, now);
        queue.shuffle(rng);

        self.totals = SessionTotals {
            total: queue.len() as u32,
            completed: 0,
            correct: 0,
        };
        self.queue = queue;
        self.cursor = 0;
        self.missed.clear();
        self.started = true;

        tracing::debug!(due = self.totals.total, "review session started");
        Ok(self.totals)
    }

    pub fn state(&self) -> SessionState {
        if !self.started {
            SessionState::NotStarted
        } else if self.totals.total == 0 {
            SessionState::Empty
        } else if self.cursor >= self.queue.len() {
            SessionState::Complete
        } else {
            SessionState::InProgress
        }
    }

    pub fn current(&self) -> Option<&Word> {
        self.queue.get(self.cursor)
    }

    /// Rates the current word. Returns `true` once nothing is left to show.
    ///
    /// With no current word this is a no-op returning `true`. If the rating
    /// cannot be persisted the error is returned and the session is left as it
    /// was.
    pub fn submit_answer(
        &mut self,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Result<bool, CoreError> {
        let Some(word_id) = self.current().map(|w| w.id) else {
            return Ok(true);
        };

        self.scheduler
            .apply_review(&*self.storage, word_id, difficulty, now)?;

        match difficulty {
            Difficulty::Remembered => {
                self.totals.completed += 1;
                if !self.missed.contains(&word_id) {
                    self.totals.correct += 1;
                }
                self.cursor += 1;
            }
            Difficulty::Forgot | Difficulty::Vague => {
                self.missed.insert(word_id);
                let word = self.queue.remove(self.cursor);
                self.queue.push(word);
                tracing::debug!(%word_id, "word requeued");
            }
        }

        Ok(self.is_complete())
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.queue.len()
    }

    pub fn totals(&self) -> SessionTotals {
        self.totals
    }

    /// Words still to be shown, counting the current one.
    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.cursor)
    }

    /// 1-based position of the current word among the words of this pass.
    pub fn position(&self) -> usize {
        (self.cursor + 1).min(self.queue.len())
    }

    pub fn summary(&self) -> SessionSummary {
        let t = self.totals;
        let accuracy = if t.total > 0 {
            (100.0 * t.correct as f64 / t.total as f64).round() as u32
        } else {
            0
        };
        SessionSummary {
            total: t.total,
            completed: t.completed,
            correct: t.correct,
            accuracy,
        }
    }
}
