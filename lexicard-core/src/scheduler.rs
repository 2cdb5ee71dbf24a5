use crate::{CoreError, Difficulty, Progress, Review, Storage, Word, WordId};
use chrono::{DateTime, Days, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_INTERVALS: [u32; 7] = [1, 3, 7, 14, 30, 60, 120];

/// Review gaps in days, indexed by phase. The table length is the
/// graduation phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct IntervalTable(Vec<u32>);

impl IntervalTable {
    pub fn new(days: Vec<u32>) -> Result<Self, CoreError> {
        if days.is_empty() {
            return Err(CoreError::Invalid("interval table is empty"));
        }
        if days.iter().any(|&d| d == 0) {
            return Err(CoreError::Invalid("interval table entries must be positive"));
        }
        Ok(Self(days))
    }

    pub fn len(&self) -> u32 {
        self.0.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn days_for(&self, phase: u32) -> Option<u32> {
        self.0.get(phase as usize).copied()
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self(DEFAULT_INTERVALS.to_vec())
    }
}

impl TryFrom<Vec<u32>> for IntervalTable {
    type Error = CoreError;

    fn try_from(days: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<IntervalTable> for Vec<u32> {
    fn from(t: IntervalTable) -> Self {
        t.0
    }
}

/// Phase transition for one rating: forgot resets, vague steps back one
/// (floored at zero), remembered steps forward one.
pub fn next_phase(current: u32, difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Forgot => 0,
        Difficulty::Vague => current.saturating_sub(1),
        Difficulty::Remembered => current.saturating_add(1),
    }
}

/// A word without progress has never been scheduled and is always due.
pub fn is_due(progress: Option<&Progress>, now: DateTime<Utc>) -> bool {
    match progress {
        None => true,
        Some(p) => !p.completed && p.next_review.map_or(true, |t| t <= now),
    }
}

pub fn select_due_words(
    words: &[Word],
    progress: &HashMap<WordId, Progress>,
    now: DateTime<Utc>,
) -> Vec<Word> {
    words
        .iter()
        .filter(|w| is_due(progress.get(&w.id), now))
        .cloned()
        .collect()
}

fn add_calendar_days(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    // Step on the local calendar so a DST change keeps the wall-clock time.
    now.with_timezone(&Local)
        .checked_add_days(Days::new(days as u64))
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| now + Duration::days(days as i64))
}

#[derive(Clone, Debug)]
pub struct ReviewOutcome {
    pub progress: Progress,
    pub graduated: bool,
}

#[derive(Clone, Debug)]
pub struct Scheduler {
    table: IntervalTable,
    retire_graduated: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(IntervalTable::default())
    }
}

impl Scheduler {
    pub fn new(table: IntervalTable) -> Self {
        Self {
            table,
            retire_graduated: true,
        }
    }

    /// When false, graduated words stay in storage marked completed.
    pub fn with_retire_graduated(mut self, retire: bool) -> Self {
        self.retire_graduated = retire;
        self
    }

    pub fn table(&self) -> &IntervalTable {
        &self.table
    }

    pub fn retires_graduated(&self) -> bool {
        self.retire_graduated
    }

    /// `None` once `phase` runs past the table: the word has graduated.
    pub fn next_review_at(&self, phase: u32, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.table
            .days_for(phase)
            .map(|days| add_calendar_days(now, days))
    }

    /// Applies one rating to a word. All progress mutation goes through here.
    pub fn apply_review(
        &self,
        storage: &dyn Storage,
        word_id: WordId,
        difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome, CoreError> {
        let mut progress = storage
            .get_progress(word_id)?
            .unwrap_or_else(|| Progress::new(now));

        // A stored phase can exceed a table that has since been shortened.
        // Only a remembered rating may carry a word past the last entry.
        let current = if progress.completed {
            progress.phase.min(self.table.len())
        } else {
            progress.phase.min(self.table.len() - 1)
        };
        let phase = next_phase(current, difficulty).min(self.table.len());
        let next_review = self.next_review_at(phase, now);

        progress.phase = phase;
        progress.next_review = next_review;
        progress.completed = next_review.is_none();
        progress.review_count += 1;
        progress.last_reviewed = Some(now);
        progress.difficulty = difficulty;

        storage.set_progress(word_id, &progress)?;
        tracing::debug!(
            %word_id,
            rating = difficulty.as_rating(),
            phase,
            next_review = ?next_review,
            "review applied"
        );

        let graduated = progress.completed;
        if graduated && self.retire_graduated {
            storage.remove_word(word_id)?;
            tracing::info!(%word_id, "word graduated and retired");
        }

        let review = Review::new(
            word_id,
            difficulty,
            now,
            phase,
            self.table.days_for(phase),
        );
        if let Err(e) = storage.insert_review(&review) {
            // Progress is authoritative; the log only feeds statistics.
            tracing::warn!(%word_id, error = %e, "failed to record review log entry");
        }

        Ok(ReviewOutcome {
            progress,
            graduated,
        })
    }
}
