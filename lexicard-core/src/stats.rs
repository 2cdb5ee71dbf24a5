use crate::{Difficulty, Progress, Review, WordId};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub total: u32,
    pub forgot: u32,
    pub vague: u32,
    pub remembered: u32,
}

impl Totals {
    pub fn record(&mut self, d: Difficulty) {
        self.total += 1;
        match d {
            Difficulty::Forgot => self.forgot += 1,
            Difficulty::Vague => self.vague += 1,
            Difficulty::Remembered => self.remembered += 1,
        }
    }
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.remembered as f32 / self.total as f32
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct StatsSummary {
    pub totals: Totals,
    pub per_day: BTreeMap<NaiveDate, Totals>,
}

/// Calendar day of `t` on the local clock, the same calendar the scheduler
/// counts intervals on.
pub fn local_day(t: DateTime<Utc>) -> NaiveDate {
    t.with_timezone(&Local).date_naive()
}

pub fn summarize(reviews: &[Review]) -> StatsSummary {
    let mut summary = StatsSummary::default();
    for r in reviews {
        summary.totals.record(r.difficulty);
        let d = local_day(r.reviewed_at);
        summary.per_day.entry(d).or_default().record(r.difficulty);
    }
    summary
}

pub fn reviewed_on(reviews: &[Review], day: NaiveDate) -> u32 {
    reviews
        .iter()
        .filter(|r| local_day(r.reviewed_at) == day)
        .count() as u32
}

pub fn daily_streak(reviews: &[Review], today: NaiveDate) -> u32 {
    let per_day = summarize(reviews).per_day;
    let mut streak = 0u32;
    let mut day = today;
    while per_day.get(&day).is_some_and(|t| t.total > 0) {
        streak += 1;
        day -= Duration::days(1);
    }
    streak
}

/// Word counts per phase; the last bucket holds graduated words.
pub fn phase_histogram(progress: &HashMap<WordId, Progress>, table_len: u32) -> Vec<u32> {
    let mut buckets = vec![0u32; table_len as usize + 1];
    for p in progress.values() {
        let i = (p.phase.min(table_len)) as usize;
        buckets[i] += 1;
    }
    buckets
}

pub fn mastered_count(progress: &HashMap<WordId, Progress>) -> u32 {
    progress.values().filter(|p| p.completed).count() as u32
}
