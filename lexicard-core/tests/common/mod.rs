#![allow(dead_code)]

use chrono::{DateTime, Days, Local, TimeZone, Utc};
use lexicard_core::{CoreError, MemoryStore, Progress, Review, Storage, Word, WordId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn days_later(now: DateTime<Utc>, days: u64) -> DateTime<Utc> {
    now.with_timezone(&Local)
        .checked_add_days(Days::new(days))
        .unwrap()
        .with_timezone(&Utc)
}

/// Memory store whose progress writes can be switched off.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_writes: AtomicBool,
    pub hide_progress: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_hiding(&self, hide: bool) {
        self.hide_progress.store(hide, Ordering::SeqCst);
    }
}

impl Storage for FlakyStore {
    fn get_words(&self) -> Result<Vec<Word>, CoreError> {
        self.inner.get_words()
    }
    fn get_progress(&self, id: WordId) -> Result<Option<Progress>, CoreError> {
        if self.hide_progress.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.get_progress(id)
    }
    fn set_progress(&self, id: WordId, progress: &Progress) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("disk full".into()));
        }
        self.inner.set_progress(id, progress)
    }
    fn remove_word(&self, id: WordId) -> Result<(), CoreError> {
        self.inner.remove_word(id)
    }
    fn add_word(&self, word: &str, definition: &str, example: &str) -> Result<Word, CoreError> {
        self.inner.add_word(word, definition, example)
    }
    fn insert_word(&self, word: &Word, progress: Option<&Progress>) -> Result<(), CoreError> {
        self.inner.insert_word(word, progress)
    }
    fn get_word(&self, id: WordId) -> Result<Word, CoreError> {
        self.inner.get_word(id)
    }
    fn update_word(&self, word: &Word) -> Result<Word, CoreError> {
        self.inner.update_word(word)
    }
    fn list_progress(&self) -> Result<HashMap<WordId, Progress>, CoreError> {
        self.inner.list_progress()
    }
    fn reset_progress(&self, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.inner.reset_progress(now)
    }
    fn clear_all(&self) -> Result<(), CoreError> {
        self.inner.clear_all()
    }
    fn insert_review(&self, review: &Review) -> Result<(), CoreError> {
        self.inner.insert_review(review)
    }
    fn list_reviews(&self) -> Result<Vec<Review>, CoreError> {
        self.inner.list_reviews()
    }
}
