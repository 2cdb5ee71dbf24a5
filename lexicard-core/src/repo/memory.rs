use crate::repo::{contains_text, validate_entry, Storage};
use crate::{CoreError, Progress, Review, Word, WordId};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryStore {
    words: RwLock<HashMap<WordId, Word>>,
    progress: RwLock<HashMap<WordId, Progress>>,
    reviews: RwLock<Vec<Review>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn get_words(&self) -> Result<Vec<Word>, CoreError> {
        let mut v: Vec<Word> = self.words.read().values().cloned().collect();
        v.sort_by_key(|w| w.created_at);
        Ok(v)
    }

    fn get_progress(&self, id: WordId) -> Result<Option<Progress>, CoreError> {
        Ok(self.progress.read().get(&id).cloned())
    }

    fn set_progress(&self, id: WordId, progress: &Progress) -> Result<(), CoreError> {
        if !self.words.read().contains_key(&id) {
            return Err(CoreError::NotFound("word"));
        }
        self.progress.write().insert(id, progress.clone());
        Ok(())
    }

    fn remove_word(&self, id: WordId) -> Result<(), CoreError> {
        self.words
            .write()
            .remove(&id)
            .ok_or(CoreError::NotFound("word"))?;
        self.progress.write().remove(&id);
        Ok(())
    }

    fn add_word(&self, word: &str, definition: &str, example: &str) -> Result<Word, CoreError> {
        let (w, d, e) = validate_entry(word, definition, example)?;
        let mut m = self.words.write();
        if contains_text(m.values(), w) {
            return Err(CoreError::Conflict("word already exists"));
        }
        let entry = Word::new(w, d, e);
        m.insert(entry.id, entry.clone());
        self.progress
            .write()
            .insert(entry.id, Progress::new(entry.created_at));
        Ok(entry)
    }

    fn insert_word(&self, word: &Word, progress: Option<&Progress>) -> Result<(), CoreError> {
        let mut m = self.words.write();
        if m.contains_key(&word.id) {
            return Err(CoreError::Conflict("word id already exists"));
        }
        m.insert(word.id, word.clone());
        let p = progress
            .cloned()
            .unwrap_or_else(|| Progress::new(Utc::now()));
        self.progress.write().insert(word.id, p);
        Ok(())
    }

    fn get_word(&self, id: WordId) -> Result<Word, CoreError> {
        self.words
            .read()
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound("word"))
    }

    fn update_word(&self, word: &Word) -> Result<Word, CoreError> {
        let mut m = self.words.write();
        if !m.contains_key(&word.id) {
            return Err(CoreError::NotFound("word"));
        }
        if contains_text(m.values().filter(|w| w.id != word.id), &word.word) {
            return Err(CoreError::Conflict("word already exists"));
        }
        m.insert(word.id, word.clone());
        Ok(word.clone())
    }

    fn list_progress(&self) -> Result<HashMap<WordId, Progress>, CoreError> {
        Ok(self.progress.read().clone())
    }

    fn reset_progress(&self, now: DateTime<Utc>) -> Result<(), CoreError> {
        let ids: Vec<WordId> = self.words.read().keys().copied().collect();
        let mut p = self.progress.write();
        p.clear();
        for id in ids {
            p.insert(id, Progress::new(now));
        }
        self.reviews.write().clear();
        Ok(())
    }

    fn clear_all(&self) -> Result<(), CoreError> {
        self.words.write().clear();
        self.progress.write().clear();
        self.reviews.write().clear();
        Ok(())
    }

    fn insert_review(&self, review: &Review) -> Result<(), CoreError> {
        self.reviews.write().push(review.clone());
        Ok(())
    }

    fn list_reviews(&self) -> Result<Vec<Review>, CoreError> {
        Ok(self.reviews.read().clone())
    }
}
