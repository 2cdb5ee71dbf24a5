use crate::{CoreError, Progress, Review, Word, WordId};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub mod memory;
pub use memory::MemoryStore;

/// Owner of the word list and progress map.
///
/// Implementations must make `set_progress` durable before returning `Ok`,
/// and leave their state untouched when they return an error.
pub trait Storage: Send + Sync {
    // Scheduling surface
    fn get_words(&self) -> Result<Vec<Word>, CoreError>;
    fn get_progress(&self, id: WordId) -> Result<Option<Progress>, CoreError>;
    fn set_progress(&self, id: WordId, progress: &Progress) -> Result<(), CoreError>;
    fn remove_word(&self, id: WordId) -> Result<(), CoreError>;

    // Words
    fn add_word(&self, word: &str, definition: &str, example: &str) -> Result<Word, CoreError>;
    fn insert_word(&self, word: &Word, progress: Option<&Progress>) -> Result<(), CoreError>;
    fn get_word(&self, id: WordId) -> Result<Word, CoreError>;
    fn update_word(&self, word: &Word) -> Result<Word, CoreError>;

    // Progress
    fn list_progress(&self) -> Result<HashMap<WordId, Progress>, CoreError>;
    fn reset_progress(&self, now: DateTime<Utc>) -> Result<(), CoreError>;
    /// Drops every word together with its progress and the review log.
    fn clear_all(&self) -> Result<(), CoreError>;

    // Reviews
    fn insert_review(&self, review: &Review) -> Result<(), CoreError>;
    fn list_reviews(&self) -> Result<Vec<Review>, CoreError>;
}

/// Trims and checks the three text fields of a new word.
pub fn validate_entry<'a>(
    word: &'a str,
    definition: &'a str,
    example: &'a str,
) -> Result<(&'a str, &'a str, &'a str), CoreError> {
    let (w, d, e) = (word.trim(), definition.trim(), example.trim());
    if w.is_empty() {
        return Err(CoreError::Invalid("word is empty"));
    }
    if d.is_empty() {
        return Err(CoreError::Invalid("definition is empty"));
    }
    Ok((w, d, e))
}

/// Case-insensitive match on the headword, used to reject duplicates.
pub fn contains_text<'a>(mut words: impl Iterator<Item = &'a Word>, text: &str) -> bool {
    let q = text.trim().to_lowercase();
    words.any(|w| w.word.to_lowercase() == q)
}
