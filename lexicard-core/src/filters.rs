use crate::{Progress, Word, WordId};
use std::collections::HashMap;

pub fn filter_by_text(words: &[Word], query: &str) -> Vec<Word> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return words.to_vec();
    }
    words
        .iter()
        .filter(|w| {
            w.word.to_lowercase().contains(&q)
                || w.definition.to_lowercase().contains(&q)
                || w.example.to_lowercase().contains(&q)
        })
        .cloned()
        .collect()
}

/// Lowest phase first; words without progress count as phase 0.
pub fn sort_by_phase(words: &mut [Word], progress: &HashMap<WordId, Progress>) {
    words.sort_by(|a, b| {
        let pa = progress.get(&a.id).map(|p| p.phase).unwrap_or(0);
        let pb = progress.get(&b.id).map(|p| p.phase).unwrap_or(0);
        pa.cmp(&pb)
            .then_with(|| a.word.to_lowercase().cmp(&b.word.to_lowercase()))
    });
}

pub fn sort_recent(words: &mut [Word]) {
    words.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
