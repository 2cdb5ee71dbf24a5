use crate::migrate::{Snapshot, CURRENT_VERSION};
use crate::repo::contains_text;
use crate::{CoreError, Storage};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub added: usize,
    pub skipped: usize,
    pub remapped: usize,
}

pub fn export(storage: &dyn Storage, now: DateTime<Utc>) -> Result<Snapshot, CoreError> {
    let mut words = storage.get_words()?;
    words.sort_by_key(|w| w.created_at);
    let progress = storage.list_progress()?.into_iter().collect();
    let mut reviews = storage.list_reviews()?;
    reviews.sort_by_key(|r| r.reviewed_at);
    Ok(Snapshot {
        version: CURRENT_VERSION,
        exported_at: now,
        words,
        progress,
        reviews,
    })
}

/// Merges a snapshot into `storage`.
///
/// Entries whose headword already exists are skipped. An entry whose id is
/// already used by a different word is inserted under a fresh id. The review
/// log of the snapshot is carried over for the words that were added.
pub fn import(storage: &dyn Storage, snapshot: Snapshot) -> Result<ImportReport, CoreError> {
    let mut existing = storage.get_words()?;
    let mut ids: HashSet<Uuid> = existing.iter().map(|w| w.id).collect();
    let mut report = ImportReport::default();
    let mut added_ids: HashMap<Uuid, Uuid> = HashMap::new();

    for word in snapshot.words {
        if contains_text(existing.iter(), &word.word) {
            tracing::warn!(word = %word.word, "skipping import of duplicate word");
            report.skipped += 1;
            continue;
        }

        let progress = snapshot.progress.get(&word.id);
        let original_id = word.id;
        let mut entry = word;
        if ids.contains(&entry.id) {
            entry.id = Uuid::new_v4();
            report.remapped += 1;
        }

        storage.insert_word(&entry, progress)?;
        ids.insert(entry.id);
        added_ids.insert(original_id, entry.id);
        existing.push(entry);
        report.added += 1;
    }

    for review in snapshot.reviews {
        if let Some(new_id) = added_ids.get(&review.word_id) {
            let mut r = review;
            r.word_id = *new_id;
            storage.insert_review(&r)?;
        }
    }

    tracing::info!(
        added = report.added,
        skipped = report.skipped,
        remapped = report.remapped,
        "import finished"
    );
    Ok(report)
}
