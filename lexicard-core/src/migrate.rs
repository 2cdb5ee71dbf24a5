//! Versioned, one-way upgrade of stored documents to the current schema.
//!
//! Three legacy shapes are recognised:
//!
//! - **V1**: a bare array of words (or `{ "words": [...] }`) carrying
//!   `reviewCount` and a `mastered` flag directly on each word.
//! - **V2**: `{ "vocabulary": [...], "progress": { "wordProgress": { <id>: {...} } } }`,
//!   progress kept in a separate map keyed by the legacy id.
//! - **V3**: `{ "vocabulary": [...] }` with `phase`, `reviewCount` and
//!   `completed` flattened into every word.
//!
//! V1 and V2 only tracked a review count; it is used as the phase. Legacy ids
//! were numbers or free-form strings, so anything that is not a UUID, or that
//! collides with an id already handed out, gets a fresh UUID.

use crate::scheduler::IntervalTable;
use crate::{CoreError, Difficulty, Progress, Review, Word, WordId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use uuid::Uuid;

pub const CURRENT_VERSION: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaVersion {
    V1,
    V2,
    V3,
    V4,
}

impl SchemaVersion {
    pub fn is_current(&self) -> bool {
        *self == SchemaVersion::V4
    }
}

/// The current on-disk and export document.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub version: u32,
    #[serde(default = "Utc::now")]
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub progress: BTreeMap<WordId, Progress>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Snapshot {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            version: CURRENT_VERSION,
            exported_at: now,
            words: Vec::new(),
            progress: BTreeMap::new(),
            reviews: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Upgraded {
    pub snapshot: Snapshot,
    pub from: SchemaVersion,
    pub remapped: usize,
    pub skipped: usize,
}

pub fn detect_version(doc: &Value) -> Result<SchemaVersion, CoreError> {
    match doc {
        Value::Array(_) => Ok(SchemaVersion::V1),
        Value::Object(map) => {
            if let Some(v) = map.get("version").and_then(Value::as_u64) {
                return if v == CURRENT_VERSION as u64 {
                    Ok(SchemaVersion::V4)
                } else {
                    Err(CoreError::Migration(format!("unsupported schema version {v}")))
                };
            }
            if map.get("vocabulary").is_some_and(Value::is_array) {
                let has_progress_map = map
                    .get("progress")
                    .and_then(|p| p.get("wordProgress"))
                    .is_some_and(Value::is_object);
                return Ok(if has_progress_map {
                    SchemaVersion::V2
                } else {
                    SchemaVersion::V3
                });
            }
            if map.get("words").is_some_and(Value::is_array) {
                return Ok(SchemaVersion::V1);
            }
            Err(CoreError::Migration("unrecognised document shape".into()))
        }
        _ => Err(CoreError::Migration("document is not an object or array".into())),
    }
}

pub fn upgrade(doc: Value, table: &IntervalTable, now: DateTime<Utc>) -> Result<Upgraded, CoreError> {
    let from = detect_version(&doc)?;
    let upgraded = match from {
        SchemaVersion::V4 => {
            let mut snapshot: Snapshot =
                serde_json::from_value(doc).map_err(|e| CoreError::Migration(e.to_string()))?;
            let mut repaired = 0;
            for (id, p) in snapshot.progress.iter_mut() {
                if normalize_progress(p, table, now) {
                    tracing::warn!(word_id = %id, phase = p.phase, "progress record out of range, repaired");
                    repaired += 1;
                }
            }
            if repaired > 0 {
                tracing::info!(repaired, "normalised progress against the interval table");
            }
            Upgraded {
                snapshot,
                from,
                remapped: 0,
                skipped: 0,
            }
        }
        SchemaVersion::V1 => {
            let words = match doc {
                Value::Array(items) => items,
                Value::Object(mut map) => match map.remove("words") {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            };
            convert(from, parse_words(words)?, &HashMap::new(), PhaseSource::ReviewCount, table, now)?
        }
        SchemaVersion::V2 => {
            let LegacyV2 {
                vocabulary,
                progress,
            } = serde_json::from_value(doc).map_err(|e| CoreError::Migration(e.to_string()))?;
            convert(
                from,
                parse_words(vocabulary)?,
                &progress.word_progress,
                PhaseSource::ReviewCount,
                table,
                now,
            )?
        }
        SchemaVersion::V3 => {
            let LegacyV3 { vocabulary } =
                serde_json::from_value(doc).map_err(|e| CoreError::Migration(e.to_string()))?;
            convert(from, parse_words(vocabulary)?, &HashMap::new(), PhaseSource::Phase, table, now)?
        }
    };

    if !from.is_current() {
        tracing::info!(
            from = ?from,
            words = upgraded.snapshot.words.len(),
            remapped = upgraded.remapped,
            skipped = upgraded.skipped,
            "upgraded legacy document"
        );
    }
    Ok(upgraded)
}

#[derive(Deserialize)]
struct LegacyV2 {
    vocabulary: Vec<Value>,
    progress: LegacyProgressMap,
}

#[derive(Deserialize)]
struct LegacyProgressMap {
    #[serde(rename = "wordProgress", default)]
    word_progress: HashMap<String, LegacyFields>,
}

#[derive(Deserialize)]
struct LegacyV3 {
    vocabulary: Vec<Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyFields {
    #[serde(default)]
    phase: Option<u32>,
    #[serde(default)]
    review_count: Option<u32>,
    #[serde(default)]
    last_reviewed: Option<DateTime<Utc>>,
    #[serde(default)]
    next_review: Option<DateTime<Utc>>,
    #[serde(default)]
    difficulty: Option<i64>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    mastered: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyWord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    definition: Option<String>,
    #[serde(default, alias = "example")]
    examples: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    fields: LegacyFields,
}

#[derive(Clone, Copy)]
enum PhaseSource {
    Phase,
    ReviewCount,
}

fn parse_words(items: Vec<Value>) -> Result<Vec<LegacyWord>, CoreError> {
    items
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(|e| CoreError::Migration(e.to_string())))
        .collect()
}

fn legacy_key(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn assign_id(raw: Option<&Value>, taken: &mut HashSet<WordId>) -> (WordId, bool) {
    let parsed = raw
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .filter(|id| !taken.contains(id));
    let (id, remapped) = match parsed {
        Some(id) => (id, false),
        None => (Uuid::new_v4(), true),
    };
    taken.insert(id);
    (id, remapped)
}

fn convert(
    from: SchemaVersion,
    words: Vec<LegacyWord>,
    separate: &HashMap<String, LegacyFields>,
    source: PhaseSource,
    table: &IntervalTable,
    now: DateTime<Utc>,
) -> Result<Upgraded, CoreError> {
    let mut snapshot = Snapshot::empty(now);
    let mut taken = HashSet::new();
    let mut remapped = 0;
    let mut skipped = 0;

    for lw in words {
        let text = lw.word.as_deref().unwrap_or("").trim().to_string();
        if text.is_empty() {
            tracing::warn!(id = ?lw.id, "skipping legacy entry without a word");
            skipped += 1;
            continue;
        }

        let fields = lw
            .id
            .as_ref()
            .and_then(legacy_key)
            .and_then(|k| separate.get(&k))
            .unwrap_or(&lw.fields);
        let progress = legacy_progress(fields, source, table, now)?;

        let (id, was_remapped) = assign_id(lw.id.as_ref(), &mut taken);
        if was_remapped {
            remapped += 1;
        }

        snapshot.words.push(Word {
            id,
            word: text,
            definition: lw.definition.unwrap_or_default().trim().to_string(),
            example: lw.examples.unwrap_or_default().trim().to_string(),
            created_at: lw.created_at.unwrap_or(now),
        });
        snapshot.progress.insert(id, progress);
    }

    Ok(Upgraded {
        snapshot,
        from,
        remapped,
        skipped,
    })
}

fn legacy_progress(
    f: &LegacyFields,
    source: PhaseSource,
    table: &IntervalTable,
    now: DateTime<Utc>,
) -> Result<Progress, CoreError> {
    let difficulty = match f.difficulty {
        Some(r) => Difficulty::try_from(r)?,
        None => Difficulty::Vague,
    };
    let review_count = f.review_count.unwrap_or(0);
    let completed = f.completed.or(f.mastered).unwrap_or(false);

    let phase = match source {
        PhaseSource::Phase => f.phase.unwrap_or(0),
        PhaseSource::ReviewCount => review_count,
    };

    let mut progress = Progress {
        phase,
        review_count,
        last_reviewed: f.last_reviewed,
        next_review: f.next_review,
        difficulty,
        completed,
    };
    normalize_progress(&mut progress, table, now);
    Ok(progress)
}

/// Brings a record in line with `table`: a completed word sits at
/// `table.len()` with no next review, an unfinished one stays inside the
/// table with a next review set. Returns whether anything changed.
pub fn normalize_progress(p: &mut Progress, table: &IntervalTable, now: DateTime<Utc>) -> bool {
    let before = p.clone();
    let max = table.len();
    if p.completed {
        p.phase = max;
        p.next_review = None;
    } else {
        p.phase = p.phase.min(max - 1);
        p.next_review = Some(p.next_review.unwrap_or(now));
    }
    *p != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detects_each_shape() {
        assert_eq!(detect_version(&json!([])).unwrap(), SchemaVersion::V1);
        assert_eq!(
            detect_version(&json!({"words": [], "version": "1.0"})).unwrap(),
            SchemaVersion::V1
        );
        assert_eq!(
            detect_version(&json!({"vocabulary": [], "progress": {"wordProgress": {}}})).unwrap(),
            SchemaVersion::V2
        );
        assert_eq!(
            detect_version(&json!({"vocabulary": [], "globalSettings": {}})).unwrap(),
            SchemaVersion::V3
        );
        assert_eq!(
            detect_version(&json!({"version": 4, "words": []})).unwrap(),
            SchemaVersion::V4
        );
        assert!(detect_version(&json!({"version": 9})).is_err());
        assert!(detect_version(&json!("nope")).is_err());
    }

    #[test]
    fn numeric_legacy_ids_are_remapped() {
        let mut taken = HashSet::new();
        let (_, remapped) = assign_id(Some(&json!(1700000000000.25)), &mut taken);
        assert!(remapped);
        let keep = Uuid::new_v4();
        let (id, remapped) = assign_id(Some(&json!(keep.to_string())), &mut taken);
        assert_eq!(id, keep);
        assert!(!remapped);
        let (again, remapped) = assign_id(Some(&json!(keep.to_string())), &mut taken);
        assert_ne!(again, keep);
        assert!(remapped);
    }
}
