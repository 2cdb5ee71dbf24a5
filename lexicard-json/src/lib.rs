use chrono::{DateTime, Utc};
use lexicard_core::migrate::{self, Snapshot};
use lexicard_core::repo::{contains_text, validate_entry, Storage};
use lexicard_core::{CoreError, IntervalTable, Progress, Review, Word, WordId};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub mod paths;

#[derive(Clone, Serialize, Deserialize)]
struct FileImage {
    created_at: DateTime<Utc>,
    #[serde(flatten)]
    snapshot: Snapshot,
}

#[derive(Clone)]
struct State {
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    words: HashMap<WordId, Word>,
    progress: HashMap<WordId, Progress>,
    reviews: Vec<Review>,
}

impl State {
    fn new_empty() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            words: HashMap::new(),
            progress: HashMap::new(),
            reviews: Vec::new(),
        }
    }

    fn to_image(&self) -> FileImage {
        let mut words: Vec<Word> = self.words.values().cloned().collect();
        words.sort_by_key(|w| w.created_at);
        let mut snapshot = Snapshot::empty(self.updated_at);
        snapshot.words = words;
        snapshot.progress = self
            .progress
            .iter()
            .map(|(id, p)| (*id, p.clone()))
            .collect();
        snapshot.reviews = self.reviews.clone();
        FileImage {
            created_at: self.created_at,
            snapshot,
        }
    }

    fn from_snapshot(created_at: DateTime<Utc>, snapshot: Snapshot) -> Self {
        let mut words = HashMap::new();
        for w in snapshot.words {
            words.insert(w.id, w);
        }
        // Progress for words that no longer exist is dropped.
        let progress = snapshot
            .progress
            .into_iter()
            .filter(|(id, _)| words.contains_key(id))
            .collect();
        Self {
            created_at,
            updated_at: snapshot.exported_at,
            words,
            progress,
            reviews: snapshot.reviews,
        }
    }
}

pub struct JsonStore {
    path: PathBuf,
    backups_dir: PathBuf,
    max_backups: usize,
    state: RwLock<State>,
}

impl JsonStore {
    pub fn open_default(table: &IntervalTable) -> Result<Self, CoreError> {
        let (file, backups) = paths::default_store_file();
        Self::open_with(file, backups, 10, table)
    }

    /// Opens or creates the store file. Older document shapes are upgraded
    /// and written back in the current format straight away.
    pub fn open_with(
        path: PathBuf,
        backups_dir: PathBuf,
        max_backups: usize,
        table: &IntervalTable,
    ) -> Result<Self, CoreError> {
        ensure_parent_dirs(&path)?;
        ensure_dir(&backups_dir)?;
        let max_backups = max_backups.max(1);
        let (state, needs_rewrite) = load_or_init(&path, table)?;
        let store = Self {
            path,
            backups_dir,
            max_backups,
            state: RwLock::new(state),
        };
        if needs_rewrite {
            let img = store.state.read().to_image();
            write_with_backup(&store.path, &store.backups_dir, store.max_backups, &img)
                .map_err(io_err)?;
        }
        tracing::info!(
            path = %store.path.display(),
            words = store.state.read().words.len(),
            "opened json store"
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `f` and persists the result. The in-memory state is rolled
    /// back if either step fails.
    fn mutate<T>(&self, f: impl FnOnce(&mut State) -> Result<T, CoreError>) -> Result<T, CoreError> {
        let mut s = self.state.write();
        let before = s.clone();
        let out = match f(&mut s) {
            Ok(out) => out,
            Err(e) => {
                *s = before;
                return Err(e);
            }
        };
        s.updated_at = Utc::now();
        let img = s.to_image();
        if let Err(e) = write_with_backup(&self.path, &self.backups_dir, self.max_backups, &img) {
            tracing::error!(path = %self.path.display(), error = %e, "failed to save store");
            *s = before;
            return Err(io_err(e));
        }
        tracing::debug!(path = %self.path.display(), "store saved");
        Ok(out)
    }
}

fn io_err(e: std::io::Error) -> CoreError {
    CoreError::Storage(e.to_string())
}

fn ensure_parent_dirs(path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    fs::create_dir_all(path).map_err(io_err)
}

fn load_or_init(path: &Path, table: &IntervalTable) -> Result<(State, bool), CoreError> {
    if !path.exists() {
        return Ok((State::new_empty(), true));
    }
    let buf = fs::read_to_string(path).map_err(io_err)?;
    let doc: serde_json::Value =
        serde_json::from_str(&buf).map_err(|e| CoreError::Storage(e.to_string()))?;
    let created_at = doc
        .get("created_at")
        .and_then(|v| serde_json::from_value::<DateTime<Utc>>(v.clone()).ok())
        .unwrap_or_else(Utc::now);
    let upgraded = migrate::upgrade(doc, table, Utc::now())?;
    let legacy = !upgraded.from.is_current();
    if legacy {
        tracing::info!(path = %path.display(), from = ?upgraded.from, "store file upgraded");
    }
    Ok((State::from_snapshot(created_at, upgraded.snapshot), legacy))
}

fn write_with_backup(
    path: &Path,
    backups_dir: &Path,
    max_backups: usize,
    img: &FileImage,
) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::create_dir_all(backups_dir)?;

    let json = serde_json::to_vec_pretty(img)?;
    let mut tmp = NamedTempFile::new_in(path.parent().unwrap_or_else(|| Path::new(".")))?;
    tmp.write_all(&json)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    // One backup per second: the storage calls behind a single rating land
    // in the same slot instead of pushing older history out of rotation.
    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let backup_path = backups_dir.join(format!("lexicard-{ts}.json"));
    let mut btmp = NamedTempFile::new_in(backups_dir)?;
    btmp.write_all(&json)?;
    btmp.flush()?;
    btmp.persist(&backup_path).map_err(|e| e.error)?;

    rotate_backups(backups_dir, max_backups)?;

    Ok(())
}

fn rotate_backups(dir: &Path, keep: usize) -> Result<(), std::io::Error> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    entries.sort_by_key(|e| e.file_name());
    if entries.len() > keep {
        for e in &entries[0..entries.len() - keep] {
            let _ = fs::remove_file(e.path());
        }
    }
    Ok(())
}

impl Storage for JsonStore {
    fn get_words(&self) -> Result<Vec<Word>, CoreError> {
        let s = self.state.read();
        let mut v: Vec<Word> = s.words.values().cloned().collect();
        v.sort_by_key(|w| w.created_at);
        Ok(v)
    }

    fn get_progress(&self, id: WordId) -> Result<Option<Progress>, CoreError> {
        Ok(self.state.read().progress.get(&id).cloned())
    }

    fn set_progress(&self, id: WordId, progress: &Progress) -> Result<(), CoreError> {
        self.mutate(|s| {
            if !s.words.contains_key(&id) {
                return Err(CoreError::NotFound("word"));
            }
            s.progress.insert(id, progress.clone());
            Ok(())
        })
    }

    fn remove_word(&self, id: WordId) -> Result<(), CoreError> {
        self.mutate(|s| {
            if s.words.remove(&id).is_none() {
                return Err(CoreError::NotFound("word"));
            }
            s.progress.remove(&id);
            Ok(())
        })
    }

    fn add_word(&self, word: &str, definition: &str, example: &str) -> Result<Word, CoreError> {
        let (w, d, e) = validate_entry(word, definition, example)?;
        self.mutate(|s| {
            if contains_text(s.words.values(), w) {
                return Err(CoreError::Conflict("word already exists"));
            }
            let entry = Word::new(w, d, e);
            s.progress.insert(entry.id, Progress::new(entry.created_at));
            s.words.insert(entry.id, entry.clone());
            Ok(entry)
        })
    }

    fn insert_word(&self, word: &Word, progress: Option<&Progress>) -> Result<(), CoreError> {
        self.mutate(|s| {
            if s.words.contains_key(&word.id) {
                return Err(CoreError::Conflict("word id already exists"));
            }
            s.words.insert(word.id, word.clone());
            let p = progress
                .cloned()
                .unwrap_or_else(|| Progress::new(Utc::now()));
            s.progress.insert(word.id, p);
            Ok(())
        })
    }

    fn get_word(&self, id: WordId) -> Result<Word, CoreError> {
        let s = self.state.read();
        s.words.get(&id).cloned().ok_or(CoreError::NotFound("word"))
    }

    fn update_word(&self, word: &Word) -> Result<Word, CoreError> {
        self.mutate(|s| {
            if !s.words.contains_key(&word.id) {
                return Err(CoreError::NotFound("word"));
            }
            if contains_text(s.words.values().filter(|w| w.id != word.id), &word.word) {
                return Err(CoreError::Conflict("word already exists"));
            }
            s.words.insert(word.id, word.clone());
            Ok(word.clone())
        })
    }

    fn list_progress(&self) -> Result<HashMap<WordId, Progress>, CoreError> {
        Ok(self.state.read().progress.clone())
    }

    fn reset_progress(&self, now: DateTime<Utc>) -> Result<(), CoreError> {
        self.mutate(|s| {
            let ids: Vec<WordId> = s.words.keys().copied().collect();
            s.progress = ids.into_iter().map(|id| (id, Progress::new(now))).collect();
            s.reviews.clear();
            Ok(())
        })
    }

    fn clear_all(&self) -> Result<(), CoreError> {
        self.mutate(|s| {
            s.words.clear();
            s.progress.clear();
            s.reviews.clear();
            Ok(())
        })
    }

    fn insert_review(&self, review: &Review) -> Result<(), CoreError> {
        self.mutate(|s| {
            s.reviews.push(review.clone());
            Ok(())
        })
    }

    fn list_reviews(&self) -> Result<Vec<Review>, CoreError> {
        Ok(self.state.read().reviews.clone())
    }
}
