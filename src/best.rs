//! Best-score persistence.
//!
//! One record per difficulty, overwritten only by a strictly greater
//! score. The storage boundary is a key-value interface holding a single
//! non-negative integer string per difficulty key, so hosts can back it
//! with whatever durable store they have (browser localStorage, a config
//! file, a test map).
//!
//! Storage failures are not session errors: a read that fails degrades to
//! "no previous best" and a failed write is logged and skipped.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::levels::Difficulty;

/// Durable key-value backend for best scores.
///
/// Values are decimal integer strings; the engine never stores anything
/// else through this interface.
pub trait ScoreStorage {
    /// Read the raw value for `key`, if present.
    fn read(&self, key: &str) -> Option<String>;

    /// Write the raw value for `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str);
}

/// In-memory backend. Nothing survives the process; used in tests and by
/// hosts that persist elsewhere.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// File-backed backend: a flat JSON object of key-value strings.
///
/// The file is read once at construction and rewritten on every store;
/// a missing or unreadable file simply starts empty.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: FxHashMap<String, String>,
}

impl JsonFileStorage {
    /// Open (or lazily create) the store at `path`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::load_entries(&path);
        Self { path, entries }
    }

    fn load_entries(path: &Path) -> FxHashMap<String, String> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return FxHashMap::default();
            }
            Err(err) => {
                log::warn!("failed to read score file {}: {}", path.display(), err);
                return FxHashMap::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("malformed score file {}: {}", path.display(), err);
                FxHashMap::default()
            }
        }
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                log::warn!("failed to create {}: {}", parent.display(), err);
                return;
            }
        }

        match serde_json::to_string_pretty(&self.entries) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&self.path, json) {
                    log::warn!(
                        "failed to write score file {}: {}",
                        self.path.display(),
                        err
                    );
                }
            }
            Err(err) => log::warn!("failed to encode score file: {}", err),
        }
    }
}

impl ScoreStorage for JsonFileStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist();
    }
}

/// Result of a save attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Did the stored record change?
    pub updated: bool,

    /// The record before this save, if any existed.
    pub previous: Option<u32>,
}

/// Best-score records over a storage backend.
#[derive(Clone, Debug, Default)]
pub struct BestScores<S> {
    storage: S,
}

impl<S: ScoreStorage> BestScores<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    fn key(difficulty: Difficulty) -> String {
        format!("best_score_{}", difficulty.key())
    }

    /// Load the stored best for a difficulty.
    ///
    /// An unparseable record is treated as absent.
    #[must_use]
    pub fn load(&self, difficulty: Difficulty) -> Option<u32> {
        let raw = self.storage.read(&Self::key(difficulty))?;
        match raw.parse() {
            Ok(score) => Some(score),
            Err(_) => {
                log::warn!("discarding malformed best score {:?} for {}", raw, difficulty);
                None
            }
        }
    }

    /// Store `score` if it strictly exceeds the current record.
    pub fn save(&mut self, difficulty: Difficulty, score: u32) -> SaveOutcome {
        let previous = self.load(difficulty);
        let updated = previous.map_or(true, |prev| score > prev);

        if updated {
            self.storage.write(&Self::key(difficulty), &score.to_string());
            log::info!("new best score for {}: {}", difficulty, score);
        }

        SaveOutcome { updated, previous }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_absent() {
        let best = BestScores::new(MemoryStorage::new());
        assert_eq!(best.load(Difficulty::Easy), None);
    }

    #[test]
    fn test_first_save_updates() {
        let mut best = BestScores::new(MemoryStorage::new());

        let outcome = best.save(Difficulty::Easy, 500);
        assert_eq!(
            outcome,
            SaveOutcome {
                updated: true,
                previous: None
            }
        );
        assert_eq!(best.load(Difficulty::Easy), Some(500));
    }

    #[test]
    fn test_strictly_greater_semantics() {
        let mut best = BestScores::new(MemoryStorage::new());
        best.save(Difficulty::Easy, 500);

        // Equal never updates
        let outcome = best.save(Difficulty::Easy, 500);
        assert!(!outcome.updated);
        assert_eq!(outcome.previous, Some(500));

        // Lower never updates
        assert!(!best.save(Difficulty::Easy, 499).updated);
        assert_eq!(best.load(Difficulty::Easy), Some(500));

        // Strictly greater does
        assert!(best.save(Difficulty::Easy, 501).updated);
        assert_eq!(best.load(Difficulty::Easy), Some(501));
    }

    #[test]
    fn test_records_per_difficulty_independent() {
        let mut best = BestScores::new(MemoryStorage::new());
        best.save(Difficulty::Easy, 800);
        best.save(Difficulty::Hard, 300);

        assert_eq!(best.load(Difficulty::Easy), Some(800));
        assert_eq!(best.load(Difficulty::Medium), None);
        assert_eq!(best.load(Difficulty::Hard), Some(300));
    }

    #[test]
    fn test_malformed_record_is_absent() {
        let mut storage = MemoryStorage::new();
        storage.write("best_score_easy", "not-a-number");

        let best = BestScores::new(storage);
        assert_eq!(best.load(Difficulty::Easy), None);
    }

    #[test]
    fn test_storage_format_is_integer_string() {
        let mut best = BestScores::new(MemoryStorage::new());
        best.save(Difficulty::Medium, 742);

        assert_eq!(
            best.storage.read("best_score_medium").as_deref(),
            Some("742")
        );
    }
}
