//! Persistence port for the learned-answer cache.
//!
//! The cache writes its whole mapping through a `CachePersistence` after
//! every mutation. `JsonFilePersistence` is the durable backend;
//! `MemoryPersistence` keeps a snapshot in process for tests and for
//! sessions that must not touch disk.
//!
//! The JSON file is shared by every session and process with no locking.
//! Concurrent writers race and the last write wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::errors::CacheError;

use super::record::LearnedRecord;

/// Normalized question → learned record.
pub type LearnedMap = BTreeMap<String, LearnedRecord>;

/// Durable storage for the learned-answer mapping.
pub trait CachePersistence: Send + Sync + std::fmt::Debug {
    /// Load the full mapping. A missing store is an empty mapping.
    fn load(&self) -> Result<LearnedMap, CacheError>;

    /// Replace the stored mapping with `records`.
    fn persist(&self, records: &LearnedMap) -> Result<(), CacheError>;
}

/// Pretty-printed JSON object on disk, keyed by normalized question.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CachePersistence for JsonFilePersistence {
    fn load(&self) -> Result<LearnedMap, CacheError> {
        if !self.path.exists() {
            return Ok(LearnedMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(LearnedMap::new());
        }
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(&content)?;
        Ok(records_from_values(raw))
    }

    fn persist(&self, records: &LearnedMap) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, content)?;
        log::debug!(
            "JsonFilePersistence::persist: {} records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Convert raw entries one by one, skipping any that do not form a record.
///
/// A record without a question takes its key as the question.
fn records_from_values(raw: BTreeMap<String, serde_json::Value>) -> LearnedMap {
    let mut records = LearnedMap::new();
    for (key, value) in raw {
        match serde_json::from_value::<LearnedRecord>(value) {
            Ok(mut record) => {
                if record.question.trim().is_empty() {
                    record.question = key.clone();
                }
                records.insert(key, record);
            }
            Err(e) => log::warn!("Skipping unreadable learned response '{}': {}", key, e),
        }
    }
    records
}

/// In-process backend holding the last persisted snapshot.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    snapshot: Mutex<LearnedMap>,
    writes: AtomicUsize,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `records` already "on disk".
    pub fn with_records(records: LearnedMap) -> Self {
        Self {
            snapshot: Mutex::new(records),
            writes: AtomicUsize::new(0),
        }
    }

    /// Copy of the last persisted mapping.
    pub fn snapshot(&self) -> LearnedMap {
        self.snapshot
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Number of successful `persist` calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl CachePersistence for MemoryPersistence {
    fn load(&self) -> Result<LearnedMap, CacheError> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(guard.clone())
    }

    fn persist(&self, records: &LearnedMap) -> Result<(), CacheError> {
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        *guard = records.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use chrono::NaiveDate;

    fn sample() -> LearnedMap {
        let mut record = LearnedRecord::new_remote(
            "How do I protect my pets in a flood?",
            "Bring pets indoors.",
            Category::Flood,
        );
        record.created_at = NaiveDate::from_ymd_opt(2024, 9, 14)
            .and_then(|d| d.and_hms_micro_opt(8, 30, 5, 250_000))
            .unwrap();

        let mut map = LearnedMap::new();
        map.insert("how do i protect my pets in a flood?".to_string(), record);
        map
    }

    #[test]
    fn test_json_file_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let persistence = JsonFilePersistence::new(dir.path().join("learned.json"));
        assert!(persistence.load().unwrap().is_empty());
    }

    #[test]
    fn test_json_file_persist_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("learned.json");
        let persistence = JsonFilePersistence::new(&path);

        let records = sample();
        persistence.persist(&records).unwrap();
        assert!(path.exists());

        let loaded = persistence.load().unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_json_file_corrupt_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learned.json");
        fs::write(&path, "{ not json").unwrap();
        let persistence = JsonFilePersistence::new(&path);
        assert!(matches!(persistence.load(), Err(CacheError::Json(_))));
    }

    #[test]
    fn test_json_file_skips_unreadable_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learned.json");
        fs::write(
            &path,
            r#"{
                "what about my cat during an earthquake?": {
                    "question": "What about my cat during an earthquake?",
                    "answer": "Keep a carrier by the door.",
                    "disaster_type": "earthquake",
                    "learned_from": "gemini",
                    "timestamp": "2024-10-01T09:15:00.123456",
                    "usage_count": 3
                },
                "can i drive through smoke?": {
                    "answer": "No. Turn around.",
                    "disaster_type": "wildfire",
                    "timestamp": "2024-10-02T10:00:00+00:00",
                    "usage_count": 2
                },
                "broken entry": "not a record",
                "wrong answer type": { "question": "q", "answer": 42 }
            }"#,
        )
        .unwrap();

        let loaded = JsonFilePersistence::new(&path).load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["what about my cat during an earthquake?"].reuse_count, 3);

        let smoke = &loaded["can i drive through smoke?"];
        assert_eq!(smoke.question, "can i drive through smoke?");
        assert_eq!(smoke.category, Category::Wildfire);
        assert_eq!(smoke.reuse_count, 2);
    }

    #[test]
    fn test_memory_persistence_counts_writes() {
        let persistence = MemoryPersistence::new();
        assert_eq!(persistence.writes(), 0);
        let records = sample();
        persistence.persist(&records).unwrap();
        persistence.persist(&records).unwrap();
        assert_eq!(persistence.writes(), 2);
        assert_eq!(persistence.snapshot().len(), 1);
        assert_eq!(persistence.load().unwrap(), records);
    }
}
