//! Owned learned-answer store with write-through persistence.

use std::sync::Arc;

use crate::category::Category;

use super::persistence::{CachePersistence, LearnedMap, MemoryPersistence};
use super::record::{normalize_question, LearnedRecord};

/// In-memory learned-answer mapping, persisted after every mutation.
///
/// The in-memory mapping is authoritative for the life of the process. A
/// failed persist is logged and otherwise ignored. If the stored mapping
/// could not be loaded at all, the cache starts empty and never writes, so
/// the unreadable store is left as it was.
#[derive(Debug, Clone)]
pub struct LearnedCache {
    records: LearnedMap,
    persistence: Arc<dyn CachePersistence>,
    writable: bool,
}

impl LearnedCache {
    /// Load the mapping from `persistence`. Load failures start empty and read-only.
    pub fn load(persistence: Arc<dyn CachePersistence>) -> Self {
        let (records, writable) = match persistence.load() {
            Ok(records) => (records, true),
            Err(e) => {
                log::warn!(
                    "Could not load learned responses ({}); new answers will not be saved",
                    e
                );
                (LearnedMap::new(), false)
            }
        };
        log::info!(
            "Loaded {} learned responses from previous conversations",
            records.len()
        );
        Self {
            records,
            persistence,
            writable,
        }
    }

    /// An empty cache that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            records: LearnedMap::new(),
            persistence: Arc::new(MemoryPersistence::new()),
            writable: true,
        }
    }

    /// False when the stored mapping was unreadable at load time.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn records(&self) -> &LearnedMap {
        &self.records
    }

    pub fn get(&self, key: &str) -> Option<&LearnedRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Create or replace the record for `question`, then persist.
    ///
    /// Returns the normalized key.
    pub fn upsert(&mut self, question: &str, answer: &str, category: Category) -> String {
        let key = normalize_question(question);
        self.records.insert(
            key.clone(),
            LearnedRecord::new_remote(question, answer, category),
        );
        log::info!(
            "Learned new response: '{}'",
            question.chars().take(50).collect::<String>()
        );
        self.persist();
        key
    }

    /// Bump the reuse count for `key`, then persist.
    ///
    /// Returns the new count, or `None` if the key is unknown.
    pub fn increment_usage(&mut self, key: &str) -> Option<u32> {
        let record = self.records.get_mut(key)?;
        record.reuse_count = record.reuse_count.saturating_add(1);
        let count = record.reuse_count;
        self.persist();
        Some(count)
    }

    /// Remove one record, persisting if it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.records.remove(key).is_some();
        if removed {
            self.persist();
        }
        removed
    }

    /// Remove every record and persist the empty mapping.
    pub fn clear(&mut self) {
        self.records.clear();
        self.persist();
    }

    /// Write the full mapping. Returns `false` on failure, never errors.
    pub fn persist(&self) -> bool {
        if !self.writable {
            log::debug!("Learned store unreadable at load, skipping write");
            return false;
        }
        match self.persistence.persist(&self.records) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error saving learned responses: {}", e);
                false
            }
        }
    }
}

impl Default for LearnedCache {
    fn default() -> Self {
        Self::in_memory()
    }
}
