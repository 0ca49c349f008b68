//! Knowledge store loading and category resolution.
//!
//! The on-disk format is a JSON object keyed by category key:
//!
//! ```json
//! { "earthquake": { "dos": ["..."], "donts": ["..."] }, "general_disaster": { ... } }
//! ```
//!
//! A `general_disaster` entry with non-empty dos and don'ts is mandatory;
//! every lookup for a category without its own entry resolves to it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::errors::KnowledgeError;

/// Built-in knowledge base shipped with the crate.
const BUILTIN_KNOWLEDGE: &str = include_str!("../../data/disaster_knowledge.json");

/// Prescribed actions for one disaster category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Recommended actions, most important first.
    #[serde(default)]
    pub dos: Vec<String>,
    /// Actions to avoid, most important first.
    #[serde(default)]
    pub donts: Vec<String>,
}

/// Read-only mapping from category to knowledge entry.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    entries: HashMap<Category, KnowledgeEntry>,
}

impl KnowledgeStore {
    /// Build a store from entries, enforcing the generic-entry invariant.
    pub fn new(entries: HashMap<Category, KnowledgeEntry>) -> Result<Self, KnowledgeError> {
        let generic = entries
            .get(&Category::GeneralDisaster)
            .ok_or(KnowledgeError::MissingGeneric)?;
        if generic.dos.is_empty() {
            return Err(KnowledgeError::IncompleteGeneric("no dos".to_string()));
        }
        if generic.donts.is_empty() {
            return Err(KnowledgeError::IncompleteGeneric("no donts".to_string()));
        }
        Ok(Self { entries })
    }

    /// Parse a store from JSON text. Unknown category keys are skipped.
    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeError> {
        let raw: HashMap<String, KnowledgeEntry> = serde_json::from_str(json)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (key, entry) in raw {
            match Category::from_key(&key) {
                Some(category) => {
                    entries.insert(category, entry);
                }
                None => log::debug!("Skipping unknown knowledge category '{}'", key),
            }
        }
        Self::new(entries)
    }

    /// The knowledge base compiled into the crate.
    pub fn builtin() -> Result<Self, KnowledgeError> {
        Self::from_json_str(BUILTIN_KNOWLEDGE)
    }

    /// Load from `path` if given, otherwise (or on failure) use the built-in store.
    ///
    /// Errors only if the built-in store itself is unusable.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, KnowledgeError> {
        let Some(path) = path else {
            return Self::builtin();
        };
        match load_knowledge(path) {
            Ok(store) => {
                log::info!(
                    "Loaded knowledge base with {} disaster types from {}",
                    store.len(),
                    path.display()
                );
                Ok(store)
            }
            Err(e) => {
                log::warn!(
                    "Knowledge base at {} unusable ({}), using built-in",
                    path.display(),
                    e
                );
                Self::builtin()
            }
        }
    }

    /// Resolve a category to its entry, substituting the generic entry when
    /// the category has none. Returns the category actually used.
    pub fn resolve(&self, category: Category) -> (Category, &KnowledgeEntry) {
        match self.entries.get(&category) {
            Some(entry) => (category, entry),
            None => (Category::GeneralDisaster, self.generic()),
        }
    }

    pub fn get(&self, category: Category) -> Option<&KnowledgeEntry> {
        self.entries.get(&category)
    }

    /// The generic entry. Always present.
    pub fn generic(&self) -> &KnowledgeEntry {
        // Guaranteed by `new`.
        &self.entries[&Category::GeneralDisaster]
    }

    /// Categories with an entry, in canonical order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .iter()
            .copied()
            .filter(|c| self.entries.contains_key(c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load a knowledge store from a JSON file.
pub fn load_knowledge(path: &Path) -> Result<KnowledgeStore, KnowledgeError> {
    let content = fs::read_to_string(path)?;
    KnowledgeStore::from_json_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_covers_every_category() {
        let store = KnowledgeStore::builtin().unwrap();
        for category in Category::ALL {
            let entry = store.get(category).unwrap();
            assert!(entry.dos.len() >= 7, "{} dos", category);
            assert!(entry.donts.len() >= 7, "{} donts", category);
        }
    }

    #[test]
    fn test_missing_category_resolves_to_generic() {
        let json = r#"{
            "flood": {"dos": ["Go high"], "donts": ["Don't wade"]},
            "general_disaster": {"dos": ["Stay calm"], "donts": ["Don't panic"]}
        }"#;
        let store = KnowledgeStore::from_json_str(json).unwrap();
        let (used, entry) = store.resolve(Category::Tornado);
        assert_eq!(used, Category::GeneralDisaster);
        assert!(!entry.dos.is_empty());
        assert!(!entry.donts.is_empty());

        let (used, entry) = store.resolve(Category::Flood);
        assert_eq!(used, Category::Flood);
        assert_eq!(entry.dos, vec!["Go high".to_string()]);
    }

    #[test]
    fn test_missing_generic_rejected() {
        let json = r#"{"flood": {"dos": ["a"], "donts": ["b"]}}"#;
        let err = KnowledgeStore::from_json_str(json).unwrap_err();
        assert!(matches!(err, KnowledgeError::MissingGeneric));
    }

    #[test]
    fn test_incomplete_generic_rejected() {
        let json = r#"{"general_disaster": {"dos": ["a"]}}"#;
        let err = KnowledgeStore::from_json_str(json).unwrap_err();
        assert!(matches!(err, KnowledgeError::IncompleteGeneric(_)));
    }

    #[test]
    fn test_unknown_keys_skipped() {
        let json = r#"{
            "volcano": {"dos": ["a"], "donts": ["b"]},
            "general_disaster": {"dos": ["a"], "donts": ["b"]}
        }"#;
        let store = KnowledgeStore::from_json_str(json).unwrap();
        assert_eq!(store.categories(), vec![Category::GeneralDisaster]);
    }

    #[test]
    fn test_load_or_builtin_falls_back() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "not json").unwrap();
        let store = KnowledgeStore::load_or_builtin(Some(tmp.path())).unwrap();
        assert_eq!(store.len(), Category::ALL.len());

        let missing = KnowledgeStore::load_or_builtin(Some(Path::new("/nonexistent/kb.json"))).unwrap();
        assert_eq!(missing.len(), Category::ALL.len());
    }

    #[test]
    fn test_load_knowledge_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{"general_disaster": {{"dos": ["Stay calm"], "donts": ["Don't panic"]}}}}"#
        )
        .unwrap();
        let store = load_knowledge(tmp.path()).unwrap();
        assert_eq!(store.generic().dos[0], "Stay calm");
    }
}
