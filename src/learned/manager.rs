//! Management operations over learned responses.
//!
//! Inspection and maintenance for the learned cache: statistics, listing,
//! keyword search, deletion, and export to a training-data file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::errors::CacheError;

use super::cache::LearnedCache;
use super::record::LearnedRecord;

/// Number of records in [`LearnedStats::top`].
pub const TOP_RECORDS: usize = 5;

/// Aggregate view of the learned cache.
#[derive(Debug, Clone)]
pub struct LearnedStats<'a> {
    pub total: usize,
    /// Sum of reuse counts across all records.
    pub total_reuses: u64,
    pub average_reuse: f64,
    /// Record count per category, largest first.
    pub by_category: Vec<(Category, usize)>,
    /// Most-reused records with their keys, largest first.
    pub top: Vec<(&'a str, &'a LearnedRecord)>,
}

/// One example in the exported training file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub input: String,
    pub output: String,
    pub disaster_type: Category,
}

impl LearnedCache {
    /// Totals, per-category counts and the most reused records.
    pub fn statistics(&self) -> LearnedStats<'_> {
        let total = self.len();
        let total_reuses: u64 = self
            .records()
            .values()
            .map(|r| u64::from(r.reuse_count))
            .sum();
        let average_reuse = if total > 0 {
            total_reuses as f64 / total as f64
        } else {
            0.0
        };

        let mut counts: HashMap<Category, usize> = HashMap::new();
        for record in self.records().values() {
            *counts.entry(record.category).or_default() += 1;
        }
        let mut by_category: Vec<(Category, usize)> = counts.into_iter().collect();
        by_category.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut top: Vec<(&str, &LearnedRecord)> = self
            .records()
            .iter()
            .map(|(k, r)| (k.as_str(), r))
            .collect();
        top.sort_by(|a, b| b.1.reuse_count.cmp(&a.1.reuse_count));
        top.truncate(TOP_RECORDS);

        LearnedStats {
            total,
            total_reuses,
            average_reuse,
            by_category,
            top,
        }
    }

    /// Records in key order, optionally filtered by category and truncated.
    pub fn list(
        &self,
        category: Option<Category>,
        limit: Option<usize>,
    ) -> Vec<(&str, &LearnedRecord)> {
        self.records()
            .iter()
            .filter(|(_, r)| category.map_or(true, |c| r.category == c))
            .take(limit.unwrap_or(usize::MAX))
            .map(|(k, r)| (k.as_str(), r))
            .collect()
    }

    /// Records whose question or answer contains `keyword`, case-insensitive.
    pub fn search(&self, keyword: &str) -> Vec<(&str, &LearnedRecord)> {
        let needle = keyword.to_lowercase();
        self.records()
            .iter()
            .filter(|(_, r)| {
                r.question.to_lowercase().contains(&needle)
                    || r.answer.to_lowercase().contains(&needle)
            })
            .map(|(k, r)| (k.as_str(), r))
            .collect()
    }

    /// Delete a record by normalized key.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.remove(key);
        if removed {
            log::info!("Deleted learned response: {}", key);
        } else {
            log::warn!("Learned response not found: {}", key);
        }
        removed
    }

    /// Training examples for every record with a question and an answer.
    pub fn training_examples(&self) -> Vec<TrainingExample> {
        self.records()
            .values()
            .filter(|r| !r.question.is_empty() && !r.answer.is_empty())
            .map(|r| TrainingExample {
                input: format!("Disaster emergency: {}", r.question),
                output: r.answer.clone(),
                disaster_type: r.category,
            })
            .collect()
    }

    /// Write [`training_examples`](Self::training_examples) to `path` as a JSON array.
    pub fn export_training_data(&self, path: &Path) -> Result<usize, CacheError> {
        let examples = self.training_examples();
        let content = serde_json::to_string_pretty(&examples)?;
        fs::write(path, content)?;
        log::info!(
            "Exported {} responses to {}",
            examples.len(),
            path.display()
        );
        Ok(examples.len())
    }
}
