//! Persisted learned-answer record.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::category::Category;

/// Where a learned answer came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearnedFrom {
    /// Generated by the remote answer source.
    #[default]
    #[serde(rename = "remote", alias = "gemini")]
    Remote,
}

/// A previously generated answer, reusable for similar questions.
///
/// The normalized question is the key of the owning map, not a field. The
/// serialized field names match the cache file written by earlier releases:
/// `{question, answer, disaster_type, learned_from, timestamp, usage_count}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedRecord {
    /// The question as the user typed it.
    #[serde(default)]
    pub question: String,
    /// The stored answer text, without attribution footer.
    pub answer: String,
    #[serde(rename = "disaster_type", default = "default_category")]
    pub category: Category,
    #[serde(rename = "learned_from", default)]
    pub source: LearnedFrom,
    /// Local time of the write, ISO-8601 without offset.
    #[serde(
        rename = "timestamp",
        default = "now",
        deserialize_with = "deserialize_timestamp"
    )]
    pub created_at: NaiveDateTime,
    /// Times served, counting the original remote answer.
    #[serde(rename = "usage_count", default = "default_reuse_count")]
    pub reuse_count: u32,
}

fn default_category() -> Category {
    Category::GeneralDisaster
}

fn default_reuse_count() -> u32 {
    1
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parse a stored timestamp: naive ISO-8601 (`T` or space separated) or
/// RFC 3339 with an offset, which is converted to local time.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

/// Unparseable or null timestamps load as the current time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp).unwrap_or_else(now))
}

impl LearnedRecord {
    /// A fresh remote-sourced record with `reuse_count == 1`.
    pub fn new_remote(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category,
            source: LearnedFrom::Remote,
            created_at: now(),
            reuse_count: default_reuse_count(),
        }
    }
}

/// Cache key for a question: lower-cased and trimmed.
pub fn normalize_question(question: &str) -> String {
    question.to_lowercase().trim().to_string()
}
