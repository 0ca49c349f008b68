//! Word-overlap matching against learned questions.
//!
//! Score = |shared words| / max(|question words|, |key words|). A record is
//! a match only when its score is strictly above [`SIMILARITY_THRESHOLD`]
//! and strictly above every earlier candidate, so ties keep the first record
//! in key order and a score of exactly 0.5 never matches.

use std::collections::HashSet;

use super::persistence::LearnedMap;
use super::record::LearnedRecord;

/// Minimum (exclusive) overlap for a cache hit.
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Best-scoring learned record for a question.
#[derive(Debug, Clone, Copy)]
pub struct SimilarMatch<'a> {
    /// Normalized key of the matched record.
    pub key: &'a str,
    pub record: &'a LearnedRecord,
    pub score: f64,
}

/// Whitespace-separated word set of lower-cased, trimmed text.
pub fn word_set(text: &str) -> HashSet<String> {
    text.trim()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Overlap of two word sets over the larger set's size.
pub fn overlap_score(question_words: &HashSet<String>, key_words: &HashSet<String>) -> f64 {
    let denominator = question_words.len().max(key_words.len());
    if denominator == 0 {
        return 0.0;
    }
    let shared = question_words.intersection(key_words).count();
    shared as f64 / denominator as f64
}

/// Find the learned record most similar to `question`, if any clears the threshold.
pub fn find_similar<'a>(question: &str, records: &'a LearnedMap) -> Option<SimilarMatch<'a>> {
    let question_words = word_set(question);
    let mut best: Option<SimilarMatch<'a>> = None;

    for (key, record) in records {
        let score = overlap_score(&question_words, &word_set(key));
        let best_score = best.map(|m| m.score).unwrap_or(0.0);
        if score > best_score && score > SIMILARITY_THRESHOLD {
            best = Some(SimilarMatch {
                key: key.as_str(),
                record,
                score,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;

    fn map_of(keys: &[&str]) -> LearnedMap {
        keys.iter()
            .map(|k| {
                (
                    k.to_string(),
                    LearnedRecord::new_remote(*k, format!("answer for {}", k), Category::GeneralDisaster),
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_cache() {
        assert!(find_similar("anything", &LearnedMap::new()).is_none());
    }

    #[test]
    fn test_exact_match_scores_one() {
        let records = map_of(&["how do i purify water"]);
        let m = find_similar("  How do I purify WATER ", &records).unwrap();
        assert_eq!(m.key, "how do i purify water");
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn test_score_exactly_half_is_rejected() {
        // 2 shared of 4 words.
        let records = map_of(&["a b x y"]);
        assert!(find_similar("a b c d", &records).is_none());
    }

    #[test]
    fn test_score_just_above_half_is_accepted() {
        let key: Vec<String> = (0..100).map(|i| format!("w{}", i)).collect();
        let question: Vec<String> = (0..51)
            .map(|i| format!("w{}", i))
            .chain((0..49).map(|i| format!("q{}", i)))
            .collect();
        let key = key.join(" ");
        let records = map_of(&[key.as_str()]);

        let m = find_similar(&question.join(" "), &records).unwrap();
        assert!((m.score - 0.51).abs() < 1e-9);
    }

    #[test]
    fn test_denominator_is_larger_set() {
        let q = word_set("pets flood");
        let k = word_set("pets flood evacuation shelter");
        assert_eq!(overlap_score(&q, &k), 0.5);
        assert_eq!(overlap_score(&k, &q), 0.5);
    }

    #[test]
    fn test_single_word_all_or_nothing() {
        let records = map_of(&["tsunami"]);
        assert_eq!(find_similar("Tsunami", &records).unwrap().score, 1.0);
        assert!(find_similar("tsunamis", &records).is_none());
    }

    #[test]
    fn test_highest_score_wins() {
        let records = map_of(&[
            "what to pack for evacuation kit",
            "what to pack for evacuation with pets",
        ]);
        let m = find_similar("what to pack for evacuation with pets", &records).unwrap();
        assert_eq!(m.key, "what to pack for evacuation with pets");
        assert_eq!(m.record.answer, "answer for what to pack for evacuation with pets");
    }

    #[test]
    fn test_empty_question_never_matches() {
        let records = map_of(&["", "flood"]);
        assert!(find_similar("", &records).is_none());
    }
}
