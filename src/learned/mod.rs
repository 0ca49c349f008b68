//! Learned-answer cache.
//!
//! Remote answers are written here keyed by normalized question text so that
//! later, similar-enough questions are answered without another remote call.
//!
//! - `record`: the persisted `LearnedRecord` shape
//! - `persistence`: the `CachePersistence` port with JSON-file and in-memory backends
//! - `cache`: the owned, write-through `LearnedCache`
//! - `similarity`: word-overlap matching against cached keys
//! - `manager`: statistics, search, deletion, and training-data export

pub mod cache;
pub mod manager;
pub mod persistence;
pub mod record;
pub mod similarity;

pub use self::cache::LearnedCache;
pub use self::manager::{LearnedStats, TrainingExample};
pub use self::persistence::{CachePersistence, JsonFilePersistence, LearnedMap, MemoryPersistence};
pub use self::record::{normalize_question, LearnedFrom, LearnedRecord};
pub use self::similarity::{find_similar, SimilarMatch, SIMILARITY_THRESHOLD};
