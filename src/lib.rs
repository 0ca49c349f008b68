//! # LifeLink
//!
//! Disaster-response message router. Each incoming message is answered from
//! one of three sources, in a fixed precedence:
//!
//! - a learned-answer cache of earlier remote answers, matched by word overlap
//! - a remote generative model, for questions the static guidance cannot cover
//! - a static knowledge base of dos and don'ts per disaster category
//!
//! Remote answers are written back into the learned cache so that similar
//! questions skip the remote call next time. See [`router`] for the full
//! decision table.

pub mod category;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod errors;
pub mod knowledge;
pub mod learned;
pub mod remote;
pub mod router;

pub use category::Category;
pub use classifier::classify;
pub use config::{GeminiSettings, LifelinkConfig};
pub use errors::{CacheError, ConfigError, KnowledgeError, RemoteError};
pub use knowledge::{KnowledgeEntry, KnowledgeStore, ResponseMode};
pub use learned::{find_similar, LearnedCache, LearnedRecord, SIMILARITY_THRESHOLD};
pub use remote::{resolve_source, GeminiAnswerSource, RemoteAnswerSource, UnavailableSource};
pub use router::{needs_remote, ConversationTurn, RouteOutcome, RouteStage, Router};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
