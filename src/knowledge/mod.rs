//! Static disaster knowledge base.
//!
//! This module provides:
//! - `KnowledgeStore`, the read-only category → dos/don'ts mapping
//! - `ResponseMode` and the numbered-list renderer used by the terminal
//!   fallback stage of the router

pub mod response;
pub mod store;

pub use self::response::{render, ResponseMode};
pub use self::store::{load_knowledge, KnowledgeEntry, KnowledgeStore};
