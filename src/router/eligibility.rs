//! Remote-fallback eligibility.
//!
//! Decides whether a message should skip the knowledge base and go to the
//! remote answer source. Pure function of the message text. Rules, first
//! match decides:
//!
//! 1. any core phrase → knowledge base
//! 2. any complex phrase → remote
//! 3. fewer than [`SHORT_MESSAGE_TOKENS`] tokens → knowledge base
//! 4. otherwise → knowledge base

use crate::classifier::contains_any;

/// Phrases the knowledge base answers well.
pub const CORE_PHRASES: &[&str] = &[
    "what should i do",
    "what do i do",
    "help",
    "safety",
    "tips",
    "avoid",
    "don't",
    "should not",
    "guidelines",
    "advice",
    "during",
    "emergency",
    "danger",
];

/// Phrases marking questions outside the knowledge base's scope.
pub const COMPLEX_PHRASES: &[&str] = &[
    "why",
    "how",
    "when",
    "where",
    "who",
    "medical",
    "injury",
    "first aid",
    "medicine",
    "children",
    "baby",
    "pregnant",
    "elderly",
    "pet",
    "animal",
    "vehicle",
    "specific",
];

pub const SHORT_MESSAGE_TOKENS: usize = 4;

/// Which eligibility rule decided a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    CorePhrase,
    ComplexPhrase,
    TooShort,
    Default,
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::ComplexPhrase)
    }
}

/// Apply the eligibility rules to `message`.
pub fn assess(message: &str) -> Eligibility {
    let lower = message.to_lowercase();
    if contains_any(&lower, CORE_PHRASES) {
        Eligibility::CorePhrase
    } else if contains_any(&lower, COMPLEX_PHRASES) {
        Eligibility::ComplexPhrase
    } else if message.split_whitespace().count() < SHORT_MESSAGE_TOKENS {
        Eligibility::TooShort
    } else {
        Eligibility::Default
    }
}

/// True if `message` should be sent to the remote source.
pub fn needs_remote(message: &str) -> bool {
    assess(message).is_eligible()
}
