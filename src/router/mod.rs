//! Per-message response routing.
//!
//! Every message runs through [`PIPELINE`], a fixed-order table of
//! [`RouteStage`]s. The first stage that produces a reply wins:
//!
//! 1. `LearnedCache` - a similar enough learned question answers directly
//! 2. `Greeting` - canned introduction
//! 3. `Gratitude` - canned acknowledgment
//! 4. `Classify` - pick a category for later stages, never replies
//! 5. `RemoteFallback` - eligible questions go to the remote source and the
//!    answer is learned
//! 6. `KnowledgeBase` - static guidance, always replies
//!
//! Only `LearnedCache` and `RemoteFallback` mutate state. Routing is total:
//! remote and persistence failures are logged and routing moves on.

pub mod canned;
pub mod eligibility;
pub mod history;

use std::sync::Arc;

use crate::category::Category;
use crate::classifier::classify;
use crate::config::LifelinkConfig;
use crate::errors::{KnowledgeError, RemoteError};
use crate::knowledge::{render, KnowledgeStore, ResponseMode};
use crate::learned::{find_similar, JsonFilePersistence, LearnedCache};
use crate::remote::{resolve_source, RemoteAnswerSource};

pub use self::eligibility::{assess, needs_remote, Eligibility};
pub use self::history::{ConversationTurn, Role};

/// One row of the routing decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStage {
    LearnedCache,
    Greeting,
    Gratitude,
    Classify,
    RemoteFallback,
    KnowledgeBase,
}

/// Stage evaluation order.
pub const PIPELINE: [RouteStage; 6] = [
    RouteStage::LearnedCache,
    RouteStage::Greeting,
    RouteStage::Gratitude,
    RouteStage::Classify,
    RouteStage::RemoteFallback,
    RouteStage::KnowledgeBase,
];

/// Message plus the facts stages derive from it.
#[derive(Debug, Clone)]
struct MessageContext<'a> {
    message: &'a str,
    lower: String,
    token_count: usize,
    category: Option<Category>,
}

impl<'a> MessageContext<'a> {
    fn new(message: &'a str) -> Self {
        let lower = message.trim().to_lowercase();
        let token_count = lower.split_whitespace().count();
        Self {
            message,
            lower,
            token_count,
            category: None,
        }
    }

    /// Classified category, computed on first use.
    fn category(&mut self) -> Category {
        let message = self.message;
        *self.category.get_or_insert_with(|| classify(message))
    }
}

/// Which stage answered a message, and with what.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOutcome {
    pub stage: RouteStage,
    /// Category of the reply. `None` for canned replies.
    pub category: Option<Category>,
    pub reply: String,
}

/// A conversational session over shared knowledge and a learned cache.
#[derive(Debug)]
pub struct Router {
    knowledge: Arc<KnowledgeStore>,
    cache: LearnedCache,
    remote: Arc<dyn RemoteAnswerSource>,
    history: Vec<ConversationTurn>,
}

impl Router {
    pub fn new(
        knowledge: Arc<KnowledgeStore>,
        cache: LearnedCache,
        remote: Arc<dyn RemoteAnswerSource>,
    ) -> Self {
        Self {
            knowledge,
            cache,
            remote,
            history: Vec::new(),
        }
    }

    /// Load the knowledge store and learned cache, and resolve the remote source.
    pub fn from_config(config: &LifelinkConfig) -> Result<Self, KnowledgeError> {
        let knowledge = KnowledgeStore::load_or_builtin(config.knowledge_path.as_deref())?;
        let cache = LearnedCache::load(Arc::new(JsonFilePersistence::new(
            config.learned_path.clone(),
        )));
        let remote = resolve_source(&config.gemini);
        Ok(Self::new(Arc::new(knowledge), cache, remote))
    }

    /// Reply to `message`. Never fails.
    pub async fn route(&mut self, message: &str) -> String {
        self.dispatch(message).await.reply
    }

    /// Reply to `message` along with the stage that produced it.
    pub async fn dispatch(&mut self, message: &str) -> RouteOutcome {
        let mut ctx = MessageContext::new(message);
        for stage in PIPELINE {
            if let Some(reply) = self.run_stage(stage, &mut ctx).await {
                log::debug!("Routed via {:?} (category: {:?})", stage, ctx.category);
                return RouteOutcome {
                    stage,
                    category: ctx.category,
                    reply,
                };
            }
        }
        let reply = self.knowledge_reply(&mut ctx);
        RouteOutcome {
            stage: RouteStage::KnowledgeBase,
            category: ctx.category,
            reply,
        }
    }

    async fn run_stage(&mut self, stage: RouteStage, ctx: &mut MessageContext<'_>) -> Option<String> {
        match stage {
            RouteStage::LearnedCache => self.learned_reply(ctx),
            RouteStage::Greeting => canned::is_greeting(&ctx.lower, ctx.token_count)
                .then(|| canned::greeting(canned::extract_name(ctx.message).as_deref())),
            RouteStage::Gratitude => {
                canned::is_gratitude(&ctx.lower, ctx.token_count).then(canned::gratitude)
            }
            RouteStage::Classify => {
                ctx.category();
                None
            }
            RouteStage::RemoteFallback => self.remote_reply(ctx).await,
            RouteStage::KnowledgeBase => Some(self.knowledge_reply(ctx)),
        }
    }

    fn learned_reply(&mut self, ctx: &mut MessageContext<'_>) -> Option<String> {
        let (key, answer, category, score) = {
            let found = find_similar(ctx.message, self.cache.records())?;
            (
                found.key.to_string(),
                found.record.answer.clone(),
                found.record.category,
                found.score,
            )
        };
        let reuses = self.cache.increment_usage(&key).unwrap_or_default();
        log::info!(
            "Using learned response for '{}' (similarity {:.2}, used {} times)",
            key,
            score,
            reuses
        );
        ctx.category = Some(category);
        Some(canned::learned_reply(&answer))
    }

    async fn remote_reply(&mut self, ctx: &mut MessageContext<'_>) -> Option<String> {
        if !needs_remote(ctx.message) {
            return None;
        }
        let category = ctx.category();
        let remote = Arc::clone(&self.remote);

        match remote.generate(ctx.message, category).await {
            Ok(answer) if !answer.trim().is_empty() => {
                let answer = answer.trim();
                self.cache.upsert(ctx.message, answer, category);
                Some(canned::remote_reply(answer, remote.label()))
            }
            Ok(_) => {
                log::warn!("{} returned an empty answer, using knowledge base", remote.label());
                None
            }
            Err(RemoteError::Unavailable) => {
                log::debug!("Remote source unavailable, using knowledge base");
                None
            }
            Err(e) => {
                log::warn!("{} error: {}, using knowledge base", remote.label(), e);
                None
            }
        }
    }

    fn knowledge_reply(&self, ctx: &mut MessageContext<'_>) -> String {
        let (category, entry) = self.knowledge.resolve(ctx.category());
        render(category, entry, ResponseMode::detect(ctx.message))
    }

    /// Route `message` and record both sides in the history.
    pub async fn chat(&mut self, message: &str) -> String {
        self.history.push(ConversationTurn::user(message));
        let reply = self.route(message).await;
        self.history.push(ConversationTurn::assistant(reply.clone()));
        reply
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn reset_conversation(&mut self) {
        self.history.clear();
    }

    pub fn emergency_contacts(&self) -> &'static str {
        canned::emergency_contacts()
    }

    /// Categories the knowledge store has guidance for.
    pub fn disaster_types(&self) -> Vec<Category> {
        self.knowledge.categories()
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    pub fn cache(&self) -> &LearnedCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut LearnedCache {
        &mut self.cache
    }

    pub fn remote_label(&self) -> &str {
        self.remote.label()
    }
}
