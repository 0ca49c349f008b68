//! Remote answer sources.
//!
//! The router talks to a single `RemoteAnswerSource` chosen once at startup:
//! either a working `GeminiAnswerSource` or the permanently unavailable
//! `UnavailableSource`. The router never checks availability itself; an
//! unavailable source simply fails every call and the router falls through
//! to the knowledge base.

pub mod gemini;
pub mod prompt;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::category::Category;
use crate::config::GeminiSettings;
use crate::errors::RemoteError;

pub use self::gemini::GeminiAnswerSource;
pub use self::prompt::build_prompt;

/// A generative service producing safety guidance for a question.
#[async_trait]
pub trait RemoteAnswerSource: Send + Sync + fmt::Debug {
    /// Name shown in the attribution footer.
    fn label(&self) -> &str;

    /// Generate an answer. One attempt; callers do not retry.
    async fn generate(&self, question: &str, category: Category) -> Result<String, RemoteError>;
}

/// Stand-in used when no credential is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSource;

#[async_trait]
impl RemoteAnswerSource for UnavailableSource {
    fn label(&self) -> &str {
        "unavailable"
    }

    async fn generate(&self, _question: &str, _category: Category) -> Result<String, RemoteError> {
        Err(RemoteError::Unavailable)
    }
}

/// Pick the remote source for this process from `settings`.
pub fn resolve_source(settings: &GeminiSettings) -> Arc<dyn RemoteAnswerSource> {
    let has_key = settings
        .api_key
        .as_deref()
        .is_some_and(|key| !key.trim().is_empty());
    if !has_key {
        log::info!("Remote fallback not configured (set GEMINI_API_KEY to enable)");
        return Arc::new(UnavailableSource);
    }

    match GeminiAnswerSource::new(settings.clone()) {
        Ok(source) => {
            log::info!("Remote fallback enabled: {}", source.label());
            Arc::new(source)
        }
        Err(e) => {
            log::warn!("Remote fallback unavailable: {}", e);
            Arc::new(UnavailableSource)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unavailable_source_always_fails() {
        let source = UnavailableSource;
        let result = source.generate("why is the sky orange", Category::Wildfire).await;
        assert!(matches!(result, Err(RemoteError::Unavailable)));
    }

    #[test]
    fn test_resolve_without_key_is_unavailable() {
        let source = resolve_source(&GeminiSettings::default());
        assert_eq!(source.label(), "unavailable");

        let blank = GeminiSettings {
            api_key: Some("   ".to_string()),
            ..GeminiSettings::default()
        };
        assert_eq!(resolve_source(&blank).label(), "unavailable");
    }

    #[test]
    fn test_resolve_with_key_is_gemini() {
        let settings = GeminiSettings {
            api_key: Some("test-key".to_string()),
            ..GeminiSettings::default()
        };
        let source = resolve_source(&settings);
        assert!(source.label().starts_with("Google Gemini"));
    }
}
