//! Google Gemini answer source.
//!
//! Calls the Generative Language REST API (`models/{model}:generateContent`)
//! with an API key passed as the `key` query parameter.
//!
//! One attempt per question with a whole-request timeout. Rate limiting,
//! server errors, transport failures, API error objects, and empty
//! candidates all come back as `RemoteError` so the caller can fall through.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::category::Category;
use crate::config::GeminiSettings;
use crate::errors::RemoteError;

use super::prompt::build_prompt;
use super::RemoteAnswerSource;

/// Gemini-backed remote answer source.
#[derive(Debug, Clone)]
pub struct GeminiAnswerSource {
    settings: GeminiSettings,
    label: String,
    client: reqwest::Client,
}

impl GeminiAnswerSource {
    /// Build a client from settings. Fails only if the HTTP client cannot be built.
    pub fn new(settings: GeminiSettings) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        let label = format!("Google Gemini ({})", settings.model);
        Ok(Self {
            settings,
            label,
            client,
        })
    }

    /// The `generateContent` endpoint for the configured model.
    pub fn api_endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    /// Request body for a single-turn prompt.
    pub fn build_request_body(&self, prompt: &str) -> Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "temperature": self.settings.temperature,
                "maxOutputTokens": self.settings.max_output_tokens,
            },
        })
    }
}

/// Extract the answer text from a `generateContent` response.
pub fn parse_response(response: &Value) -> Result<String, RemoteError> {
    if let Some(error) = response.get("error") {
        let msg = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown Gemini API error");
        return Err(RemoteError::Api(msg.to_string()));
    }

    let candidates = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .ok_or_else(|| RemoteError::MalformedResponse("no candidates".to_string()))?;

    let candidate = candidates
        .first()
        .ok_or_else(|| RemoteError::MalformedResponse("empty candidates".to_string()))?;

    let parts = candidate
        .get("content")
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| RemoteError::MalformedResponse("no content.parts".to_string()))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(RemoteError::EmptyResponse);
    }
    Ok(text.to_string())
}

#[async_trait]
impl RemoteAnswerSource for GeminiAnswerSource {
    fn label(&self) -> &str {
        &self.label
    }

    async fn generate(&self, question: &str, category: Category) -> Result<String, RemoteError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(RemoteError::Unavailable)?;

        let body = self.build_request_body(&build_prompt(question, category));
        log::debug!(
            "GeminiAnswerSource.generate: model={}, category={}",
            self.settings.model,
            category
        );

        let response = self
            .client
            .post(self.api_endpoint())
            .header("content-type", "application/json")
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body: response_text.chars().take(500).collect(),
            });
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            RemoteError::MalformedResponse(format!(
                "{} - Body: {}",
                e,
                response_text.chars().take(500).collect::<String>()
            ))
        })?;

        if let Some(usage) = response_json.get("usageMetadata") {
            log::debug!("Gemini usage: {}", usage);
        }

        parse_response(&response_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> GeminiAnswerSource {
        GeminiAnswerSource::new(GeminiSettings {
            api_key: Some("k".to_string()),
            base_url: "https://example.test/v1beta/".to_string(),
            ..GeminiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_api_endpoint() {
        assert_eq!(
            source().api_endpoint(),
            "https://example.test/v1beta/models/gemini-2.0-flash-exp:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = source().build_request_body("hello");
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let response = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Stay " }, { "text": "indoors.\n" }] }
            }]
        });
        assert_eq!(parse_response(&response).unwrap(), "Stay indoors.");
    }

    #[test]
    fn test_parse_response_api_error() {
        let response = serde_json::json!({ "error": { "message": "API key not valid" } });
        match parse_response(&response) {
            Err(RemoteError::Api(msg)) => assert_eq!(msg, "API key not valid"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_parse_response_malformed() {
        assert!(matches!(
            parse_response(&serde_json::json!({})),
            Err(RemoteError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response(&serde_json::json!({ "candidates": [] })),
            Err(RemoteError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_parse_response_blank_text() {
        let response = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  \n" }] } }]
        });
        assert!(matches!(
            parse_response(&response),
            Err(RemoteError::EmptyResponse)
        ));
    }
}
