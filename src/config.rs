//! Runtime configuration.
//!
//! Configuration comes from an optional YAML file plus environment
//! variables. Every field has a default, so an empty file (or none at all)
//! yields a working knowledge-base-only assistant.
//!
//! # Environment Variables
//!
//! - `LIFELINK_KNOWLEDGE` — path to a knowledge JSON file (default: built-in)
//! - `LIFELINK_LEARNED` — path to the learned-responses JSON file
//! - `GEMINI_API_KEY` / `GOOGLE_API_KEY` — remote source credential
//! - `GEMINI_MODEL` — remote model name

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default learned-responses file, relative to the working directory.
pub const DEFAULT_LEARNED_PATH: &str = "learned_responses.json";

/// Dotenv file scanned for a credential when none is in the environment.
pub const DOTENV_FILE: &str = ".env";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifelinkConfig {
    /// External knowledge base. `None` uses the built-in store.
    pub knowledge_path: Option<PathBuf>,
    /// Learned-responses file.
    pub learned_path: PathBuf,
    /// Remote answer source settings.
    pub gemini: GeminiSettings,
}

impl Default for LifelinkConfig {
    fn default() -> Self {
        Self {
            knowledge_path: None,
            learned_path: PathBuf::from(DEFAULT_LEARNED_PATH),
            gemini: GeminiSettings::default(),
        }
    }
}

/// Settings for the Gemini answer source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// API key. `None` disables the remote source for the process lifetime.
    pub api_key: Option<String>,
    pub model: String,
    /// API root, without the `/models/...` suffix.
    pub base_url: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    pub max_output_tokens: u32,
    pub temperature: f64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash-exp".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
            max_output_tokens: 1024,
            temperature: 0.7,
        }
    }
}

impl LifelinkConfig {
    /// Defaults overridden by environment variables and `.env`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load a YAML file, then fill a missing credential from the environment.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&content)?;
        if config.gemini.api_key.is_none() {
            config.gemini.api_key = discover_api_key(Path::new(DOTENV_FILE));
        }
        Ok(config)
    }

    /// Parse YAML text without consulting the environment.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var("LIFELINK_KNOWLEDGE") {
            self.knowledge_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("LIFELINK_LEARNED") {
            self.learned_path = PathBuf::from(path);
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(key) = discover_api_key(Path::new(DOTENV_FILE)) {
            self.gemini.api_key = Some(key);
        }
    }
}

/// Find a credential in `GEMINI_API_KEY`, `GOOGLE_API_KEY`, or a dotenv file.
pub fn discover_api_key(dotenv: &Path) -> Option<String> {
    std::env::var("GEMINI_API_KEY")
        .ok()
        .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            fs::read_to_string(dotenv)
                .ok()
                .and_then(|content| api_key_from_dotenv(&content))
        })
}

/// Extract a credential from dotenv text.
///
/// Accepts `GEMINI_API_KEY=...` / `GOOGLE_API_KEY=...` assignments (optionally
/// quoted) or a bare line holding a Google API key (`AIza` prefix).
pub fn api_key_from_dotenv(content: &str) -> Option<String> {
    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((name, value)) = line.split_once('=') {
            let name = name.trim().trim_start_matches("export ").trim();
            if name == "GEMINI_API_KEY" || name == "GOOGLE_API_KEY" {
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        } else if line.contains("AIza") {
            return Some(line.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LifelinkConfig::default();
        assert!(config.knowledge_path.is_none());
        assert_eq!(config.learned_path, PathBuf::from("learned_responses.json"));
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.gemini.model, "gemini-2.0-flash-exp");
        assert_eq!(config.gemini.timeout_secs, 30);
    }

    #[test]
    fn test_yaml_partial_override() {
        let yaml = r#"
learned_path: /var/lib/lifelink/learned.json
gemini:
  model: gemini-1.5-flash
  timeout_secs: 10
"#;
        let config = LifelinkConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(
            config.learned_path,
            PathBuf::from("/var/lib/lifelink/learned.json")
        );
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
        assert_eq!(config.gemini.timeout_secs, 10);
        assert_eq!(config.gemini.max_output_tokens, 1024);
    }

    #[test]
    fn test_yaml_empty_is_default() {
        let config = LifelinkConfig::from_yaml_str("   \n").unwrap();
        assert_eq!(config.learned_path, PathBuf::from(DEFAULT_LEARNED_PATH));
    }

    #[test]
    fn test_yaml_invalid() {
        assert!(matches!(
            LifelinkConfig::from_yaml_str("gemini: [unclosed"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_dotenv_assignment() {
        let content = "# keys\nOTHER=1\nexport GEMINI_API_KEY=\"abc123\"\n";
        assert_eq!(api_key_from_dotenv(content), Some("abc123".to_string()));
    }

    #[test]
    fn test_dotenv_bare_key() {
        let content = "# Gemini key below\nAIzaSyExampleKey\n";
        assert_eq!(
            api_key_from_dotenv(content),
            Some("AIzaSyExampleKey".to_string())
        );
    }

    #[test]
    fn test_dotenv_none() {
        assert_eq!(api_key_from_dotenv("# nothing\nFOO=bar\n"), None);
        assert_eq!(api_key_from_dotenv("GEMINI_API_KEY=\n"), None);
    }
}
