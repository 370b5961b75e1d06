//! Configuration management for pairgit
//!
//! Settings are layered with figment: embedded defaults, then user and
//! repository files, then `PAIRGIT_*` environment variables.

mod core;

use serde::{Deserialize, Serialize};

pub use self::core::DEFAULT_CONFIG;

/// Main configuration structure for pairgit
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct PairgitConfig {
    /// Commit composition settings
    pub commit: CommitConfig,

    /// Text generation service settings
    pub llm: LlmConfig,

    /// Terminal output settings
    pub output: OutputConfig,
}

/// Commit message composition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommitConfig {
    /// Used when no message was given and generation produced nothing
    pub fallback_message: String,

    /// Label of the body section carrying the chat transcript
    pub context_header: String,
}

/// Text generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API
    pub api_base: String,

    /// API key; `OPENAI_API_KEY` is consulted when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Candidate models, tried in order
    pub models: Vec<String>,

    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Retries for transient failures, per model
    pub max_retries: u32,

    /// First backoff delay (milliseconds)
    pub initial_backoff_ms: u64,

    /// Backoff ceiling (milliseconds)
    pub max_backoff_ms: u64,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Colour diffs and notices
    pub color: bool,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            fallback_message: "(no commit message provided)".to_string(),
            context_header: "# Aider chat conversation:".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            models: vec![
                "gpt-3.5-turbo".to_string(),
                "gpt-3.5-turbo-16k".to_string(),
            ],
            timeout_secs: 60,
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 8000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl LlmConfig {
    /// Configured key, or the conventional environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl PairgitConfig {
    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.llm.models.is_empty() {
            anyhow::bail!("At least one model must be listed under llm.models");
        }
        if self.llm.models.iter().any(|m| m.trim().is_empty()) {
            anyhow::bail!("Model names in llm.models cannot be empty");
        }
        if self.commit.fallback_message.trim().is_empty() {
            anyhow::bail!("commit.fallback_message cannot be empty");
        }
        if self.llm.timeout_secs == 0 {
            anyhow::bail!("llm.timeout_secs cannot be 0");
        }

        Ok(())
    }
}
