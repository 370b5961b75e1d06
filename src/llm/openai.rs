//! Blocking client for OpenAI-compatible `chat/completions` endpoints

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::retry::{RetryConfig, with_retry};
use super::{ChatMessage, Completion, GenerationError, TextGenerator};
use crate::config::LlmConfig;

pub struct OpenAiClient {
    client: Client,
    api_base: String,
    api_key: Option<String>,
    retry: RetryConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::NotConfigured(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            retry: RetryConfig::from(config),
        })
    }

    /// Set retry configuration
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn send_once(
        &self,
        api_key: &str,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<Completion, GenerationError> {
        let request = ChatRequest {
            model,
            messages,
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .map_err(|e| GenerationError::Transient(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| GenerationError::Transient(e.to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::from_http_status(status.as_u16(), &body));
        }

        parse_response(&body)
    }
}

impl TextGenerator for OpenAiClient {
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Completion, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            GenerationError::NotConfigured(
                "no API key; set llm.api_key or OPENAI_API_KEY".to_string(),
            )
        })?;

        tracing::debug!("Requesting completion from {} ({} messages)", model, messages.len());
        with_retry(&self.retry, model, || self.send_once(api_key, model, messages))
    }
}

fn parse_response(body: &str) -> Result<Completion, GenerationError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            GenerationError::MalformedResponse("no message content in first choice".to_string())
        })?;

    Ok(Completion {
        id: response.id,
        content,
    })
}
