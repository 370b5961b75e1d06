//! Text generation service seam
//!
//! The repository manager only needs "send these messages to this model and
//! hand back the first choice". [`TextGenerator`] is that contract;
//! [`openai::OpenAiClient`] is the production adapter.

pub mod openai;
pub mod retry;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use retry::{RetryClassification, RetryableError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// First choice of a completed, non-streaming request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub id: String,
    pub content: String,
}

/// Anything that can turn a conversation into a short completion.
///
/// Implementations are expected to apply their own retry policy for
/// transient failures before returning an error.
pub trait TextGenerator {
    fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<Completion, GenerationError>;
}

/// Errors produced while generating a commit message
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Diff exceeds what is sent to the service
    #[error("Diff is too large ({len} characters, limit {max})")]
    DiffTooLarge { len: usize, max: usize },

    /// The service refused the request (bad parameters, context too long)
    #[error("Request rejected: {0}")]
    RequestRejected(String),

    /// The response did not carry a first choice with content
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Network failure, rate limit or server error
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Credentials missing or refused
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Client could not be set up
    #[error("Text generation is not configured: {0}")]
    NotConfigured(String),

    /// Every candidate model failed
    #[error("All candidate models failed")]
    AllModelsFailed,
}

impl RetryableError for GenerationError {
    fn classify(&self) -> RetryClassification {
        match self {
            GenerationError::Transient(_) => RetryClassification::Retry,
            _ => RetryClassification::NoRetry,
        }
    }
}

impl GenerationError {
    /// Map an HTTP error status and body onto the error taxonomy
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => GenerationError::Authentication(body.to_string()),
            400 | 404 | 413 | 422 => GenerationError::RequestRejected(body.to_string()),
            408 | 429 | 500..=599 => GenerationError::Transient(format!("HTTP {status}: {body}")),
            _ => GenerationError::RequestRejected(format!("HTTP {status}: {body}")),
        }
    }

    /// Whether the next candidate model is worth trying after this error
    pub fn allows_fallback(&self) -> bool {
        matches!(
            self,
            GenerationError::RequestRejected(_) | GenerationError::MalformedResponse(_)
        )
    }
}
