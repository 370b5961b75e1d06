//! Commit message generation from a diff
//!
//! Candidate models are tried in order. A rejected request or an unusable
//! response moves on to the next candidate; any other failure stops the
//! search.

use crate::git::commit::clean_generated_message;
use crate::llm::{ChatMessage, GenerationError, TextGenerator};

/// Largest diff, in characters, sent to the text generation service
pub const MAX_DIFF_CHARS: usize = 4 * 4096;

pub const COMMIT_SYSTEM_PROMPT: &str = "\
You are an expert software engineer.
Review the provided context and diffs which are about to be committed to a git repo.
Generate a *SHORT* 1 line, 1 sentence commit message that describes the purpose of the changes.
The commit message MUST be in the past tense.
It must describe the changes *which have been made* in the diffs!
Reply with JUST the commit message, without quotes, comments, questions, etc!
";

/// What one model attempt produced
#[derive(Debug)]
enum Attempt {
    Success(String),
    TryNextModel(GenerationError),
    Terminal(GenerationError),
}

pub struct CommitMessageGenerator<'a> {
    client: &'a dyn TextGenerator,
    models: Vec<String>,
}

impl<'a> CommitMessageGenerator<'a> {
    pub fn new(client: &'a dyn TextGenerator, models: Vec<String>) -> Self {
        Self { client, models }
    }

    /// Primary model, used in user-facing notices
    pub fn primary_model(&self) -> &str {
        self.models.first().map(String::as_str).unwrap_or("the model")
    }

    /// Generate a cleaned, one-line commit message for `diffs`
    pub fn generate(&self, diffs: &str, context: Option<&str>) -> Result<String, GenerationError> {
        let len = diffs.chars().count();
        if len > MAX_DIFF_CHARS {
            return Err(GenerationError::DiffTooLarge {
                len,
                max: MAX_DIFF_CHARS,
            });
        }

        let messages = build_messages(diffs, context);
        tracing::debug!("Commit message prompt:\n{}", messages[1].content);

        let mut raw = None;
        for model in &self.models {
            match self.attempt(model, &messages) {
                Attempt::Success(content) => {
                    raw = Some(content);
                    break;
                }
                Attempt::TryNextModel(e) => {
                    tracing::warn!("{} could not produce a commit message: {}", model, e);
                }
                Attempt::Terminal(e) => {
                    tracing::warn!("Giving up on commit message generation: {}", e);
                    return Err(e);
                }
            }
        }

        let raw = raw.ok_or(GenerationError::AllModelsFailed)?;
        let message = clean_generated_message(&raw);
        if message.is_empty() {
            return Err(GenerationError::MalformedResponse(
                "empty commit message".to_string(),
            ));
        }

        Ok(message)
    }

    fn attempt(&self, model: &str, messages: &[ChatMessage]) -> Attempt {
        match self.client.complete(model, messages) {
            Ok(completion) => {
                tracing::debug!("Completion {} from {}", completion.id, model);
                Attempt::Success(completion.content)
            }
            Err(e) if e.allows_fallback() => Attempt::TryNextModel(e),
            Err(e) => Attempt::Terminal(e),
        }
    }
}

/// System instruction plus optional context followed by the labelled diff
pub fn build_messages(diffs: &str, context: Option<&str>) -> Vec<ChatMessage> {
    let mut content = String::new();
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        content.push_str(context);
        content.push('\n');
    }
    content.push_str("# Diffs:\n");
    content.push_str(diffs);

    vec![
        ChatMessage::system(COMMIT_SYSTEM_PROMPT),
        ChatMessage::user(content),
    ]
}
