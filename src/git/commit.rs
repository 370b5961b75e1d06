//! Commit message utilities
//!
//! Composition of the final commit message from its parts, and cleanup of
//! messages returned by the text generation service.

use git2::Oid;

/// Length of the abbreviated commit hash shown to users
pub const SHORT_HASH_LEN: usize = 7;

/// Trim a generated message and drop one layer of wrapping double quotes
pub fn clean_generated_message(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Prepend `prefix` to the subject, if any
pub fn apply_prefix(message: &str, prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}{message}"),
        None => message.to_string(),
    }
}

/// Append the chat transcript under a labelled body section
pub fn with_context(message: &str, header: &str, context: Option<&str>) -> String {
    match context {
        Some(context) if !context.is_empty() => format!("{message}\n\n{header}\n\n{context}"),
        _ => message.to_string(),
    }
}

pub fn short_hash(oid: Oid) -> String {
    let hex = oid.to_string();
    hex[..SHORT_HASH_LEN.min(hex.len())].to_string()
}
