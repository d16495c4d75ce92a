use std::fmt;

use serde::{Deserialize, Serialize};

/// A chat message for the LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A text-to-shorter-text function, called concurrently from pool workers.
///
/// Implementations must be safe to share across threads; calls block until
/// the summary is available.
pub trait SummaryBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Summarize `text` to roughly `min_length..=max_length` words.
    fn summarize(&self, text: &str, min_length: usize, max_length: usize)
        -> Result<String, LlmError>;

    /// One-time readiness check run when the backend is first loaded.
    fn warm_up(&self) -> Result<(), LlmError> {
        Ok(())
    }

    /// Models the backend can serve.
    fn list_models(&self) -> Result<Vec<String>, LlmError> {
        Ok(Vec::new())
    }
}

/// Adapts a closure into a [`SummaryBackend`].
pub struct FnBackend<F> {
    name: String,
    f: F,
}

impl<F> FnBackend<F>
where
    F: Fn(&str, usize, usize) -> Result<String, LlmError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> SummaryBackend for FnBackend<F>
where
    F: Fn(&str, usize, usize) -> Result<String, LlmError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn summarize(&self, text: &str, min_length: usize, max_length: usize) -> Result<String, LlmError> {
        (self.f)(text, min_length, max_length)
    }
}

impl<F> fmt::Debug for FnBackend<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnBackend").field("name", &self.name).finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error: {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("failed to parse response: {0}")]
    ParseError(String),
    #[error("provider not configured: {0}")]
    NotConfigured(String),
    #[error("model '{model}' is not available (found: {available})")]
    ModelUnavailable { model: String, available: String },
    #[error("backend initialization failed: {0}")]
    Init(String),
    #[error("{0}")]
    Other(String),
}
