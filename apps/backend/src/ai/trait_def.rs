//! Text generator trait definition.

use async_trait::async_trait;
use thiserror::Error;

/// Errors a text generator can report. Callers fall back to canned text.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI request timed out")]
    Timeout,
    #[error("AI transport error: {0}")]
    Transport(String),
    #[error("AI returned status {status}")]
    Status { status: u16 },
    #[error("AI response malformed: {0}")]
    Malformed(String),
    #[error("AI is not configured")]
    Disabled,
}

/// Black-box text completion.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String, AiError>;
}
