//! AI collaborator: produces bot questions and answers.
//!
//! This module provides:
//! - `TextGenerator`, the black-box completion capability
//! - `OpenAiChatClient`, the production implementation
//! - `CannedOnly`, used when no API key is configured
//! - `generate_or_canned`, which never fails a turn

use std::sync::Arc;

use tracing::warn;

pub mod canned;
pub mod openai;
mod trait_def;

pub use canned::CannedOnly;
pub use openai::OpenAiChatClient;
pub use trait_def::{AiError, TextGenerator};

use crate::config::ai::AiConfig;
use crate::domain::prompt::canned_text;
use crate::domain::text::clean_generated_text;
use crate::domain::MessageKind;

/// Build the generator described by `config`.
pub fn build_generator(config: &AiConfig) -> Arc<dyn TextGenerator> {
    match &config.api_key {
        Some(key) => match OpenAiChatClient::new(config, key.clone()) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                warn!(error = %e, "AI client unavailable; using canned text");
                Arc::new(CannedOnly)
            }
        },
        None => Arc::new(CannedOnly),
    }
}

/// Generate text for `kind`, falling back to canned text on error or empty output.
pub async fn generate_or_canned(
    ai: &dyn TextGenerator,
    prompt: &str,
    kind: MessageKind,
) -> String {
    match ai.generate_text(prompt).await {
        Ok(raw) => match clean_generated_text(&raw) {
            Some(text) => text,
            None => {
                warn!(%kind, "AI returned empty text; using canned fallback");
                canned_text(kind).to_string()
            }
        },
        Err(AiError::Disabled) => canned_text(kind).to_string(),
        Err(e) => {
            warn!(%kind, error = %e, "AI generation failed; using canned fallback");
            canned_text(kind).to_string()
        }
    }
}
