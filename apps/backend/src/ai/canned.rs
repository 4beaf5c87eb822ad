use async_trait::async_trait;

use super::trait_def::{AiError, TextGenerator};

/// Generator used when no API key is configured.
///
/// Always reports [`AiError::Disabled`], so every turn uses canned text.
#[derive(Debug, Default, Clone, Copy)]
pub struct CannedOnly;

#[async_trait]
impl TextGenerator for CannedOnly {
    async fn generate_text(&self, _prompt: &str) -> Result<String, AiError> {
        Err(AiError::Disabled)
    }
}
