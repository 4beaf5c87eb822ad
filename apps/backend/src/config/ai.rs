//! Text generator settings.

use std::env;
use std::time::Duration;

use crate::config::var_or;
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub base_url: String,
    /// Without a key only canned text is produced.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl AiConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = env::var("AI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let timeout_ms: u64 = var_or("AI_TIMEOUT_MS", 10_000)?;

        Ok(Self {
            base_url: var_or("AI_API_BASE_URL", DEFAULT_BASE_URL.to_string())?
                .trim_end_matches('/')
                .to_string(),
            api_key,
            model: var_or("AI_MODEL", DEFAULT_MODEL.to_string())?,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}
