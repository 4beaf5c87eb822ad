use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::ai::TextGenerator;
use crate::config::app::{ExpiryConfig, PacingConfig};
use crate::domain::SeedSource;

/// Everything a job needs, built once at startup and cloned per job.
#[derive(Clone)]
pub struct JobContext {
    pub db: DatabaseConnection,
    pub ai: Arc<dyn TextGenerator>,
    pub seeds: SeedSource,
    pub pacing: PacingConfig,
    pub expiry: ExpiryConfig,
}
