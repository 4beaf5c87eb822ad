use std::sync::Arc;

use backend::ai::{CannedOnly, TextGenerator};
use backend::config::app::{AppConfig, PacingConfig};
use backend::config::db::DbKind;
use backend::domain::SeedSource;
use backend::infra::db::bootstrap_db;
use backend::infra::state::build_state;
use backend::jobs::JobContext;
use backend::services::games::GameService;
use backend::services::players::PlayerService;
use backend::state::app_state::AppState;
use backend::AppError;
use sea_orm::DatabaseConnection;

/// Fixed seed so shuffled turn orders repeat between runs.
pub const TEST_SEED: u64 = 0x7E57;

/// Fresh, migrated in-memory database owned by one test.
pub async fn test_db() -> Result<DatabaseConnection, AppError> {
    bootstrap_db(&DbKind::SqliteMemory).await
}

pub async fn build_test_state() -> Result<AppState, AppError> {
    build_state()
        .with_connection(test_db().await?)
        .with_ai(Arc::new(CannedOnly))
        .build()
        .await
}

/// Services and job context sharing one database and generator.
pub struct TestEnv {
    pub db: DatabaseConnection,
    pub games: GameService,
    pub players: PlayerService,
    pub jobs: JobContext,
}

impl TestEnv {
    pub async fn new() -> Result<Self, AppError> {
        Self::with_ai(Arc::new(CannedOnly)).await
    }

    pub async fn with_ai(ai: Arc<dyn TextGenerator>) -> Result<Self, AppError> {
        let db = test_db().await?;
        let config = AppConfig::default();
        Ok(Self {
            games: GameService::new(db.clone(), Arc::clone(&ai)),
            players: PlayerService::new(db.clone()),
            jobs: JobContext {
                db: db.clone(),
                ai,
                seeds: SeedSource::Fixed(TEST_SEED),
                pacing: PacingConfig::none(),
                expiry: config.expiry,
            },
            db,
        })
    }
}
