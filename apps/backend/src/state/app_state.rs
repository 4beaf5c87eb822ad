use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::ai::TextGenerator;
use crate::config::app::AppConfig;
use crate::services::games::GameService;
use crate::services::players::PlayerService;

/// Application state shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub ai: Arc<dyn TextGenerator>,
    pub config: AppConfig,
    pub games: GameService,
    pub players: PlayerService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, ai: Arc<dyn TextGenerator>, config: AppConfig) -> Self {
        Self {
            games: GameService::new(db.clone(), Arc::clone(&ai)),
            players: PlayerService::new(db.clone()),
            db,
            ai,
            config,
        }
    }
}
