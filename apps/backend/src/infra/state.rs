use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::ai::{CannedOnly, TextGenerator};
use crate::config::app::AppConfig;
use crate::config::db::DbKind;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    db_kind: Option<DbKind>,
    connection: Option<DatabaseConnection>,
    ai: Option<Arc<dyn TextGenerator>>,
    config: AppConfig,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            db_kind: None,
            connection: None,
            ai: None,
            config: AppConfig::default(),
        }
    }

    /// Connect and migrate a database of `kind` on build.
    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    /// Use an already-migrated connection.
    pub fn with_connection(mut self, conn: DatabaseConnection) -> Self {
        self.connection = Some(conn);
        self
    }

    pub fn with_ai(mut self, ai: Arc<dyn TextGenerator>) -> Self {
        self.ai = Some(ai);
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let db = match (self.connection, self.db_kind) {
            (Some(conn), _) => conn,
            // single entrypoint: build + migrate
            (None, Some(kind)) => bootstrap_db(&kind).await?,
            (None, None) => return Err(AppError::config("No database configured for AppState")),
        };
        let ai = self.ai.unwrap_or_else(|| Arc::new(CannedOnly));
        Ok(AppState::new(db, ai, self.config))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
