//! Player domain service.

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::domain::text::validate_display_name;
use crate::errors::domain::DomainError;
use crate::repos::players::{self, Player};

#[derive(Clone)]
pub struct PlayerService {
    db: DatabaseConnection,
}

impl PlayerService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a player under a trimmed display name.
    pub async fn create_player(&self, display_name: &str) -> Result<Player, DomainError> {
        let name = validate_display_name(display_name)?;
        let player = players::create_player(&self.db, name).await?;
        info!(player_id = player.id, "player created");
        Ok(player)
    }

    pub async fn get_player(&self, player_id: i64) -> Result<Player, DomainError> {
        players::require_player(&self.db, player_id).await
    }
}
