//! Player repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::players_sea as players_adapter;
use crate::domain::PlayerId;
use crate::entities::players;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Player domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub created_at: OffsetDateTime,
}

impl From<players::Model> for Player {
    fn from(m: players::Model) -> Self {
        Player {
            id: m.id,
            display_name: m.display_name,
            created_at: m.created_at,
        }
    }
}

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    display_name: String,
) -> Result<Player, DomainError> {
    let model = players_adapter::create_player(conn, display_name).await?;
    Ok(Player::from(model))
}

pub async fn require_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: PlayerId,
) -> Result<Player, DomainError> {
    players_adapter::find_by_id(conn, player_id)
        .await?
        .map(Player::from)
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, format!("Player {player_id} not found"))
        })
}
