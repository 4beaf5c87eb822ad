//! SeaORM adapter for the append-only message log.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::messages::{self, MessageKind};

#[derive(Debug, Clone)]
pub struct MessageCreate {
    pub game_id: i64,
    pub source_bot_id: i64,
    pub target_bot_id: i64,
    pub kind: MessageKind,
    pub text: String,
}

pub async fn insert_message<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MessageCreate,
) -> Result<messages::Model, sea_orm::DbErr> {
    let message = messages::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        source_bot_id: Set(dto.source_bot_id),
        target_bot_id: Set(dto.target_bot_id),
        kind: Set(dto.kind),
        text: Set(dto.text),
        created_at: Set(OffsetDateTime::now_utc()),
    };
    message.insert(conn).await
}

/// Messages of a game ordered by (created_at, id).
pub async fn find_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<messages::Model>, sea_orm::DbErr> {
    messages::Entity::find()
        .filter(messages::Column::GameId.eq(game_id))
        .order_by_asc(messages::Column::CreatedAt)
        .order_by_asc(messages::Column::Id)
        .all(conn)
        .await
}

pub async fn count_questions_from<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    bot_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    messages::Entity::find()
        .filter(messages::Column::GameId.eq(game_id))
        .filter(messages::Column::SourceBotId.eq(bot_id))
        .filter(messages::Column::Kind.eq(MessageKind::Question))
        .count(conn)
        .await
}

pub async fn delete_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = messages::Entity::delete_many()
        .filter(messages::Column::GameId.eq(game_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
