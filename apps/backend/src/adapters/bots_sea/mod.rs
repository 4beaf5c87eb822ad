//! SeaORM adapter for bots - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::bots::{self, BotType};

/// DTO for inserting one bot.
#[derive(Debug, Clone)]
pub struct BotCreate {
    pub game_id: i64,
    pub seat: i16,
    pub name: String,
    pub help_count: i32,
}

pub async fn insert_bot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: BotCreate,
) -> Result<bots::Model, sea_orm::DbErr> {
    let bot = bots::ActiveModel {
        id: NotSet,
        game_id: Set(dto.game_id),
        seat: Set(dto.seat),
        name: Set(dto.name),
        bot_type: Set(BotType::Ai),
        player_id: Set(None),
        help_count: Set(dto.help_count),
        created_at: Set(OffsetDateTime::now_utc()),
    };
    bot.insert(conn).await
}

/// All bots of a game, in seat order.
pub async fn find_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<bots::Model>, sea_orm::DbErr> {
    bots::Entity::find()
        .filter(bots::Column::GameId.eq(game_id))
        .order_by_asc(bots::Column::Seat)
        .all(conn)
        .await
}

/// Convert an AI bot to Human and bind it to `player_id`.
pub async fn claim_ai_bot<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    bot_id: i64,
    player_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let claimed = bots::ActiveModel {
        bot_type: Set(BotType::Human),
        player_id: Set(Some(player_id)),
        ..Default::default()
    };
    let result = bots::Entity::update_many()
        .set(claimed)
        .filter(bots::Column::Id.eq(bot_id))
        .filter(bots::Column::BotType.eq(BotType::Ai))
        .exec(conn)
        .await?;

    if result.rows_affected != 1 {
        return Err(sea_orm::DbErr::Custom(format!("BOT_NOT_AI:{bot_id}")));
    }
    Ok(())
}

/// Spend one hint; fails when none are left.
pub async fn decrement_help<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    bot_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let result = bots::Entity::update_many()
        .col_expr(
            bots::Column::HelpCount,
            Expr::col(bots::Column::HelpCount).sub(1),
        )
        .filter(bots::Column::Id.eq(bot_id))
        .filter(bots::Column::HelpCount.gt(0))
        .exec(conn)
        .await?;

    if result.rows_affected != 1 {
        return Err(sea_orm::DbErr::Custom(format!("HELP_EXHAUSTED:{bot_id}")));
    }
    Ok(())
}

pub async fn delete_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = bots::Entity::delete_many()
        .filter(bots::Column::GameId.eq(game_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
