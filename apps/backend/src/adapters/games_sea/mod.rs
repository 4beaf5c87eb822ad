//! SeaORM adapter for game repository - generic over ConnectionTrait.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use time::OffsetDateTime;
use tracing::error;

use crate::entities::games::{self, GameState, TurnOrder};

pub mod dto;

pub use dto::GameUpdate;

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub fn game_not_found(game_id: i64) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!("GAME_NOT_FOUND:{game_id}"))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id).one(conn).await
}

/// Read the game row under an exclusive lock (`FOR UPDATE` on Postgres).
///
/// SQLite has no row locks; there the surrounding transaction and the
/// state-conditional write in [`update_game`] carry the guarantee.
pub async fn find_by_id_for_update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id)
        .lock_exclusive()
        .one(conn)
        .await
}

pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<games::Model, sea_orm::DbErr> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| game_not_found(game_id))
}

/// Insert a fresh game in `Started` with an empty turn order.
pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let game_active = games::ActiveModel {
        id: NotSet,
        state: Set(GameState::Started),
        turn_order: Set(TurnOrder(Vec::new())),
        current_turn_index: Set(0),
        state_handled: Set(true),
        state_handled_at: Set(Some(now)),
        current_state_total_time: Set(0),
        last_question: Set(None),
        last_question_target_bot_id: Set(None),
        result: Set(None),
        winning_bot_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    game_active.insert(conn).await
}

/// Store the placeholder turn order once the bots exist.
pub async fn set_turn_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    order: Vec<i64>,
) -> Result<games::Model, sea_orm::DbErr> {
    let active = games::ActiveModel {
        id: Set(game_id),
        turn_order: Set(TurnOrder(order)),
        ..Default::default()
    };
    active.update(conn).await
}

/// Write `dto` only if the row is still in `dto.expected_state`, and at the
/// expected turn index and handled flag when the DTO carries them.
///
/// The filter makes a stale write fail even without a row lock, so SQLite
/// pools with several connections stay safe. Zero affected rows on an existing game is a state mismatch; more than one
/// means the primary key no longer identifies a row.
pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();

    let active = games::ActiveModel {
        id: NotSet,
        state: Set(dto.state),
        turn_order: match dto.turn_order {
            Some(order) => Set(order),
            None => NotSet,
        },
        current_turn_index: Set(dto.current_turn_index),
        state_handled: Set(dto.state_handled),
        state_handled_at: Set(Some(now)),
        current_state_total_time: Set(dto.current_state_total_time),
        last_question: Set(dto.last_question),
        last_question_target_bot_id: Set(dto.last_question_target_bot_id),
        result: Set(dto.result),
        winning_bot_id: Set(dto.winning_bot_id),
        created_at: NotSet,
        updated_at: Set(now),
    };

    let mut update = games::Entity::update_many()
        .set(active)
        .filter(games::Column::Id.eq(dto.id))
        .filter(games::Column::State.eq(dto.expected_state));
    if let Some(index) = dto.expected_turn_index {
        update = update.filter(games::Column::CurrentTurnIndex.eq(index));
    }
    if let Some(handled) = dto.expected_handled {
        update = update.filter(games::Column::StateHandled.eq(handled));
    }
    let result = update.exec(conn).await?;

    match result.rows_affected {
        1 => {}
        0 => {
            let current = find_by_id(conn, dto.id).await?;
            return match current {
                Some(game) => Err(sea_orm::DbErr::Custom(format!(
                    "STATE_MISMATCH:{{\"game_id\":{},\"expected\":\"{:?}\",\"actual\":\"{:?}\",\"turn_index\":{},\"handled\":{}}}",
                    dto.id, dto.expected_state, game.state, game.current_turn_index, game.state_handled
                ))),
                None => Err(game_not_found(dto.id)),
            };
        }
        n => {
            error!(game_id = dto.id, rows = n, "game update touched more than one row");
            return Err(sea_orm::DbErr::Custom(format!(
                "INVARIANT_VIOLATION:game {} update affected {n} rows",
                dto.id
            )));
        }
    }

    require_game(conn, dto.id).await
}

pub async fn delete_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = games::Entity::delete_by_id(game_id).exec(conn).await?;
    Ok(result.rows_affected)
}

/// Ids of games parked in `state` whose system action is still pending.
pub async fn list_unhandled_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    state: GameState,
) -> Result<Vec<i64>, sea_orm::DbErr> {
    games::Entity::find()
        .select_only()
        .column(games::Column::Id)
        .filter(games::Column::State.eq(state))
        .filter(games::Column::StateHandled.eq(false))
        .order_by_asc(games::Column::Id)
        .into_tuple::<i64>()
        .all(conn)
        .await
}

/// Ids of games created at or before `cutoff`, whatever their state.
pub async fn list_created_before<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    cutoff: OffsetDateTime,
) -> Result<Vec<i64>, sea_orm::DbErr> {
    games::Entity::find()
        .select_only()
        .column(games::Column::Id)
        .filter(games::Column::CreatedAt.lte(cutoff))
        .order_by_asc(games::Column::Id)
        .into_tuple::<i64>()
        .all(conn)
        .await
}
