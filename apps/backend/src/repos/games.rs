//! Game repository functions: the transactional storage gateway.
//!
//! Every function returns domain types. Writes that move a game take a
//! `DatabaseTransaction` so callers decide the transaction boundary.

use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::adapters::bots_sea::{self as bots_adapter, BotCreate};
use crate::adapters::games_sea::{self as games_adapter, GameUpdate};
use crate::adapters::messages_sea as messages_adapter;
use crate::domain::game::INITIAL_HELP_COUNT;
use crate::domain::{Game, GameId, GameState, StateChange};
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::repos::convert::game_from_models;

fn not_found(game_id: GameId) -> DomainError {
    DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
}

pub async fn find_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: GameId,
) -> Result<Option<Game>, DomainError> {
    let Some(model) = games_adapter::find_by_id(conn, game_id).await? else {
        return Ok(None);
    };
    let bots = bots_adapter::find_by_game(conn, game_id).await?;
    game_from_models(model, bots).map(Some)
}

/// Find game by ID or return a NotFound error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: GameId,
) -> Result<Game, DomainError> {
    find_game(conn, game_id)
        .await?
        .ok_or_else(|| not_found(game_id))
}

/// Load the game under an exclusive row lock held until `txn` ends.
pub async fn require_game_for_update(
    txn: &DatabaseTransaction,
    game_id: GameId,
) -> Result<Game, DomainError> {
    let model = games_adapter::find_by_id_for_update(txn, game_id)
        .await?
        .ok_or_else(|| not_found(game_id))?;
    let bots = bots_adapter::find_by_game(txn, game_id).await?;
    game_from_models(model, bots)
}

/// Insert a game in `Started` with one AI bot per name, seated in order.
///
/// The placeholder turn order is the bot ids in seat order.
pub async fn create_game_with_bots(
    txn: &DatabaseTransaction,
    names: &[String],
) -> Result<Game, DomainError> {
    if names.is_empty() {
        return Err(DomainError::validation_other("A game needs at least one bot"));
    }

    let game = games_adapter::create_game(txn).await?;
    let mut bots = Vec::with_capacity(names.len());
    for (seat, name) in names.iter().enumerate() {
        let bot = bots_adapter::insert_bot(
            txn,
            BotCreate {
                game_id: game.id,
                seat: seat as i16,
                name: name.clone(),
                help_count: INITIAL_HELP_COUNT,
            },
        )
        .await?;
        bots.push(bot);
    }

    let order = bots.iter().map(|b| b.id).collect();
    let game = games_adapter::set_turn_order(txn, game.id, order).await?;
    debug!(game_id = game.id, bots = bots.len(), "game created");
    game_from_models(game, bots)
}

/// Persist `change`, conditional on the game still being in `change.from`
/// at the same turn index and handled flag.
pub async fn update_game(
    txn: &DatabaseTransaction,
    game_id: GameId,
    change: &StateChange,
) -> Result<(), DomainError> {
    let index = i32::try_from(change.current_turn_index).map_err(|_| {
        DomainError::infra(
            InfraErrorKind::InvariantViolation,
            format!("Turn index {} does not fit storage", change.current_turn_index),
        )
    })?;

    let from_index = i32::try_from(change.from_turn_index).map_err(|_| {
        DomainError::infra(
            InfraErrorKind::InvariantViolation,
            format!("Turn index {} does not fit storage", change.from_turn_index),
        )
    })?;

    let mut dto = GameUpdate::new(game_id, change.from.into(), change.state.into())
        .expecting(from_index, change.from_handled)
        .with_turn_index(index)
        .with_handled(change.state_handled)
        .with_total_time(change.current_state_total_time)
        .with_question(
            change.last_question.clone(),
            change.last_question_target_bot_id,
        )
        .with_result(change.result.clone(), change.winning_bot_id);
    if let Some(order) = &change.turn_order {
        dto = dto.with_turn_order(order.clone());
    }

    games_adapter::update_game(txn, dto).await?;
    debug!(game_id, from = %change.from, to = %change.state, "game state written");
    Ok(())
}

/// Delete a game together with its messages and bots.
pub async fn delete_game(txn: &DatabaseTransaction, game_id: GameId) -> Result<(), DomainError> {
    messages_adapter::delete_by_game(txn, game_id).await?;
    bots_adapter::delete_by_game(txn, game_id).await?;
    let deleted = games_adapter::delete_game(txn, game_id).await?;
    if deleted == 0 {
        return Err(not_found(game_id));
    }
    Ok(())
}

pub async fn list_unhandled_game_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    state: GameState,
) -> Result<Vec<GameId>, DomainError> {
    Ok(games_adapter::list_unhandled_ids(conn, state.into()).await?)
}

/// Ids of games created at least `max_age` ago.
pub async fn list_expired_game_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    max_age: Duration,
) -> Result<Vec<GameId>, DomainError> {
    let cutoff = OffsetDateTime::now_utc() - max_age;
    Ok(games_adapter::list_created_before(conn, cutoff).await?)
}
