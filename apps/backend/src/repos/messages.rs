//! Message log repository functions.

use sea_orm::{ConnectionTrait, DatabaseTransaction};

use crate::adapters::messages_sea::{self as messages_adapter, MessageCreate};
use crate::domain::{BotId, GameId, Message, NewMessage};
use crate::errors::domain::DomainError;

pub async fn append_message(
    txn: &DatabaseTransaction,
    game_id: GameId,
    message: &NewMessage,
) -> Result<Message, DomainError> {
    let model = messages_adapter::insert_message(
        txn,
        MessageCreate {
            game_id,
            source_bot_id: message.source_bot_id,
            target_bot_id: message.target_bot_id,
            kind: message.kind.into(),
            text: message.text.clone(),
        },
    )
    .await?;
    Ok(model.into())
}

pub async fn list_messages<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: GameId,
) -> Result<Vec<Message>, DomainError> {
    let models = messages_adapter::find_by_game(conn, game_id).await?;
    Ok(models.into_iter().map(Message::from).collect())
}

/// Questions `bot_id` has already asked in this game.
pub async fn count_questions_from<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: GameId,
    bot_id: BotId,
) -> Result<u64, DomainError> {
    Ok(messages_adapter::count_questions_from(conn, game_id, bot_id).await?)
}
