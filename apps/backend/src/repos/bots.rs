//! Bot repository functions.

use sea_orm::DatabaseTransaction;

use crate::adapters::bots_sea as bots_adapter;
use crate::domain::{BotId, PlayerId};
use crate::errors::domain::DomainError;

/// Turn an AI bot into the player's human bot.
pub async fn claim_ai_bot(
    txn: &DatabaseTransaction,
    bot_id: BotId,
    player_id: PlayerId,
) -> Result<(), DomainError> {
    Ok(bots_adapter::claim_ai_bot(txn, bot_id, player_id).await?)
}

pub async fn decrement_help(txn: &DatabaseTransaction, bot_id: BotId) -> Result<(), DomainError> {
    Ok(bots_adapter::decrement_help(txn, bot_id).await?)
}
