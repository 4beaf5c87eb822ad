//! Conversions between sea-orm models and domain types.

use crate::domain::{Bot, BotType, Game, GameState, Message, MessageKind};
use crate::entities::bots::BotType as DbBotType;
use crate::entities::games::GameState as DbGameState;
use crate::entities::messages::MessageKind as DbMessageKind;
use crate::entities::{bots, games, messages};
use crate::errors::domain::{DomainError, InfraErrorKind};

impl From<DbGameState> for GameState {
    fn from(state: DbGameState) -> Self {
        match state {
            DbGameState::Started => GameState::Started,
            DbGameState::PlayersJoined => GameState::PlayersJoined,
            DbGameState::WaitingForBotQuestion => GameState::WaitingForBotQuestion,
            DbGameState::WaitingForBotAnswer => GameState::WaitingForBotAnswer,
            DbGameState::WaitingForPlayerQuestion => GameState::WaitingForPlayerQuestion,
            DbGameState::WaitingForPlayerAnswer => GameState::WaitingForPlayerAnswer,
            DbGameState::Finished => GameState::Finished,
        }
    }
}

impl From<GameState> for DbGameState {
    fn from(state: GameState) -> Self {
        match state {
            GameState::Started => DbGameState::Started,
            GameState::PlayersJoined => DbGameState::PlayersJoined,
            GameState::WaitingForBotQuestion => DbGameState::WaitingForBotQuestion,
            GameState::WaitingForBotAnswer => DbGameState::WaitingForBotAnswer,
            GameState::WaitingForPlayerQuestion => DbGameState::WaitingForPlayerQuestion,
            GameState::WaitingForPlayerAnswer => DbGameState::WaitingForPlayerAnswer,
            GameState::Finished => DbGameState::Finished,
        }
    }
}

impl From<DbBotType> for BotType {
    fn from(t: DbBotType) -> Self {
        match t {
            DbBotType::Ai => BotType::Ai,
            DbBotType::Human => BotType::Human,
        }
    }
}

impl From<DbMessageKind> for MessageKind {
    fn from(kind: DbMessageKind) -> Self {
        match kind {
            DbMessageKind::Question => MessageKind::Question,
            DbMessageKind::Answer => MessageKind::Answer,
        }
    }
}

impl From<MessageKind> for DbMessageKind {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Question => DbMessageKind::Question,
            MessageKind::Answer => DbMessageKind::Answer,
        }
    }
}

impl From<messages::Model> for Message {
    fn from(m: messages::Model) -> Self {
        Message {
            id: m.id,
            game_id: m.game_id,
            source_bot_id: m.source_bot_id,
            target_bot_id: m.target_bot_id,
            kind: m.kind.into(),
            text: m.text,
            created_at: m.created_at,
        }
    }
}

fn corrupt(detail: String) -> DomainError {
    DomainError::infra(InfraErrorKind::DataCorruption, detail)
}

pub fn bot_from_model(m: bots::Model) -> Result<Bot, DomainError> {
    let seat = u8::try_from(m.seat)
        .map_err(|_| corrupt(format!("Bot {} has invalid seat {}", m.id, m.seat)))?;
    Ok(Bot {
        id: m.id,
        seat,
        name: m.name,
        bot_type: m.bot_type.into(),
        player_id: m.player_id,
        help_count: m.help_count,
    })
}

/// Build the aggregate from its rows and check its structure.
pub fn game_from_models(game: games::Model, bots: Vec<bots::Model>) -> Result<Game, DomainError> {
    let current_turn_index = usize::try_from(game.current_turn_index).map_err(|_| {
        corrupt(format!(
            "Game {} has negative turn index {}",
            game.id, game.current_turn_index
        ))
    })?;
    let bots = bots
        .into_iter()
        .map(bot_from_model)
        .collect::<Result<Vec<_>, _>>()?;

    let game = Game {
        id: game.id,
        state: game.state.into(),
        turn_order: game.turn_order.0,
        current_turn_index,
        state_handled: game.state_handled,
        state_handled_at: game.state_handled_at,
        current_state_total_time: game.current_state_total_time,
        last_question: game.last_question,
        last_question_target_bot_id: game.last_question_target_bot_id,
        result: game.result,
        winning_bot_id: game.winning_bot_id,
        created_at: game.created_at,
        updated_at: game.updated_at,
        bots,
    };
    game.check_invariants()?;
    Ok(game)
}
