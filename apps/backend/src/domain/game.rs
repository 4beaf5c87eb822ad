//! The game aggregate: one game row plus its five bots.

use std::collections::HashSet;

use time::OffsetDateTime;

use crate::domain::state::{BotType, GameState, MessageKind};
use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};

pub type GameId = i64;
pub type BotId = i64;
pub type PlayerId = i64;

/// Bots created with every game.
pub const BOTS_PER_GAME: usize = 5;
/// Humans needed before the game leaves `Started`.
pub const HUMAN_QUORUM: usize = 2;
/// Hints each bot may request.
pub const INITIAL_HELP_COUNT: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bot {
    pub id: BotId,
    pub seat: u8,
    pub name: String,
    pub bot_type: BotType,
    pub player_id: Option<PlayerId>,
    pub help_count: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub state: GameState,
    pub turn_order: Vec<BotId>,
    pub current_turn_index: usize,
    pub state_handled: bool,
    pub state_handled_at: Option<OffsetDateTime>,
    pub current_state_total_time: i32,
    pub last_question: Option<String>,
    pub last_question_target_bot_id: Option<BotId>,
    pub result: Option<String>,
    pub winning_bot_id: Option<BotId>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    /// Ordered by seat.
    pub bots: Vec<Bot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: i64,
    pub game_id: GameId,
    pub source_bot_id: BotId,
    pub target_bot_id: BotId,
    pub kind: MessageKind,
    pub text: String,
    pub created_at: OffsetDateTime,
}

/// A message about to be recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub source_bot_id: BotId,
    pub target_bot_id: BotId,
    pub kind: MessageKind,
    pub text: String,
}

impl NewMessage {
    pub fn question(source: BotId, target: BotId, text: impl Into<String>) -> Self {
        Self {
            source_bot_id: source,
            target_bot_id: target,
            kind: MessageKind::Question,
            text: text.into(),
        }
    }

    /// Answers are addressed to the answering bot itself.
    pub fn answer(bot: BotId, text: impl Into<String>) -> Self {
        Self {
            source_bot_id: bot,
            target_bot_id: bot,
            kind: MessageKind::Answer,
            text: text.into(),
        }
    }
}

impl Game {
    pub fn find_bot(&self, bot_id: BotId) -> Option<&Bot> {
        self.bots.iter().find(|b| b.id == bot_id)
    }

    /// Resolve a bot id against this game's bots.
    pub fn bot(&self, bot_id: BotId) -> Result<&Bot, DomainError> {
        self.find_bot(bot_id).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::UnknownBot,
                format!("Bot {bot_id} is not part of game {}", self.id),
            )
        })
    }

    pub fn bot_for_player(&self, player_id: PlayerId) -> Option<&Bot> {
        self.bots.iter().find(|b| b.player_id == Some(player_id))
    }

    pub fn human_count(&self) -> usize {
        self.bots
            .iter()
            .filter(|b| b.bot_type == BotType::Human)
            .count()
    }

    /// Lowest-seat bot still driven by the AI.
    pub fn first_ai_bot(&self) -> Option<&Bot> {
        self.bots
            .iter()
            .filter(|b| b.bot_type == BotType::Ai)
            .min_by_key(|b| b.seat)
    }

    /// Bot at `current_turn_index`.
    pub fn turn_bot_id(&self) -> Result<BotId, DomainError> {
        self.turn_order
            .get(self.current_turn_index)
            .copied()
            .ok_or_else(|| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!(
                        "Game {} turn index {} outside turn order of {}",
                        self.id,
                        self.current_turn_index,
                        self.turn_order.len()
                    ),
                )
            })
    }

    /// The bot whose move the game is waiting for, if any.
    ///
    /// Question states wait on the turn bot, answer states on the pending
    /// question's target.
    pub fn acting_bot_id(&self) -> Result<Option<BotId>, DomainError> {
        if self.state.is_question_state() {
            return self.turn_bot_id().map(Some);
        }
        if self.state.is_answer_state() {
            return self
                .last_question_target_bot_id
                .map(Some)
                .ok_or_else(|| {
                    DomainError::infra(
                        InfraErrorKind::DataCorruption,
                        format!("Game {} awaits an answer but has no question target", self.id),
                    )
                });
        }
        Ok(None)
    }

    /// Structural checks run on every load.
    pub fn check_invariants(&self) -> Result<(), DomainError> {
        let corrupt = |detail: String| DomainError::infra(InfraErrorKind::DataCorruption, detail);

        if self.bots.is_empty() {
            return Err(corrupt(format!("Game {} has no bots", self.id)));
        }
        if self.turn_order.is_empty() {
            return Err(corrupt(format!("Game {} has an empty turn order", self.id)));
        }
        if self.current_turn_index >= self.turn_order.len() {
            return Err(corrupt(format!(
                "Game {} turn index {} out of bounds",
                self.id, self.current_turn_index
            )));
        }

        let bot_ids: HashSet<BotId> = self.bots.iter().map(|b| b.id).collect();
        let order_ids: HashSet<BotId> = self.turn_order.iter().copied().collect();
        if order_ids.len() != self.turn_order.len() || order_ids != bot_ids {
            return Err(corrupt(format!(
                "Game {} turn order is not a permutation of its bots",
                self.id
            )));
        }

        if self.state.is_answer_state() {
            match self.last_question_target_bot_id {
                Some(target) if bot_ids.contains(&target) => {}
                _ => {
                    return Err(corrupt(format!(
                        "Game {} question target missing or foreign",
                        self.id
                    )))
                }
            }
        }
        Ok(())
    }
}
