//! Game state machine vocabulary: states, bot types and message kinds.

use std::fmt;
use std::str::FromStr;

use crate::errors::domain::{DomainError, ValidationKind};

/// Seconds a question state gives the acting bot.
pub const QUESTION_TIME_SECS: i32 = 60;
/// Seconds an answer state gives the pending target.
pub const ANSWER_TIME_SECS: i32 = 45;

/// Lifecycle state of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Recruiting human players.
    Started,
    /// Human quorum reached; turn order not yet shuffled.
    PlayersJoined,
    WaitingForBotQuestion,
    WaitingForBotAnswer,
    WaitingForPlayerQuestion,
    WaitingForPlayerAnswer,
    /// Terminal.
    Finished,
}

impl GameState {
    pub const ALL: [GameState; 7] = [
        GameState::Started,
        GameState::PlayersJoined,
        GameState::WaitingForBotQuestion,
        GameState::WaitingForBotAnswer,
        GameState::WaitingForPlayerQuestion,
        GameState::WaitingForPlayerAnswer,
        GameState::Finished,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            GameState::Started => "STARTED",
            GameState::PlayersJoined => "PLAYERS_JOINED",
            GameState::WaitingForBotQuestion => "WAITING_FOR_BOT_QUESTION",
            GameState::WaitingForBotAnswer => "WAITING_FOR_BOT_ANSWER",
            GameState::WaitingForPlayerQuestion => "WAITING_FOR_PLAYER_QUESTION",
            GameState::WaitingForPlayerAnswer => "WAITING_FOR_PLAYER_ANSWER",
            GameState::Finished => "FINISHED",
        }
    }

    /// States the reconciler must act on once entered.
    pub const fn needs_system_action(self) -> bool {
        matches!(
            self,
            GameState::PlayersJoined
                | GameState::WaitingForBotQuestion
                | GameState::WaitingForBotAnswer
        )
    }

    pub const fn is_question_state(self) -> bool {
        matches!(
            self,
            GameState::WaitingForBotQuestion | GameState::WaitingForPlayerQuestion
        )
    }

    pub const fn is_answer_state(self) -> bool {
        matches!(
            self,
            GameState::WaitingForBotAnswer | GameState::WaitingForPlayerAnswer
        )
    }

    /// Question state for a bot of the given type.
    pub const fn question_for(bot_type: BotType) -> Self {
        match bot_type {
            BotType::Ai => GameState::WaitingForBotQuestion,
            BotType::Human => GameState::WaitingForPlayerQuestion,
        }
    }

    /// Answer state for a bot of the given type.
    pub const fn answer_for(bot_type: BotType) -> Self {
        match bot_type {
            BotType::Ai => GameState::WaitingForBotAnswer,
            BotType::Human => GameState::WaitingForPlayerAnswer,
        }
    }

    /// Countdown budget shown to clients while in this state.
    pub const fn time_budget_secs(self) -> i32 {
        if self.is_question_state() {
            QUESTION_TIME_SECS
        } else if self.is_answer_state() {
            ANSWER_TIME_SECS
        } else {
            0
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameState::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::InvalidState,
                    format!("Unknown game state '{s}'"),
                )
            })
    }
}

/// Who drives a bot. AI bots turn Human exactly once, on join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotType {
    Ai,
    Human,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Question,
    Answer,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Question => f.write_str("question"),
            MessageKind::Answer => f.write_str("answer"),
        }
    }
}
