//! Player view of a game: what one player is entitled to see.
//!
//! Bot types never leave the server. The phase collapses the AI/human
//! variants of the waiting states so the view cannot leak who is an AI.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::game::{BotId, Game, GameId, Message, PlayerId};
use crate::domain::state::{GameState, MessageKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewPhase {
    Started,
    PlayersJoined,
    WaitingForQuestion,
    WaitingForAnswer,
    Finished,
}

impl From<GameState> for ViewPhase {
    fn from(state: GameState) -> Self {
        match state {
            GameState::Started => ViewPhase::Started,
            GameState::PlayersJoined => ViewPhase::PlayersJoined,
            GameState::WaitingForBotQuestion | GameState::WaitingForPlayerQuestion => {
                ViewPhase::WaitingForQuestion
            }
            GameState::WaitingForBotAnswer | GameState::WaitingForPlayerAnswer => {
                ViewPhase::WaitingForAnswer
            }
            GameState::Finished => ViewPhase::Finished,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotView {
    pub id: BotId,
    pub seat: u8,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub source_bot_id: BotId,
    pub target_bot_id: BotId,
    pub kind: &'static str,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Message> for MessageView {
    fn from(m: &Message) -> Self {
        MessageView {
            id: m.id,
            source_bot_id: m.source_bot_id,
            target_bot_id: m.target_bot_id,
            kind: match m.kind {
                MessageKind::Question => "QUESTION",
                MessageKind::Answer => "ANSWER",
            },
            text: m.text.clone(),
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub game_id: GameId,
    pub phase: ViewPhase,
    /// The viewer's bot; `None` for spectators.
    pub my_bot_id: Option<BotId>,
    pub my_help_count: Option<i32>,
    pub bots: Vec<BotView>,
    pub turn_order: Vec<BotId>,
    /// Bot the game is waiting on, if any.
    pub acting_bot_id: Option<BotId>,
    pub last_question: Option<String>,
    pub last_question_target_bot_id: Option<BotId>,
    pub messages: Vec<MessageView>,
    pub result: Option<String>,
    pub winning_bot_id: Option<BotId>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub state_started_at: Option<OffsetDateTime>,
    pub state_time_budget_secs: i32,
}

impl GameView {
    pub fn build(game: &Game, messages: &[Message], viewer: Option<PlayerId>) -> Self {
        let my_bot = viewer.and_then(|player| game.bot_for_player(player));
        // A view is best-effort on malformed rows; storage already rejects them on load.
        let acting_bot_id = game.acting_bot_id().ok().flatten();

        GameView {
            game_id: game.id,
            phase: game.state.into(),
            my_bot_id: my_bot.map(|b| b.id),
            my_help_count: my_bot.map(|b| b.help_count),
            bots: game
                .bots
                .iter()
                .map(|b| BotView {
                    id: b.id,
                    seat: b.seat,
                    name: b.name.clone(),
                })
                .collect(),
            turn_order: game.turn_order.clone(),
            acting_bot_id,
            last_question: game.last_question.clone(),
            last_question_target_bot_id: game.last_question_target_bot_id,
            messages: messages.iter().map(MessageView::from).collect(),
            result: game.result.clone(),
            winning_bot_id: game.winning_bot_id,
            state_started_at: game.state_handled_at,
            state_time_budget_secs: game.current_state_total_time,
        }
    }
}
