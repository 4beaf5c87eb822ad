//! Pure state transitions computed from a loaded game.
//!
//! Nothing here touches storage. Callers persist a [`StateChange`] with a
//! write that is conditional on `from`.

use crate::domain::game::{BotId, Game, NewMessage, HUMAN_QUORUM};
use crate::domain::state::{GameState, MessageKind};
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

/// Full description of the game row after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// State the game must still be in when the change is written.
    pub from: GameState,
    /// Turn index and handled flag the row must still carry.
    pub from_turn_index: usize,
    pub from_handled: bool,
    pub state: GameState,
    pub current_turn_index: usize,
    /// New turn order, only when it was reshuffled.
    pub turn_order: Option<Vec<BotId>>,
    pub state_handled: bool,
    pub current_state_total_time: i32,
    pub last_question: Option<String>,
    pub last_question_target_bot_id: Option<BotId>,
    pub result: Option<String>,
    pub winning_bot_id: Option<BotId>,
}

impl StateChange {
    /// Enter `state` at `index` with no pending question.
    ///
    /// `state_handled` is derived from the new state: whoever moves the game
    /// on has handled the old state, and the new one is open for the
    /// reconciler only if it needs a system action.
    pub fn enter(game: &Game, state: GameState, current_turn_index: usize) -> Self {
        Self {
            from: game.state,
            from_turn_index: game.current_turn_index,
            from_handled: game.state_handled,
            state,
            current_turn_index,
            turn_order: None,
            state_handled: !state.needs_system_action(),
            current_state_total_time: state.time_budget_secs(),
            last_question: None,
            last_question_target_bot_id: None,
            result: None,
            winning_bot_id: None,
        }
    }

    pub fn with_turn_order(mut self, order: Vec<BotId>) -> Self {
        self.turn_order = Some(order);
        self
    }

    pub fn with_question(mut self, text: impl Into<String>, target: BotId) -> Self {
        self.last_question = Some(text.into());
        self.last_question_target_bot_id = Some(target);
        self
    }

    pub fn with_result(mut self, narrative: impl Into<String>, winner: BotId) -> Self {
        self.result = Some(narrative.into());
        self.winning_bot_id = Some(winner);
        self
    }

    /// Apply to an in-memory game; timestamps are left to storage.
    pub fn apply_to(&self, game: &mut Game) {
        game.state = self.state;
        game.current_turn_index = self.current_turn_index;
        if let Some(order) = &self.turn_order {
            game.turn_order = order.clone();
        }
        game.state_handled = self.state_handled;
        game.current_state_total_time = self.current_state_total_time;
        game.last_question = self.last_question.clone();
        game.last_question_target_bot_id = self.last_question_target_bot_id;
        game.result = self.result.clone();
        game.winning_bot_id = self.winning_bot_id;
    }
}

/// Reject states in which no bot may speak.
fn require_turn_state(game: &Game) -> Result<(), DomainError> {
    match game.state {
        GameState::Finished => Err(DomainError::conflict(
            ConflictKind::GameFinished,
            format!("Game {} is finished", game.id),
        )),
        GameState::Started | GameState::PlayersJoined => Err(DomainError::conflict(
            ConflictKind::StateMismatch,
            format!("Game {} has not started its turns ({})", game.id, game.state),
        )),
        _ => Ok(()),
    }
}

/// Compute the transition caused by recording `message`.
///
/// A question hands the move to its target without moving the turn index;
/// an answer passes the turn to the next bot in order.
pub fn advance_after_message(game: &Game, message: &NewMessage) -> Result<StateChange, DomainError> {
    require_turn_state(game)?;
    let source = game.bot(message.source_bot_id)?;
    let target = game.bot(message.target_bot_id)?;

    match message.kind {
        MessageKind::Question => {
            if !game.state.is_question_state() {
                return Err(DomainError::conflict(
                    ConflictKind::KindMismatch,
                    format!("Game {} is waiting for an answer, not a question", game.id),
                ));
            }
            if source.id != game.turn_bot_id()? {
                return Err(DomainError::conflict(
                    ConflictKind::OutOfTurn,
                    format!("Bot {} is not due to ask", source.id),
                ));
            }
            if source.id == target.id {
                return Err(DomainError::validation(
                    ValidationKind::SelfTarget,
                    "A bot cannot question itself",
                ));
            }
            let state = GameState::answer_for(target.bot_type);
            Ok(StateChange::enter(game, state, game.current_turn_index)
                .with_question(message.text.clone(), target.id))
        }
        MessageKind::Answer => {
            if !game.state.is_answer_state() {
                return Err(DomainError::conflict(
                    ConflictKind::KindMismatch,
                    format!("Game {} is waiting for a question, not an answer", game.id),
                ));
            }
            if source.id != target.id {
                return Err(DomainError::validation_other(
                    "An answer must be addressed to its author",
                ));
            }
            if game.last_question_target_bot_id != Some(source.id) {
                return Err(DomainError::conflict(
                    ConflictKind::OutOfTurn,
                    format!("Bot {} was not asked the pending question", source.id),
                ));
            }
            let next_index = next_turn_index(game.current_turn_index, game.turn_order.len());
            let next_bot = game.bot(game.turn_order[next_index])?;
            let state = GameState::question_for(next_bot.bot_type);
            Ok(StateChange::enter(game, state, next_index))
        }
    }
}

/// Index after `current`, wrapping at `len`.
pub fn next_turn_index(current: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (current + 1) % len
    }
}

/// `Started -> PlayersJoined` once the quorum has joined, otherwise `None`.
pub fn quorum_change(game: &Game) -> Option<StateChange> {
    (game.state == GameState::Started && game.human_count() >= HUMAN_QUORUM)
        .then(|| StateChange::enter(game, GameState::PlayersJoined, 0))
}
