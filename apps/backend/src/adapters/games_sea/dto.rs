//! DTOs for games_sea adapter.

use crate::entities::games::{GameState, TurnOrder};

/// Full replacement of the mutable game columns, written only while the
/// row is still in `expected_state` (and, when set, the expected turn index
/// and handled flag).
#[derive(Debug, Clone, PartialEq)]
pub struct GameUpdate {
    pub id: i64,
    pub expected_state: GameState,
    pub expected_turn_index: Option<i32>,
    pub expected_handled: Option<bool>,
    pub state: GameState,
    /// `None` keeps the stored order.
    pub turn_order: Option<TurnOrder>,
    pub current_turn_index: i32,
    pub state_handled: bool,
    pub current_state_total_time: i32,
    pub last_question: Option<String>,
    pub last_question_target_bot_id: Option<i64>,
    pub result: Option<String>,
    pub winning_bot_id: Option<i64>,
}

impl GameUpdate {
    /// Update that keeps every column but moves `state`.
    pub fn new(id: i64, expected_state: GameState, state: GameState) -> Self {
        Self {
            id,
            expected_state,
            expected_turn_index: None,
            expected_handled: None,
            state,
            turn_order: None,
            current_turn_index: 0,
            state_handled: true,
            current_state_total_time: 0,
            last_question: None,
            last_question_target_bot_id: None,
            result: None,
            winning_bot_id: None,
        }
    }

    /// Also require the stored turn index and handled flag.
    pub fn expecting(mut self, turn_index: i32, handled: bool) -> Self {
        self.expected_turn_index = Some(turn_index);
        self.expected_handled = Some(handled);
        self
    }

    pub fn with_turn_order(mut self, order: Vec<i64>) -> Self {
        self.turn_order = Some(TurnOrder(order));
        self
    }

    pub fn with_turn_index(mut self, index: i32) -> Self {
        self.current_turn_index = index;
        self
    }

    pub fn with_handled(mut self, handled: bool) -> Self {
        self.state_handled = handled;
        self
    }

    pub fn with_total_time(mut self, secs: i32) -> Self {
        self.current_state_total_time = secs;
        self
    }

    pub fn with_question(mut self, text: Option<String>, target: Option<i64>) -> Self {
        self.last_question = text;
        self.last_question_target_bot_id = target;
        self
    }

    pub fn with_result(mut self, result: Option<String>, winner: Option<i64>) -> Self {
        self.result = result;
        self.winning_bot_id = winner;
        self
    }
}
