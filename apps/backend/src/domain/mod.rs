//! Domain layer: pure game logic types and helpers.

pub mod game;
pub mod names;
pub mod player_view;
pub mod prompt;
pub mod state;
pub mod tagging;
pub mod text;
pub mod transition;
pub mod turn_order;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_props_turns;

// Re-exports for ergonomics
pub use game::{Bot, BotId, Game, GameId, Message, NewMessage, PlayerId};
pub use player_view::GameView;
pub use state::{BotType, GameState, MessageKind};
pub use tagging::{resolve_tag, TagOutcome};
pub use transition::{advance_after_message, StateChange};
pub use turn_order::{next_question_target, start_turns, SeedSource};
