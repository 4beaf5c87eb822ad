//! Tag resolution: the accusation that ends a game.

use crate::domain::game::{BotId, Game};
use crate::domain::state::{BotType, GameState};
use crate::domain::transition::StateChange;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOutcome {
    pub change: StateChange,
    pub winning_bot_id: BotId,
    /// True when the accused really was an AI.
    pub tagger_won: bool,
    pub narrative: String,
}

/// Resolve `tagger` accusing `accused` of being an AI.
///
/// Only the bot the game is waiting on may tag. A correct guess wins for the
/// tagger; accusing a human hands the win to the accused.
pub fn resolve_tag(game: &Game, tagger: BotId, accused: BotId) -> Result<TagOutcome, DomainError> {
    if game.state == GameState::Finished {
        return Err(DomainError::conflict(
            ConflictKind::GameFinished,
            format!("Game {} is already finished", game.id),
        ));
    }

    let Some(acting) = game.acting_bot_id()? else {
        return Err(DomainError::conflict(
            ConflictKind::StateMismatch,
            format!("Game {} has no bot due to act ({})", game.id, game.state),
        ));
    };

    let tagger_bot = game.bot(tagger)?;
    if tagger_bot.id != acting {
        return Err(DomainError::conflict(
            ConflictKind::OutOfTurn,
            format!("Bot {tagger} may only tag on its own turn"),
        ));
    }
    if accused == tagger {
        return Err(DomainError::validation(
            ValidationKind::SelfTarget,
            "A bot cannot tag itself",
        ));
    }
    let accused_bot = game.bot(accused)?;

    let (winner, tagger_won, narrative) = match accused_bot.bot_type {
        BotType::Ai => (
            tagger_bot.id,
            true,
            format!("{} tagged {} and won", tagger_bot.name, accused_bot.name),
        ),
        BotType::Human => (
            accused_bot.id,
            false,
            format!(
                "{} tagged {}, a human, and lost; {} wins",
                tagger_bot.name, accused_bot.name, accused_bot.name
            ),
        ),
    };

    let change = StateChange::enter(game, GameState::Finished, game.current_turn_index)
        .with_result(narrative.clone(), winner);

    Ok(TagOutcome {
        change,
        winning_bot_id: winner,
        tagger_won,
        narrative,
    })
}
