//! Game operations exposed to the request layer.
//!
//! Every mutation runs in one transaction that locks the game row first,
//! so a request and a background job never both move the same state.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::ai::{generate_or_canned, TextGenerator};
use crate::db::with_txn;
use crate::domain::game::BOTS_PER_GAME;
use crate::domain::names::pick_bot_names;
use crate::domain::prompt::help_prompt;
use crate::domain::state::BotType;
use crate::domain::text::validate_player_text;
use crate::domain::transition::quorum_change;
use crate::domain::turn_order::next_question_target;
use crate::domain::{
    advance_after_message, resolve_tag, BotId, Game, GameId, GameState, GameView, Message,
    MessageKind, NewMessage, PlayerId, TagOutcome,
};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::{bots, games, messages, players};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined { bot_id: BotId },
    /// The player already plays this bot; nothing changed.
    AlreadyJoined { bot_id: BotId },
}

impl JoinOutcome {
    pub fn bot_id(&self) -> BotId {
        match self {
            JoinOutcome::Joined { bot_id } | JoinOutcome::AlreadyJoined { bot_id } => *bot_id,
        }
    }
}

/// Suggested text returned by [`GameService::request_help`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSuggestion {
    pub kind: MessageKind,
    pub text: String,
    pub help_remaining: i32,
}

#[derive(Clone)]
pub struct GameService {
    db: DatabaseConnection,
    ai: Arc<dyn TextGenerator>,
}

fn not_a_member(game_id: GameId, player_id: PlayerId) -> DomainError {
    DomainError::conflict(
        ConflictKind::NotAMember,
        format!("Player {player_id} has no bot in game {game_id}"),
    )
}

impl GameService {
    pub fn new(db: DatabaseConnection, ai: Arc<dyn TextGenerator>) -> Self {
        Self { db, ai }
    }

    /// New game in `Started` with five AI bots.
    pub async fn create_game(&self) -> Result<Game, DomainError> {
        let names = pick_bot_names(&mut rand::rng(), BOTS_PER_GAME);
        let game = with_txn(&self.db, move |txn| {
            Box::pin(async move { games::create_game_with_bots(txn, &names).await })
        })
        .await?;
        info!(game_id = game.id, "game created");
        Ok(game)
    }

    /// Bind the player to the lowest-seat AI bot.
    ///
    /// Joining twice returns the bot already held, in any state. The join that
    /// reaches the human quorum also moves the game to `PlayersJoined`.
    pub async fn join_game(
        &self,
        game_id: GameId,
        player_id: PlayerId,
    ) -> Result<JoinOutcome, DomainError> {
        let outcome = with_txn(&self.db, move |txn| {
            Box::pin(async move {
                let mut game = games::require_game_for_update(txn, game_id).await?;
                if let Some(bot) = game.bot_for_player(player_id) {
                    return Ok(JoinOutcome::AlreadyJoined { bot_id: bot.id });
                }
                match game.state {
                    GameState::Started => {}
                    GameState::Finished => {
                        return Err(DomainError::conflict(
                            ConflictKind::GameFinished,
                            format!("Game {game_id} is finished"),
                        ))
                    }
                    other => {
                        return Err(DomainError::conflict(
                            ConflictKind::StateMismatch,
                            format!("Game {game_id} is no longer recruiting ({other})"),
                        ))
                    }
                }
                players::require_player(txn, player_id).await?;

                let bot_id = game
                    .first_ai_bot()
                    .map(|b| b.id)
                    .ok_or_else(|| {
                        DomainError::conflict(
                            ConflictKind::NoFreeSeat,
                            format!("Game {game_id} has no AI bot left to claim"),
                        )
                    })?;
                bots::claim_ai_bot(txn, bot_id, player_id).await?;
                if let Some(bot) = game.bots.iter_mut().find(|b| b.id == bot_id) {
                    bot.bot_type = BotType::Human;
                    bot.player_id = Some(player_id);
                }

                if let Some(change) = quorum_change(&game) {
                    games::update_game(txn, game_id, &change).await?;
                }
                Ok(JoinOutcome::Joined { bot_id })
            })
        })
        .await?;

        if let JoinOutcome::Joined { bot_id } = outcome {
            info!(game_id, player_id, bot_id, "player joined");
        }
        Ok(outcome)
    }

    /// The player's bot accuses `accused_bot_id` of being an AI.
    pub async fn tag(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        accused_bot_id: BotId,
    ) -> Result<TagOutcome, DomainError> {
        let outcome = with_txn(&self.db, move |txn| {
            Box::pin(async move {
                let game = games::require_game_for_update(txn, game_id).await?;
                let tagger = game
                    .bot_for_player(player_id)
                    .map(|b| b.id)
                    .ok_or_else(|| not_a_member(game_id, player_id))?;
                let outcome = resolve_tag(&game, tagger, accused_bot_id)?;
                games::update_game(txn, game_id, &outcome.change).await?;
                Ok(outcome)
            })
        })
        .await?;
        info!(
            game_id,
            winning_bot_id = outcome.winning_bot_id,
            tagger_won = outcome.tagger_won,
            "game finished by tag"
        );
        Ok(outcome)
    }

    /// Post the player's question or answer.
    ///
    /// In an answer state the text answers the pending question. Otherwise it
    /// is a question to `target_bot_id`, or to the next bot in rotation when
    /// no target is given.
    pub async fn send_message(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        text: &str,
        target_bot_id: Option<BotId>,
    ) -> Result<Message, DomainError> {
        let text = validate_player_text(text)?;
        with_txn(&self.db, move |txn| {
            Box::pin(async move {
                let game = games::require_game_for_update(txn, game_id).await?;
                let source = game
                    .bot_for_player(player_id)
                    .map(|b| b.id)
                    .ok_or_else(|| not_a_member(game_id, player_id))?;

                let message = if game.state.is_answer_state() {
                    NewMessage::answer(source, text)
                } else {
                    let target = match target_bot_id {
                        Some(target) => target,
                        None if game.state.is_question_state() => {
                            let asked = messages::count_questions_from(txn, game_id, source).await?;
                            next_question_target(&game, source, asked)?
                        }
                        None => source,
                    };
                    NewMessage::question(source, target, text)
                };

                let change = advance_after_message(&game, &message)?;
                games::update_game(txn, game_id, &change).await?;
                messages::append_message(txn, game_id, &message).await
            })
        })
        .await
    }

    /// What `viewer` may see of the game; `None` views as a spectator.
    pub async fn get_game_view(
        &self,
        game_id: GameId,
        viewer: Option<PlayerId>,
    ) -> Result<GameView, DomainError> {
        let game = games::require_game(&self.db, game_id).await?;
        let history = messages::list_messages(&self.db, game_id).await?;
        Ok(GameView::build(&game, &history, viewer))
    }

    /// Spend one hint on a suggested question or answer for the player's turn.
    pub async fn request_help(
        &self,
        game_id: GameId,
        player_id: PlayerId,
    ) -> Result<HelpSuggestion, DomainError> {
        let (kind, remaining, prompt) = with_txn(&self.db, move |txn| {
            Box::pin(async move {
                let game = games::require_game_for_update(txn, game_id).await?;
                let bot = game
                    .bot_for_player(player_id)
                    .ok_or_else(|| not_a_member(game_id, player_id))?;
                if game.state == GameState::Finished {
                    return Err(DomainError::conflict(
                        ConflictKind::GameFinished,
                        format!("Game {game_id} is finished"),
                    ));
                }
                if game.acting_bot_id()? != Some(bot.id) {
                    return Err(DomainError::conflict(
                        ConflictKind::OutOfTurn,
                        format!("Bot {} is not due to act", bot.id),
                    ));
                }
                if bot.help_count <= 0 {
                    return Err(DomainError::conflict(
                        ConflictKind::HelpExhausted,
                        format!("Bot {} has no help left", bot.id),
                    ));
                }

                bots::decrement_help(txn, bot.id).await?;
                let kind = if game.state.is_answer_state() {
                    MessageKind::Answer
                } else {
                    MessageKind::Question
                };
                let history = messages::list_messages(txn, game_id).await?;
                let prompt = help_prompt(&game, bot, kind, &history);
                Ok((kind, bot.help_count - 1, prompt))
            })
        })
        .await?;

        let text = generate_or_canned(self.ai.as_ref(), &prompt, kind).await;
        Ok(HelpSuggestion {
            kind,
            text,
            help_remaining: remaining,
        })
    }
}
