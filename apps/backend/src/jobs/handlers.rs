//! One handler per [`JobKind`].
//!
//! Each handler locks the game, requires the exact state it was scheduled
//! for with `state_handled = false`, and writes at most one transition.
//! Jobs that call the text generator do so between two transactions: the
//! first reads what the prompt needs, the second re-checks the
//! precondition before writing, so no row lock is held across the call.

use std::time::Duration;

use rand::Rng;
use time::OffsetDateTime;
use tracing::debug;

use super::context::JobContext;
use super::queue::{Job, JobKind};
use crate::ai::generate_or_canned;
use crate::config::app::PacingConfig;
use crate::db::with_txn;
use crate::domain::prompt::{answer_prompt, question_prompt};
use crate::domain::turn_order::{next_question_target, start_turns};
use crate::domain::{
    advance_after_message, BotId, Game, GameId, GameState, MessageKind, NewMessage,
};
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::repos::{games, messages};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The game moved to this state.
    Advanced(GameState),
    Deleted,
}

/// Run one job to completion.
pub async fn run_job(ctx: &JobContext, job: Job) -> Result<JobOutcome, DomainError> {
    debug!(job = %job.kind, game_id = job.game_id, "job started");
    match job.kind {
        JobKind::StartAfterJoin => start_after_join(ctx, job.game_id).await,
        JobKind::AskAsAi => ask_as_ai(ctx, job.game_id).await,
        JobKind::AnswerAsAi => answer_as_ai(ctx, job.game_id).await,
        JobKind::DeleteExpired => delete_expired(ctx, job.game_id).await,
    }
}

/// The game must be in `expected` and still waiting for the system.
pub(crate) fn require_pending(game: &Game, expected: GameState) -> Result<(), DomainError> {
    if game.state != expected {
        return Err(DomainError::conflict(
            ConflictKind::StateMismatch,
            format!("Game {} is {}, expected {expected}", game.id, game.state),
        ));
    }
    if game.state_handled {
        return Err(DomainError::conflict(
            ConflictKind::AlreadyHandled,
            format!("Game {} state {expected} already handled", game.id),
        ));
    }
    Ok(())
}

async fn start_after_join(ctx: &JobContext, game_id: GameId) -> Result<JobOutcome, DomainError> {
    let seeds = ctx.seeds;
    let state = with_txn(&ctx.db, move |txn| {
        Box::pin(async move {
            let game = games::require_game_for_update(txn, game_id).await?;
            require_pending(&game, GameState::PlayersJoined)?;

            let mut rng = seeds.rng_for_game(game_id);
            let change = start_turns(&game, &mut rng)?;
            games::update_game(txn, game_id, &change).await?;
            Ok(change.state)
        })
    })
    .await?;
    Ok(JobOutcome::Advanced(state))
}

async fn ask_as_ai(ctx: &JobContext, game_id: GameId) -> Result<JobOutcome, DomainError> {
    let (source, target, prompt) = with_txn(&ctx.db, move |txn| {
        Box::pin(async move {
            let game = games::require_game_for_update(txn, game_id).await?;
            require_pending(&game, GameState::WaitingForBotQuestion)?;

            let source = game.turn_bot_id()?;
            let asked = messages::count_questions_from(txn, game_id, source).await?;
            let target = next_question_target(&game, source, asked)?;
            let history = messages::list_messages(txn, game_id).await?;
            let prompt = question_prompt(&game, game.bot(source)?, game.bot(target)?, &history);
            Ok((source, target, prompt))
        })
    })
    .await?;

    let text = generate_or_canned(ctx.ai.as_ref(), &prompt, MessageKind::Question).await;
    pace(&ctx.pacing).await;

    let message = NewMessage::question(source, target, text);
    commit_message(ctx, game_id, GameState::WaitingForBotQuestion, source, message).await
}

async fn answer_as_ai(ctx: &JobContext, game_id: GameId) -> Result<JobOutcome, DomainError> {
    let (bot, prompt) = with_txn(&ctx.db, move |txn| {
        Box::pin(async move {
            let game = games::require_game_for_update(txn, game_id).await?;
            require_pending(&game, GameState::WaitingForBotAnswer)?;

            let (Some(bot), Some(question)) = (
                game.last_question_target_bot_id,
                game.last_question.as_deref(),
            ) else {
                return Err(DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("Game {game_id} awaits an answer but has no pending question"),
                ));
            };
            let history = messages::list_messages(txn, game_id).await?;
            let prompt = answer_prompt(&game, game.bot(bot)?, question, &history);
            Ok((bot, prompt))
        })
    })
    .await?;

    let text = generate_or_canned(ctx.ai.as_ref(), &prompt, MessageKind::Answer).await;
    pace(&ctx.pacing).await;

    let message = NewMessage::answer(bot, text);
    commit_message(ctx, game_id, GameState::WaitingForBotAnswer, bot, message).await
}

/// Second half of an AI turn: re-check, advance, append.
async fn commit_message(
    ctx: &JobContext,
    game_id: GameId,
    expected: GameState,
    actor: BotId,
    message: NewMessage,
) -> Result<JobOutcome, DomainError> {
    let state = with_txn(&ctx.db, move |txn| {
        Box::pin(async move {
            let game = games::require_game_for_update(txn, game_id).await?;
            require_pending(&game, expected)?;
            if game.acting_bot_id()? != Some(actor) {
                return Err(DomainError::conflict(
                    ConflictKind::StateMismatch,
                    format!("Bot {actor} is no longer due to act in game {game_id}"),
                ));
            }

            let change = advance_after_message(&game, &message)?;
            games::update_game(txn, game_id, &change).await?;
            messages::append_message(txn, game_id, &message).await?;
            Ok(change.state)
        })
    })
    .await?;
    Ok(JobOutcome::Advanced(state))
}

async fn delete_expired(ctx: &JobContext, game_id: GameId) -> Result<JobOutcome, DomainError> {
    let expiry = ctx.expiry;
    with_txn(&ctx.db, move |txn| {
        Box::pin(async move {
            let game = games::require_game_for_update(txn, game_id).await?;
            let now = OffsetDateTime::now_utc();
            if game.created_at > now - expiry.max_age {
                return Err(DomainError::conflict(
                    ConflictKind::Other("NotExpired".into()),
                    format!("Game {game_id} is younger than the maximum age"),
                ));
            }
            if game.updated_at > now - expiry.idle_grace {
                return Err(DomainError::conflict(
                    ConflictKind::Other("RecentlyActive".into()),
                    format!("Game {game_id} was updated within the idle grace period"),
                ));
            }
            games::delete_game(txn, game_id).await
        })
    })
    .await?;
    Ok(JobOutcome::Deleted)
}

/// Random delay within the pacing window.
fn pacing_delay(pacing: &PacingConfig) -> Duration {
    if pacing.max <= pacing.min {
        return pacing.min;
    }
    let min = pacing.min.as_millis() as u64;
    let max = pacing.max.as_millis() as u64;
    Duration::from_millis(rand::rng().random_range(min..=max))
}

async fn pace(pacing: &PacingConfig) {
    let delay = pacing_delay(pacing);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
