//! Turn order: the shuffle that opens play and question targeting.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::game::{BotId, Game, GameId};
use crate::domain::state::GameState;
use crate::domain::transition::StateChange;
use crate::errors::domain::{ConflictKind, DomainError};

/// Where shuffle randomness comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedSource {
    #[default]
    Entropy,
    /// Base seed mixed with the game id; used by tests.
    Fixed(u64),
}

impl SeedSource {
    /// RNG for shuffling one game's turn order.
    pub fn rng_for_game(&self, game_id: GameId) -> ChaCha8Rng {
        match self {
            SeedSource::Entropy => ChaCha8Rng::from_os_rng(),
            SeedSource::Fixed(base) => ChaCha8Rng::seed_from_u64(derive_shuffle_seed(*base, game_id)),
        }
    }
}

/// Deterministic per-game seed from a base seed.
pub fn derive_shuffle_seed(base: u64, game_id: GameId) -> u64 {
    base.wrapping_add((game_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(3)
}

/// Fisher-Yates shuffle of the bot ids.
pub fn shuffle_bot_ids<R: Rng + ?Sized>(bot_ids: &[BotId], rng: &mut R) -> Vec<BotId> {
    let mut order = bot_ids.to_vec();
    for i in (1..order.len()).rev() {
        let j = rng.random_range(0..=i);
        order.swap(i, j);
    }
    order
}

/// Shuffle the turn order and open the first question state.
///
/// Only valid from `PlayersJoined`.
pub fn start_turns<R: Rng + ?Sized>(game: &Game, rng: &mut R) -> Result<StateChange, DomainError> {
    if game.state != GameState::PlayersJoined {
        return Err(DomainError::conflict(
            ConflictKind::StateMismatch,
            format!("Game {} cannot start turns from {}", game.id, game.state),
        ));
    }

    let bot_ids: Vec<BotId> = game.bots.iter().map(|b| b.id).collect();
    let order = shuffle_bot_ids(&bot_ids, rng);
    let first = game.bot(order[0])?;
    let state = GameState::question_for(first.bot_type);

    Ok(StateChange::enter(game, state, 0).with_turn_order(order))
}

/// Target for the next question asked by `source`.
///
/// Rotates over the other bots in turn order starting after `source`, so a
/// bot that has asked `asked_count` questions addresses the
/// `asked_count % (n - 1)`-th of them.
pub fn next_question_target(
    game: &Game,
    source: BotId,
    asked_count: u64,
) -> Result<BotId, DomainError> {
    game.bot(source)?;
    let len = game.turn_order.len();
    let pos = game
        .turn_order
        .iter()
        .position(|id| *id == source)
        .ok_or_else(|| {
            DomainError::validation_other(format!("Bot {source} missing from turn order"))
        })?;

    let others: Vec<BotId> = (1..len).map(|k| game.turn_order[(pos + k) % len]).collect();
    if others.is_empty() {
        return Err(DomainError::validation_other("No other bot to question"));
    }
    Ok(others[(asked_count % others.len() as u64) as usize])
}
