use backend::domain::{BotId, Game, GameId, GameState, PlayerId};
use backend::entities::games;
use backend::repos::games as games_repo;
use backend::AppError;
use backend_test_support::unique_helpers::unique_display_name;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use time::OffsetDateTime;

use super::test_state::TestEnv;

pub async fn create_player(env: &TestEnv, prefix: &str) -> Result<PlayerId, AppError> {
    let player = env
        .players
        .create_player(&unique_display_name(prefix))
        .await?;
    Ok(player.id)
}

/// A game with `humans` players joined, returned as stored.
pub async fn game_with_humans(
    env: &TestEnv,
    humans: usize,
) -> Result<(Game, Vec<(PlayerId, BotId)>), AppError> {
    let game = env.games.create_game().await?;
    let mut seats = Vec::with_capacity(humans);
    for i in 0..humans {
        let player_id = create_player(env, &format!("p{i}")).await?;
        let outcome = env.games.join_game(game.id, player_id).await?;
        seats.push((player_id, outcome.bot_id()));
    }
    let game = games_repo::require_game(&env.db, game.id).await?;
    Ok((game, seats))
}

pub async fn load_game(db: &DatabaseConnection, game_id: GameId) -> Result<Game, AppError> {
    Ok(games_repo::require_game(db, game_id).await?)
}

/// Row edits applied directly, for arranging a scenario.
#[derive(Debug, Clone, Default)]
pub struct ForceGame {
    pub state: Option<GameState>,
    pub turn_order: Option<Vec<BotId>>,
    pub current_turn_index: Option<i32>,
    pub state_handled: Option<bool>,
    pub question: Option<(String, BotId)>,
}

impl ForceGame {
    pub fn state(state: GameState, handled: bool) -> Self {
        Self {
            state: Some(state),
            state_handled: Some(handled),
            ..Self::default()
        }
    }

    pub fn turns(mut self, order: Vec<BotId>, index: i32) -> Self {
        self.turn_order = Some(order);
        self.current_turn_index = Some(index);
        self
    }

    pub fn question(mut self, text: &str, target: BotId) -> Self {
        self.question = Some((text.to_string(), target));
        self
    }
}

pub async fn force_game(
    db: &DatabaseConnection,
    game_id: GameId,
    edit: ForceGame,
) -> Result<(), AppError> {
    let model = games::Entity::find_by_id(game_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::db(format!("game {game_id} missing")))?;
    let mut active: games::ActiveModel = model.into();
    if let Some(state) = edit.state {
        active.state = Set(state.into());
    }
    if let Some(order) = edit.turn_order {
        active.turn_order = Set(games::TurnOrder(order));
    }
    if let Some(index) = edit.current_turn_index {
        active.current_turn_index = Set(index);
    }
    if let Some(handled) = edit.state_handled {
        active.state_handled = Set(handled);
    }
    if let Some((text, target)) = edit.question {
        active.last_question = Set(Some(text));
        active.last_question_target_bot_id = Set(Some(target));
    }
    active.update(db).await?;
    Ok(())
}

/// Move `created_at` and `updated_at` into the past.
pub async fn backdate(
    db: &DatabaseConnection,
    game_id: GameId,
    created_ago: time::Duration,
    updated_ago: time::Duration,
) -> Result<(), AppError> {
    let now = OffsetDateTime::now_utc();
    let active = games::ActiveModel {
        id: Set(game_id),
        created_at: Set(now - created_ago),
        updated_at: Set(now - updated_ago),
        ..Default::default()
    };
    active.update(db).await?;
    Ok(())
}

/// Two humans in seats 0 and 1, turns in seat order, seat 0 due to ask.
pub struct PlayingGame {
    pub game: Game,
    pub alice: (PlayerId, BotId),
    pub bob: (PlayerId, BotId),
}

impl PlayingGame {
    /// Bot id in `seat`.
    pub fn seat(&self, seat: usize) -> BotId {
        self.game.bots[seat].id
    }

    pub fn order(&self) -> Vec<BotId> {
        self.game.bots.iter().map(|b| b.id).collect()
    }
}

pub async fn playing_game(env: &TestEnv) -> Result<PlayingGame, AppError> {
    let (game, seats) = game_with_humans(env, 2).await?;
    let order: Vec<BotId> = game.bots.iter().map(|b| b.id).collect();
    force_game(
        &env.db,
        game.id,
        ForceGame::state(GameState::WaitingForPlayerQuestion, true).turns(order, 0),
    )
    .await?;
    Ok(PlayingGame {
        game: load_game(&env.db, game.id).await?,
        alice: seats[0],
        bob: seats[1],
    })
}
