use backend::domain::player_view::ViewPhase;
use backend::domain::GameState;
use backend::errors::domain::{DomainError, NotFoundKind};
use backend::AppError;

use crate::support::factory::{force_game, playing_game, ForceGame};
use crate::support::test_state::TestEnv;

#[tokio::test]
async fn player_sees_their_own_bot_and_no_bot_types() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;
    let (alice, alice_bot) = g.alice;

    env.games
        .send_message(g.game.id, alice, "Dogs or cats?", Some(g.seat(2)))
        .await?;
    let view = env.games.get_game_view(g.game.id, Some(alice)).await?;

    assert_eq!(view.my_bot_id, Some(alice_bot));
    assert_eq!(view.my_help_count, Some(3));
    assert_eq!(view.bots.len(), 5);
    assert_eq!(view.messages.len(), 1);
    assert_eq!(view.phase, ViewPhase::WaitingForAnswer);
    assert_eq!(view.acting_bot_id, Some(g.seat(2)));
    assert_eq!(view.state_time_budget_secs, 45);

    let json = serde_json::to_string(&view).unwrap();
    assert!(!json.contains("bot_type"));
    assert!(!json.contains("HUMAN"));
    assert!(!json.contains("\"AI\""));
    assert!(!json.contains("BOT_ANSWER"));
    Ok(())
}

#[tokio::test]
async fn spectators_get_an_anonymous_view() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;

    let view = env.games.get_game_view(g.game.id, None).await?;
    assert_eq!(view.my_bot_id, None);
    assert_eq!(view.my_help_count, None);
    assert_eq!(view.phase, ViewPhase::WaitingForQuestion);

    let outsider = env.games.get_game_view(g.game.id, Some(424_242)).await?;
    assert_eq!(outsider.my_bot_id, None);
    Ok(())
}

#[tokio::test]
async fn finished_view_carries_the_result() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;
    let (alice, alice_bot) = g.alice;
    env.games.tag(g.game.id, alice, g.seat(4)).await?;

    let view = env.games.get_game_view(g.game.id, Some(alice)).await?;
    assert_eq!(view.phase, ViewPhase::Finished);
    assert_eq!(view.winning_bot_id, Some(alice_bot));
    assert!(view.result.is_some());
    assert_eq!(view.acting_bot_id, None);
    Ok(())
}

#[tokio::test]
async fn bot_and_player_waits_look_the_same() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;

    force_game(
        &env.db,
        g.game.id,
        ForceGame::state(GameState::WaitingForBotQuestion, false).turns(g.order(), 2),
    )
    .await?;
    let view = env.games.get_game_view(g.game.id, None).await?;
    assert_eq!(view.phase, ViewPhase::WaitingForQuestion);
    Ok(())
}

#[tokio::test]
async fn unknown_game_is_not_found() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let err = env.games.get_game_view(77, None).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Game, _)));
    Ok(())
}
