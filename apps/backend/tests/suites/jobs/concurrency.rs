use backend::db::with_txn;
use backend::domain::{advance_after_message, GameState, NewMessage};
use backend::errors::domain::{ConflictKind, DomainError};
use backend::jobs::{run_job, Job, JobKind};
use backend::repos::{games, messages};
use backend::AppError;

use crate::support::factory::{force_game, load_game, playing_game, ForceGame};
use crate::support::test_state::TestEnv;

#[tokio::test]
async fn racing_jobs_write_one_transition() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;
    force_game(
        &env.db,
        g.game.id,
        ForceGame::state(GameState::WaitingForBotQuestion, false).turns(g.order(), 2),
    )
    .await?;

    let job = Job::new(JobKind::AskAsAi, g.game.id);
    let (a, b) = tokio::join!(run_job(&env.jobs, job), run_job(&env.jobs, job));

    let results = [a, b];
    let ok = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1, "exactly one job may advance the game: {results:?}");
    let err = results.into_iter().find_map(Result::err).unwrap();
    assert!(
        matches!(err, DomainError::Conflict(ConflictKind::StateMismatch, _)),
        "loser sees the moved state: {err:?}"
    );

    assert_eq!(messages::list_messages(&env.db, g.game.id).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn player_message_beats_a_stale_job() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;
    let (alice, _) = g.alice;

    env.games
        .send_message(g.game.id, alice, "Quick question?", Some(g.seat(2)))
        .await?;
    let err = run_job(&env.jobs, Job::new(JobKind::AskAsAi, g.game.id))
        .await
        .unwrap_err();
    assert_eq!(err.conflict_kind(), Some(&ConflictKind::StateMismatch));
    Ok(())
}

#[tokio::test]
async fn write_from_a_stale_turn_index_is_rejected() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;
    let game_id = g.game.id;

    let stale = load_game(&env.db, game_id).await?;
    let change = advance_after_message(
        &stale,
        &NewMessage::question(g.seat(0), g.seat(2), "Still there?"),
    )?;

    // Same state, but the turn has moved on since `stale` was read.
    force_game(
        &env.db,
        game_id,
        ForceGame::state(GameState::WaitingForPlayerQuestion, true).turns(g.order(), 1),
    )
    .await?;
    let moved = load_game(&env.db, game_id).await?;

    let err = with_txn(&env.db, move |txn| {
        Box::pin(async move { games::update_game(txn, game_id, &change).await })
    })
    .await
    .unwrap_err();
    assert_eq!(err.conflict_kind(), Some(&ConflictKind::StateMismatch));
    assert_eq!(load_game(&env.db, game_id).await?, moved);
    Ok(())
}

#[tokio::test]
async fn write_expecting_a_different_handled_flag_is_rejected() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;
    let game_id = g.game.id;
    force_game(
        &env.db,
        game_id,
        ForceGame::state(GameState::WaitingForBotQuestion, false).turns(g.order(), 2),
    )
    .await?;

    let pending = load_game(&env.db, game_id).await?;
    let change = advance_after_message(
        &pending,
        &NewMessage::question(g.seat(2), g.seat(3), "Any pets?"),
    )?;
    force_game(
        &env.db,
        game_id,
        ForceGame::state(GameState::WaitingForBotQuestion, true),
    )
    .await?;

    let err = with_txn(&env.db, move |txn| {
        Box::pin(async move { games::update_game(txn, game_id, &change).await })
    })
    .await
    .unwrap_err();
    assert_eq!(err.conflict_kind(), Some(&ConflictKind::StateMismatch));
    Ok(())
}
