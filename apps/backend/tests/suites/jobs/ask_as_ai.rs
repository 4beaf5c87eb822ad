use std::sync::Arc;

use backend::domain::{GameState, MessageKind};
use backend::errors::domain::ConflictKind;
use backend::jobs::{run_job, Job, JobKind, JobOutcome};
use backend::repos::messages;
use backend::AppError;

use crate::support::factory::{force_game, load_game, playing_game, ForceGame};
use crate::support::scripted_ai::ScriptedGenerator;
use crate::support::test_state::TestEnv;

#[tokio::test]
async fn ai_asks_the_next_bot_in_rotation() -> Result<(), AppError> {
    let ai = Arc::new(ScriptedGenerator::new(["Where did you grow up?"]));
    let env = TestEnv::with_ai(ai.clone()).await?;
    let g = playing_game(&env).await?;
    force_game(
        &env.db,
        g.game.id,
        ForceGame::state(GameState::WaitingForBotQuestion, false).turns(g.order(), 2),
    )
    .await?;

    let outcome = run_job(&env.jobs, Job::new(JobKind::AskAsAi, g.game.id)).await?;
    assert_eq!(outcome, JobOutcome::Advanced(GameState::WaitingForBotAnswer));

    let history = messages::list_messages(&env.db, g.game.id).await?;
    assert_eq!(history.len(), 1);
    let asked = &history[0];
    assert_eq!(asked.kind, MessageKind::Question);
    assert_eq!(asked.source_bot_id, g.seat(2));
    assert_eq!(asked.target_bot_id, g.seat(3));
    assert_eq!(asked.text, "Where did you grow up?");

    let game = load_game(&env.db, g.game.id).await?;
    assert_eq!(game.current_turn_index, 2);
    assert_eq!(game.last_question_target_bot_id, Some(g.seat(3)));
    assert!(!game.state_handled);

    let prompts = ai.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains(&g.game.bots[3].name));
    Ok(())
}

#[tokio::test]
async fn asking_a_human_leaves_the_state_handled() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;
    // Seat 4 asks; the rotation after it starts with seat 0, a human.
    force_game(
        &env.db,
        g.game.id,
        ForceGame::state(GameState::WaitingForBotQuestion, false).turns(g.order(), 4),
    )
    .await?;

    let outcome = run_job(&env.jobs, Job::new(JobKind::AskAsAi, g.game.id)).await?;
    assert_eq!(outcome, JobOutcome::Advanced(GameState::WaitingForPlayerAnswer));

    let game = load_game(&env.db, g.game.id).await?;
    assert_eq!(game.last_question_target_bot_id, Some(g.seat(0)));
    assert!(game.state_handled);
    Ok(())
}

#[tokio::test]
async fn handled_or_wrong_state_is_skipped() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let g = playing_game(&env).await?;
    let job = Job::new(JobKind::AskAsAi, g.game.id);

    let err = run_job(&env.jobs, job).await.unwrap_err();
    assert_eq!(err.conflict_kind(), Some(&ConflictKind::StateMismatch));

    force_game(
        &env.db,
        g.game.id,
        ForceGame::state(GameState::WaitingForBotQuestion, true).turns(g.order(), 2),
    )
    .await?;
    let err = run_job(&env.jobs, job).await.unwrap_err();
    assert_eq!(err.conflict_kind(), Some(&ConflictKind::AlreadyHandled));

    assert!(messages::list_messages(&env.db, g.game.id).await?.is_empty());
    Ok(())
}
