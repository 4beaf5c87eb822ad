use std::collections::HashSet;

use backend::domain::GameState;
use backend::errors::domain::ConflictKind;
use backend::jobs::{run_job, Job, JobKind, JobOutcome};
use backend::AppError;

use crate::support::factory::{game_with_humans, load_game};
use crate::support::test_state::TestEnv;

#[tokio::test]
async fn start_job_shuffles_turns_and_opens_the_first_question() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let (game, _) = game_with_humans(&env, 2).await?;
    assert_eq!(game.state, GameState::PlayersJoined);

    let outcome = run_job(&env.jobs, Job::new(JobKind::StartAfterJoin, game.id)).await?;
    let started = load_game(&env.db, game.id).await?;

    assert_eq!(outcome, JobOutcome::Advanced(started.state));
    assert!(started.state.is_question_state());
    assert_eq!(started.current_turn_index, 0);
    assert_eq!(started.state_handled, !started.state.needs_system_action());

    let seats: HashSet<_> = game.bots.iter().map(|b| b.id).collect();
    let order: HashSet<_> = started.turn_order.iter().copied().collect();
    assert_eq!(started.turn_order.len(), 5);
    assert_eq!(order, seats, "turn order is a permutation of the bots");

    let first = started.bot(started.turn_order[0]).unwrap();
    assert_eq!(started.state, GameState::question_for(first.bot_type));
    Ok(())
}

#[tokio::test]
async fn fixed_seed_gives_the_same_order() -> Result<(), AppError> {
    let first = TestEnv::new().await?;
    let second = TestEnv::new().await?;
    let (a, _) = game_with_humans(&first, 2).await?;
    let (b, _) = game_with_humans(&second, 2).await?;
    assert_eq!(a.id, b.id);

    run_job(&first.jobs, Job::new(JobKind::StartAfterJoin, a.id)).await?;
    run_job(&second.jobs, Job::new(JobKind::StartAfterJoin, b.id)).await?;

    let a = load_game(&first.db, a.id).await?;
    let b = load_game(&second.db, b.id).await?;
    let seats = |g: &backend::domain::Game| {
        g.turn_order
            .iter()
            .map(|id| g.bot(*id).unwrap().seat)
            .collect::<Vec<_>>()
    };
    assert_eq!(seats(&a), seats(&b));
    Ok(())
}

#[tokio::test]
async fn second_run_is_rejected() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let (game, _) = game_with_humans(&env, 2).await?;
    let job = Job::new(JobKind::StartAfterJoin, game.id);

    run_job(&env.jobs, job).await?;
    let before = load_game(&env.db, game.id).await?;
    let err = run_job(&env.jobs, job).await.unwrap_err();
    assert_eq!(err.conflict_kind(), Some(&ConflictKind::StateMismatch));
    assert_eq!(load_game(&env.db, game.id).await?, before);
    Ok(())
}

#[tokio::test]
async fn one_human_is_not_enough() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let (game, _) = game_with_humans(&env, 1).await?;

    let err = run_job(&env.jobs, Job::new(JobKind::StartAfterJoin, game.id))
        .await
        .unwrap_err();
    assert_eq!(err.conflict_kind(), Some(&ConflictKind::StateMismatch));
    Ok(())
}
