use std::sync::Arc;
use std::time::Duration;

use backend::domain::GameState;
use backend::jobs::{Job, JobError, JobKind};
use backend::reconcile::{Reconciler, TickReport};
use backend::AppError;
use tokio_util::sync::CancellationToken;

use crate::support::factory::{backdate, force_game, game_with_humans, playing_game, ForceGame};
use crate::support::recording_queue::RecordingQueue;
use crate::support::test_state::TestEnv;

fn reconciler(env: &TestEnv, queue: Arc<RecordingQueue>) -> Reconciler {
    Reconciler::new(
        env.db.clone(),
        queue,
        Duration::from_millis(10),
        env.jobs.expiry,
    )
}

#[tokio::test]
async fn tick_schedules_one_job_per_waiting_game() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let (joined, _) = game_with_humans(&env, 2).await?;
    let asking = playing_game(&env).await?;
    force_game(
        &env.db,
        asking.game.id,
        ForceGame::state(GameState::WaitingForBotQuestion, false).turns(asking.order(), 2),
    )
    .await?;
    let answering = playing_game(&env).await?;
    force_game(
        &env.db,
        answering.game.id,
        ForceGame::state(GameState::WaitingForBotAnswer, false)
            .turns(answering.order(), 2)
            .question("Cats?", answering.seat(3)),
    )
    .await?;
    let (old, _) = game_with_humans(&env, 0).await?;
    backdate(&env.db, old.id, time::Duration::hours(3), time::Duration::hours(3)).await?;

    let queue = Arc::new(RecordingQueue::new());
    let report = reconciler(&env, queue.clone()).tick().await;

    assert_eq!(
        report,
        TickReport {
            start_after_join: 1,
            ask_as_ai: 1,
            answer_as_ai: 1,
            delete_expired: 1,
            duplicates: 0,
            failures: 0,
        }
    );
    let jobs = queue.enqueued();
    assert!(jobs.contains(&Job::new(JobKind::StartAfterJoin, joined.id)));
    assert!(jobs.contains(&Job::new(JobKind::AskAsAi, asking.game.id)));
    assert!(jobs.contains(&Job::new(JobKind::AnswerAsAi, answering.game.id)));
    assert!(jobs.contains(&Job::new(JobKind::DeleteExpired, old.id)));
    Ok(())
}

#[tokio::test]
async fn pending_jobs_are_not_scheduled_twice() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let (joined, _) = game_with_humans(&env, 2).await?;
    let queue = Arc::new(RecordingQueue::new());
    let reconciler = reconciler(&env, queue.clone());

    assert_eq!(reconciler.tick().await.start_after_join, 1);
    let second = reconciler.tick().await;
    assert_eq!(second.enqueued(), 0);
    assert_eq!(second.duplicates, 1);

    queue.complete(&Job::new(JobKind::StartAfterJoin, joined.id));
    assert_eq!(reconciler.tick().await.start_after_join, 1);
    Ok(())
}

#[tokio::test]
async fn handled_games_are_left_alone() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    playing_game(&env).await?;
    game_with_humans(&env, 1).await?;

    let queue = Arc::new(RecordingQueue::new());
    let report = reconciler(&env, queue.clone()).tick().await;
    assert_eq!(report, TickReport::default());
    assert!(queue.enqueued().is_empty());
    Ok(())
}

#[tokio::test]
async fn enqueue_failures_are_counted_not_fatal() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    game_with_humans(&env, 2).await?;
    game_with_humans(&env, 2).await?;

    let queue = Arc::new(RecordingQueue::new());
    queue.fail_next_with(Some(JobError::QueueFull));
    let reconciler = reconciler(&env, queue.clone());

    let report = reconciler.tick().await;
    assert_eq!(report.failures, 2);
    assert_eq!(report.enqueued(), 0);

    queue.fail_next_with(None);
    assert_eq!(reconciler.tick().await.start_after_join, 2);
    Ok(())
}

#[tokio::test]
async fn run_ticks_until_cancelled() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let (joined, _) = game_with_humans(&env, 2).await?;
    let queue = Arc::new(RecordingQueue::new());
    let reconciler = reconciler(&env, queue.clone());

    let cancel = CancellationToken::new();
    let handle = {
        let cancel = cancel.clone();
        tokio::spawn(async move { reconciler.run(cancel).await })
    };

    for _ in 0..100 {
        if !queue.enqueued().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("reconciler stops after cancel")
        .expect("reconciler task does not panic");

    assert_eq!(
        queue.enqueued(),
        vec![Job::new(JobKind::StartAfterJoin, joined.id)]
    );
    Ok(())
}

#[tokio::test]
async fn cancellation_mid_pass_stops_further_enqueues() -> Result<(), AppError> {
    let env = TestEnv::new().await?;
    let (joined, _) = game_with_humans(&env, 2).await?;
    let asking = playing_game(&env).await?;
    force_game(
        &env.db,
        asking.game.id,
        ForceGame::state(GameState::WaitingForBotQuestion, false).turns(asking.order(), 2),
    )
    .await?;

    let cancel = CancellationToken::new();
    let queue = Arc::new(RecordingQueue::new());
    queue.cancel_on_enqueue(cancel.clone());

    tokio::time::timeout(Duration::from_secs(5), reconciler(&env, queue.clone()).run(cancel))
        .await
        .expect("reconciler stops once cancelled");

    assert_eq!(
        queue.enqueued(),
        vec![Job::new(JobKind::StartAfterJoin, joined.id)]
    );
    Ok(())
}
