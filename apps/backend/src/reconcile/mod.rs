//! Polling reconciliation: finds games waiting on the system and schedules
//! the job that moves each one on.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::app::ExpiryConfig;
use crate::domain::{GameId, GameState};
use crate::errors::domain::DomainError;
use crate::jobs::{EnqueueOutcome, Job, JobKind, JobQueue};
use crate::repos::games;

/// Counts from one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub start_after_join: usize,
    pub ask_as_ai: usize,
    pub answer_as_ai: usize,
    pub delete_expired: usize,
    pub duplicates: usize,
    pub failures: usize,
}

impl TickReport {
    pub fn enqueued(&self) -> usize {
        self.start_after_join + self.ask_as_ai + self.answer_as_ai + self.delete_expired
    }

    fn count(&mut self, kind: JobKind) {
        match kind {
            JobKind::StartAfterJoin => self.start_after_join += 1,
            JobKind::AskAsAi => self.ask_as_ai += 1,
            JobKind::AnswerAsAi => self.answer_as_ai += 1,
            JobKind::DeleteExpired => self.delete_expired += 1,
        }
    }
}

pub struct Reconciler {
    db: DatabaseConnection,
    queue: Arc<dyn JobQueue>,
    interval: Duration,
    expiry: ExpiryConfig,
}

impl Reconciler {
    pub fn new(
        db: DatabaseConnection,
        queue: Arc<dyn JobQueue>,
        interval: Duration,
        expiry: ExpiryConfig,
    ) -> Self {
        Self {
            db,
            queue,
            interval,
            expiry,
        }
    }

    /// Tick until `cancel` fires. A pass that is under way when it fires
    /// stops before its next scan or enqueue.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval_ms = self.interval.as_millis() as u64, "reconciler started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let report = tokio::select! {
                        _ = cancel.cancelled() => break,
                        report = self.pass(&cancel) => report,
                    };
                    if report.enqueued() > 0 || report.failures > 0 {
                        debug!(?report, "reconcile tick");
                    }
                }
            }
        }
        info!("reconciler stopped");
    }

    /// One full pass over the four scans.
    pub async fn tick(&self) -> TickReport {
        self.pass(&CancellationToken::new()).await
    }

    async fn pass(&self, cancel: &CancellationToken) -> TickReport {
        let mut report = TickReport::default();

        for (state, kind) in [
            (GameState::PlayersJoined, JobKind::StartAfterJoin),
            (GameState::WaitingForBotQuestion, JobKind::AskAsAi),
            (GameState::WaitingForBotAnswer, JobKind::AnswerAsAi),
        ] {
            if cancel.is_cancelled() {
                return report;
            }
            let ids = games::list_unhandled_game_ids(&self.db, state).await;
            self.schedule(kind, ids, cancel, &mut report).await;
        }

        if cancel.is_cancelled() {
            return report;
        }
        let expired = games::list_expired_game_ids(&self.db, self.expiry.max_age).await;
        self.schedule(JobKind::DeleteExpired, expired, cancel, &mut report)
            .await;

        report
    }

    async fn schedule(
        &self,
        kind: JobKind,
        ids: Result<Vec<GameId>, DomainError>,
        cancel: &CancellationToken,
        report: &mut TickReport,
    ) {
        let ids = match ids {
            Ok(ids) => ids,
            Err(e) => {
                warn!(job = %kind, error = %e, "reconcile scan failed");
                report.failures += 1;
                return;
            }
        };

        for game_id in ids {
            if cancel.is_cancelled() {
                return;
            }
            match self.queue.enqueue_unique(Job::new(kind, game_id)).await {
                Ok(EnqueueOutcome::Enqueued) => report.count(kind),
                Ok(EnqueueOutcome::Duplicate) => report.duplicates += 1,
                Err(e) => {
                    warn!(job = %kind, game_id, error = %e, "enqueue failed");
                    report.failures += 1;
                }
            }
        }
    }
}
