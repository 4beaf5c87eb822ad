//! Bounded worker pool with dedup-by-key enqueue.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashSet;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::context::JobContext;
use super::handlers::run_job;
use super::queue::{EnqueueOutcome, Job, JobError, JobQueue};
use crate::errors::domain::DomainError;

type BoxedJobFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type JobHandler = Arc<dyn Fn(Job) -> BoxedJobFuture + Send + Sync>;

/// Removes the job key when the job ends, including by panic.
struct KeyGuard {
    in_flight: Arc<DashSet<Job>>,
    job: Job,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        self.in_flight.remove(&self.job);
    }
}

pub struct WorkerPool {
    in_flight: Arc<DashSet<Job>>,
    sender: mpsc::Sender<Job>,
    shutdown: CancellationToken,
    dispatcher: Mutex<Option<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Start a pool running [`run_job`] against `ctx`.
    pub fn start(ctx: JobContext, workers: usize, capacity: usize) -> Self {
        let ctx = Arc::new(ctx);
        Self::with_handler(workers, capacity, move |job| {
            let ctx = Arc::clone(&ctx);
            async move { log_result(job, run_job(&ctx, job).await) }
        })
    }

    /// Start a pool running an arbitrary async handler per job.
    pub fn with_handler<F, Fut>(workers: usize, capacity: usize, handler: F) -> Self
    where
        F: Fn(Job) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handler: JobHandler = Arc::new(move |job| Box::pin(handler(job)));
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let in_flight = Arc::new(DashSet::new());
        let shutdown = CancellationToken::new();

        let dispatcher = tokio::spawn(dispatch(
            receiver,
            handler,
            Arc::clone(&in_flight),
            workers.max(1),
            shutdown.clone(),
        ));

        Self {
            in_flight,
            sender,
            shutdown,
            dispatcher: Mutex::new(Some(dispatcher)),
        }
    }

    /// Jobs queued or running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Stop accepting jobs and wait for running ones to finish.
    ///
    /// Queued jobs that have not started are dropped; the reconciler finds
    /// their games again on its next pass.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handle = match self.dispatcher.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!(error = %e, "job dispatcher panicked");
            }
        }
        info!("worker pool drained");
    }
}

#[async_trait]
impl JobQueue for WorkerPool {
    async fn enqueue_unique(&self, job: Job) -> Result<EnqueueOutcome, JobError> {
        if self.shutdown.is_cancelled() {
            return Err(JobError::Closed);
        }
        if !self.in_flight.insert(job) {
            return Ok(EnqueueOutcome::Duplicate);
        }
        match self.sender.try_send(job) {
            Ok(()) => {
                debug!(job = %job.kind, game_id = job.game_id, "job enqueued");
                Ok(EnqueueOutcome::Enqueued)
            }
            Err(TrySendError::Full(_)) => {
                self.in_flight.remove(&job);
                Err(JobError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => {
                self.in_flight.remove(&job);
                Err(JobError::Closed)
            }
        }
    }
}

async fn dispatch(
    mut receiver: mpsc::Receiver<Job>,
    handler: JobHandler,
    in_flight: Arc<DashSet<Job>>,
    workers: usize,
    shutdown: CancellationToken,
) {
    let permits = Arc::new(Semaphore::new(workers));
    let mut running = JoinSet::new();

    loop {
        let job = tokio::select! {
            _ = shutdown.cancelled() => break,
            next = receiver.recv() => match next {
                Some(job) => job,
                None => break,
            },
        };

        let permit = tokio::select! {
            _ = shutdown.cancelled() => {
                in_flight.remove(&job);
                break;
            }
            permit = Arc::clone(&permits).acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let guard = KeyGuard {
            in_flight: Arc::clone(&in_flight),
            job,
        };
        let handler = Arc::clone(&handler);
        running.spawn(async move {
            let _guard = guard;
            handler(job).await;
            drop(permit);
        });

        while let Some(done) = running.try_join_next() {
            report_join(done);
        }
    }

    receiver.close();
    while let Ok(job) = receiver.try_recv() {
        in_flight.remove(&job);
    }
    while let Some(done) = running.join_next().await {
        report_join(done);
    }
}

fn report_join(done: Result<(), tokio::task::JoinError>) {
    if let Err(e) = done {
        error!(error = %e, "job task panicked");
    }
}

fn log_result<T: std::fmt::Debug>(job: Job, result: Result<T, DomainError>) {
    match result {
        Ok(outcome) => info!(job = %job.kind, game_id = job.game_id, ?outcome, "job completed"),
        Err(DomainError::Conflict(kind, detail)) => {
            debug!(job = %job.kind, game_id = job.game_id, ?kind, %detail, "job skipped")
        }
        Err(DomainError::NotFound(_, detail)) => {
            debug!(job = %job.kind, game_id = job.game_id, %detail, "job target gone")
        }
        Err(e) => warn!(job = %job.kind, game_id = job.game_id, error = %e, "job failed"),
    }
}
