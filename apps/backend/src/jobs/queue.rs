use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::GameId;

/// What a job does to its game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    StartAfterJoin,
    AskAsAi,
    AnswerAsAi,
    DeleteExpired,
}

impl JobKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            JobKind::StartAfterJoin => "start_after_join",
            JobKind::AskAsAi => "ask_as_ai",
            JobKind::AnswerAsAi => "answer_as_ai",
            JobKind::DeleteExpired => "delete_expired",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work; also its deduplication key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Job {
    pub kind: JobKind,
    pub game_id: GameId,
}

impl Job {
    pub const fn new(kind: JobKind, game_id: GameId) -> Self {
        Self { kind, game_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Enqueued,
    /// The same job is already queued or running.
    Duplicate,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("job queue is full")]
    QueueFull,
    #[error("job queue is shut down")]
    Closed,
}

#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue `job` unless an equal job is queued or running.
    async fn enqueue_unique(&self, job: Job) -> Result<EnqueueOutcome, JobError>;
}
