//! Background jobs that advance games the system is responsible for.
//!
//! The reconciler enqueues a [`Job`] per game needing work; the
//! [`WorkerPool`] runs each through [`handlers::run_job`] under a bounded
//! number of concurrent workers.

pub mod context;
pub mod handlers;
pub mod pool;
pub mod queue;

pub use context::JobContext;
pub use handlers::{run_job, JobOutcome};
pub use pool::WorkerPool;
pub use queue::{EnqueueOutcome, Job, JobError, JobKind, JobQueue};
