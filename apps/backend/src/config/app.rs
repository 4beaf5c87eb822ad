//! Server, scheduler and job tuning.

use std::time::Duration;

use crate::config::var_or;
use crate::error::AppError;

/// Randomized delay after an AI reply, so bots answer at a human pace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingConfig {
    pub min: Duration,
    pub max: Duration,
}

impl PacingConfig {
    /// No delay at all; used by tests.
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }
}

/// When a game counts as expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryConfig {
    /// Age after which a game is scheduled for deletion.
    pub max_age: time::Duration,
    /// A game touched more recently than this is spared.
    pub idle_grace: time::Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub reconcile_interval: Duration,
    pub job_workers: usize,
    pub job_queue_capacity: usize,
    pub expiry: ExpiryConfig,
    pub pacing: PacingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            reconcile_interval: Duration::from_millis(1000),
            job_workers: 4,
            job_queue_capacity: 256,
            expiry: ExpiryConfig {
                max_age: time::Duration::seconds(3600),
                idle_grace: time::Duration::seconds(60),
            },
            pacing: PacingConfig {
                min: Duration::from_millis(1500),
                max: Duration::from_millis(4000),
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let job_workers: usize = var_or("JOB_WORKERS", defaults.job_workers)?;
        if job_workers == 0 {
            return Err(AppError::config("JOB_WORKERS must be at least 1"));
        }
        let job_queue_capacity: usize = var_or("JOB_QUEUE_CAPACITY", defaults.job_queue_capacity)?;
        if job_queue_capacity == 0 {
            return Err(AppError::config("JOB_QUEUE_CAPACITY must be at least 1"));
        }

        let pacing_min: u64 = var_or("AI_PACING_MIN_MS", 1500)?;
        let pacing_max: u64 = var_or("AI_PACING_MAX_MS", 4000)?;
        if pacing_min > pacing_max {
            return Err(AppError::config(format!(
                "AI_PACING_MIN_MS ({pacing_min}) exceeds AI_PACING_MAX_MS ({pacing_max})"
            )));
        }

        let max_age_secs: i64 = var_or("GAME_MAX_AGE_SECS", 3600)?;
        let idle_grace_secs: i64 = var_or("GAME_IDLE_GRACE_SECS", 60)?;
        let interval_ms: u64 = var_or("RECONCILE_INTERVAL_MS", 1000)?;

        Ok(Self {
            host: var_or("BACKEND_HOST", defaults.host)?,
            port: var_or("BACKEND_PORT", defaults.port)?,
            reconcile_interval: Duration::from_millis(interval_ms.max(1)),
            job_workers,
            job_queue_capacity,
            expiry: ExpiryConfig {
                max_age: time::Duration::seconds(max_age_secs),
                idle_grace: time::Duration::seconds(idle_grace_secs),
            },
            pacing: PacingConfig {
                min: Duration::from_millis(pacing_min),
                max: Duration::from_millis(pacing_max),
            },
        })
    }
}
