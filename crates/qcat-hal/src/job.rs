//! Remote job lifecycle.
//!
//! ```text
//!   submit ──→ Queued ──→ Running ──→ Completed
//!                │           │
//!                │           ├──→ Failed(reason)
//!                └───────────┴──→ Cancelled
//! ```
//!
//! Terminal states are permanent. Polling has no deadline; callers wait
//! until the service reports a terminal state.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HalError, HalResult};

/// Identifier assigned by a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Create a new job ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Status of a remote job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    /// Waiting in the provider's queue.
    Queued,
    /// Executing.
    Running,
    /// Finished; results are available.
    Completed,
    /// Finished with an error.
    Failed(String),
    /// Cancelled before completion.
    Cancelled,
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed(_) | JobStatus::Cancelled
        )
    }

    /// Check if the job is still pending (queued or running).
    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "Queued"),
            JobStatus::Running => write!(f, "Running"),
            JobStatus::Completed => write!(f, "Completed"),
            JobStatus::Failed(msg) => write!(f, "Failed: {msg}"),
            JobStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Poll `status` every `interval` until the job completes.
///
/// `Failed` and `Cancelled` become errors so callers only handle success.
pub async fn poll_until_terminal<F, Fut>(
    job_id: &JobId,
    interval: Duration,
    mut status: F,
) -> HalResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HalResult<JobStatus>>,
{
    loop {
        match status().await? {
            JobStatus::Completed => return Ok(()),
            JobStatus::Failed(reason) => return Err(HalError::JobFailed(reason)),
            JobStatus::Cancelled => return Err(HalError::JobCancelled),
            pending => {
                debug!("job {job_id} is {pending}, polling again in {interval:?}");
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_terminal() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(JobStatus::Running.is_pending());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("error".into()).is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_completed() {
        let mut script = vec![JobStatus::Completed, JobStatus::Running, JobStatus::Queued];
        let mut calls = 0;
        let id = JobId::new("job-1");

        poll_until_terminal(&id, Duration::from_secs(5), || {
            calls += 1;
            let next = script.pop().unwrap();
            async move { Ok(next) }
        })
        .await
        .unwrap();

        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_surfaces_failure() {
        let id = JobId::new("job-2");
        let err = poll_until_terminal(&id, Duration::from_secs(1), || async {
            Ok(JobStatus::Failed("calibration drift".into()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, HalError::JobFailed(reason) if reason == "calibration drift"));

        let err = poll_until_terminal(&id, Duration::from_secs(1), || async {
            Ok(JobStatus::Cancelled)
        })
        .await
        .unwrap_err();
        assert!(matches!(err, HalError::JobCancelled));
    }
}
