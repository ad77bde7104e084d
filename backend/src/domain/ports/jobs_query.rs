//! Driving port for reading a user's jobs.

use async_trait::async_trait;

use crate::domain::{Error, Job, JobId, UserId};

/// Use-case port for reading a user's jobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobsQuery: Send + Sync {
    /// All jobs owned by `owner`, ordered by creation time.
    async fn list_jobs(&self, owner: &UserId) -> Result<Vec<Job>, Error>;

    /// A single owned job, or `None` when it does not exist for `owner`.
    async fn find_job(&self, owner: &UserId, id: &JobId) -> Result<Option<Job>, Error>;
}
