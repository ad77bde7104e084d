//! Driving port for changing a user's jobs.

use async_trait::async_trait;

use crate::domain::{Error, Job, JobDraft, JobId, UserId};

/// Use-case port for changing a user's jobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobsCommand: Send + Sync {
    /// Create a job owned by `owner`.
    async fn create_job(&self, owner: &UserId, draft: JobDraft) -> Result<Job, Error>;

    /// Update an owned job. `None` means no such job for `owner`.
    async fn update_job(
        &self,
        owner: &UserId,
        id: &JobId,
        draft: JobDraft,
    ) -> Result<Option<Job>, Error>;

    /// Delete an owned job. `false` means no such job for `owner`.
    async fn delete_job(&self, owner: &UserId, id: &JobId) -> Result<bool, Error>;
}
