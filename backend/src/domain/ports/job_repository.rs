//! Port for job persistence.
//!
//! Every method takes the owning [`UserId`]. Adapters must include the owner
//! in the lookup key so a job is never read or changed on behalf of another
//! user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Job, JobDraft, JobId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by job repository adapters.
    pub enum JobPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "job repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "job repository query failed: {message}",
    }
}

/// Driven port for owner-scoped job storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Jobs owned by `owner`, oldest first.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Job>, JobPersistenceError>;

    /// Fetch one job if it exists and belongs to `owner`.
    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: &JobId,
    ) -> Result<Option<Job>, JobPersistenceError>;

    /// Persist a new job.
    async fn insert(&self, job: &Job) -> Result<(), JobPersistenceError>;

    /// Overwrite the editable fields of an owned job.
    ///
    /// Returns the updated job, or `None` when no job with this id belongs to
    /// `owner`.
    async fn update_for_owner(
        &self,
        owner: &UserId,
        id: &JobId,
        draft: &JobDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Job>, JobPersistenceError>;

    /// Remove an owned job, returning whether a row was deleted.
    async fn delete_for_owner(&self, owner: &UserId, id: &JobId)
    -> Result<bool, JobPersistenceError>;
}
