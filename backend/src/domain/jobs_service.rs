//! Job tracking domain service.
//!
//! Implements the [`JobsQuery`] and [`JobsCommand`] driving ports over a
//! [`JobRepository`], stamping timestamps from an injected clock.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{JobPersistenceError, JobRepository, JobsCommand, JobsQuery};
use crate::domain::{Error, Job, JobDraft, JobId, UserId};

/// Service backing the jobs pages.
#[derive(Clone)]
pub struct JobsService<R> {
    jobs: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> JobsService<R> {
    /// Wrap a repository; `clock` stamps creation and update times.
    #[must_use]
    pub fn new(jobs: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { jobs, clock }
    }
}

fn map_persistence_error(error: JobPersistenceError) -> Error {
    match error {
        JobPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("job repository unavailable: {message}"))
        }
        JobPersistenceError::Query { message } => {
            Error::internal(format!("job repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> JobsQuery for JobsService<R>
where
    R: JobRepository,
{
    async fn list_jobs(&self, owner: &UserId) -> Result<Vec<Job>, Error> {
        self.jobs
            .list_for_owner(owner)
            .await
            .map_err(map_persistence_error)
    }

    async fn find_job(&self, owner: &UserId, id: &JobId) -> Result<Option<Job>, Error> {
        self.jobs
            .find_for_owner(owner, id)
            .await
            .map_err(map_persistence_error)
    }
}

#[async_trait]
impl<R> JobsCommand for JobsService<R>
where
    R: JobRepository,
{
    async fn create_job(&self, owner: &UserId, draft: JobDraft) -> Result<Job, Error> {
        let job = Job::create(*owner, draft, self.clock.utc());
        self.jobs
            .insert(&job)
            .await
            .map_err(map_persistence_error)?;
        Ok(job)
    }

    async fn update_job(
        &self,
        owner: &UserId,
        id: &JobId,
        draft: JobDraft,
    ) -> Result<Option<Job>, Error> {
        self.jobs
            .update_for_owner(owner, id, &draft, self.clock.utc())
            .await
            .map_err(map_persistence_error)
    }

    async fn delete_job(&self, owner: &UserId, id: &JobId) -> Result<bool, Error> {
        self.jobs
            .delete_for_owner(owner, id)
            .await
            .map_err(map_persistence_error)
    }
}
