//! In-memory `JobRepository`.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{JobPersistenceError, JobRepository};
use crate::domain::{Job, JobDraft, JobId, UserId};

/// Jobs kept in insertion order; lookups always match on owner and id.
#[derive(Debug, Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<Vec<Job>>,
}

impl InMemoryJobRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Job>, JobPersistenceError> {
        let jobs = self.jobs.read().unwrap_or_else(PoisonError::into_inner);
        let mut owned: Vec<Job> = jobs.iter().filter(|job| job.owner == *owner).cloned().collect();
        owned.sort_by_key(|job| job.created_at);
        Ok(owned)
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: &JobId,
    ) -> Result<Option<Job>, JobPersistenceError> {
        let jobs = self.jobs.read().unwrap_or_else(PoisonError::into_inner);
        Ok(jobs
            .iter()
            .find(|job| job.owner == *owner && job.id == *id)
            .cloned())
    }

    async fn insert(&self, job: &Job) -> Result<(), JobPersistenceError> {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        jobs.push(job.clone());
        Ok(())
    }

    async fn update_for_owner(
        &self,
        owner: &UserId,
        id: &JobId,
        draft: &JobDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Job>, JobPersistenceError> {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        let target = jobs
            .iter_mut()
            .find(|job| job.owner == *owner && job.id == *id);
        Ok(target.map(|job| {
            job.apply(draft.clone(), updated_at);
            job.clone()
        }))
    }

    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: &JobId,
    ) -> Result<bool, JobPersistenceError> {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        let before = jobs.len();
        jobs.retain(|job| !(job.owner == *owner && job.id == *id));
        Ok(jobs.len() < before)
    }
}
