//! PostgreSQL-backed `JobRepository` implementation.
//!
//! Every statement filters on `created_by`, so rows owned by other users are
//! invisible to each call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{JobPersistenceError, JobRepository};
use crate::domain::{Job, JobDraft, JobId, JobStatus, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{JobRow, JobUpdate, NewJobRow};
use super::pool::DbPool;
use super::schema::jobs;

/// Diesel-backed implementation of the [`JobRepository`] port.
#[derive(Clone)]
pub struct DieselJobRepository {
    pool: DbPool,
}

impl DieselJobRepository {
    /// Repository over a shared pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn query_error(error: &diesel::result::Error) -> JobPersistenceError {
    map_diesel_error(
        error,
        JobPersistenceError::query,
        JobPersistenceError::connection,
    )
}

fn row_to_job(row: JobRow) -> Result<Job, JobPersistenceError> {
    let status = row.status.parse::<JobStatus>().map_err(|_| {
        warn!(value = %row.status, job_id = %row.id, "unrecognised job status");
        JobPersistenceError::query("unrecognised job status")
    })?;
    Ok(Job {
        id: JobId::from_uuid(row.id),
        owner: UserId::from_uuid(row.created_by),
        company: row.company,
        position: row.position,
        status,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl JobRepository for DieselJobRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Job>, JobPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, JobPersistenceError::connection))?;

        let rows: Vec<JobRow> = jobs::table
            .filter(jobs::created_by.eq(owner.as_uuid()))
            .order((jobs::created_at.asc(), jobs::id.asc()))
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| query_error(&err))?;

        rows.into_iter().map(row_to_job).collect()
    }

    async fn find_for_owner(
        &self,
        owner: &UserId,
        id: &JobId,
    ) -> Result<Option<Job>, JobPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, JobPersistenceError::connection))?;

        let row = jobs::table
            .filter(jobs::id.eq(id.as_uuid()))
            .filter(jobs::created_by.eq(owner.as_uuid()))
            .select(JobRow::as_select())
            .first::<JobRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| query_error(&err))?;

        row.map(row_to_job).transpose()
    }

    async fn insert(&self, job: &Job) -> Result<(), JobPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, JobPersistenceError::connection))?;

        let row = NewJobRow {
            id: *job.id.as_uuid(),
            company: &job.company,
            position: &job.position,
            status: job.status.as_str(),
            created_by: *job.owner.as_uuid(),
            created_at: job.created_at,
            updated_at: job.updated_at,
        };

        diesel::insert_into(jobs::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| query_error(&err))
    }

    async fn update_for_owner(
        &self,
        owner: &UserId,
        id: &JobId,
        draft: &JobDraft,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Job>, JobPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, JobPersistenceError::connection))?;

        let changes = JobUpdate {
            company: &draft.company,
            position: &draft.position,
            status: draft.status.as_str(),
            updated_at,
        };

        let row = diesel::update(
            jobs::table
                .filter(jobs::id.eq(id.as_uuid()))
                .filter(jobs::created_by.eq(owner.as_uuid())),
        )
        .set(&changes)
        .returning(JobRow::as_returning())
        .get_result::<JobRow>(&mut conn)
        .await
        .optional()
        .map_err(|err| query_error(&err))?;

        row.map(row_to_job).transpose()
    }

    async fn delete_for_owner(
        &self,
        owner: &UserId,
        id: &JobId,
    ) -> Result<bool, JobPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, JobPersistenceError::connection))?;

        let deleted = diesel::delete(
            jobs::table
                .filter(jobs::id.eq(id.as_uuid()))
                .filter(jobs::created_by.eq(owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| query_error(&err))?;

        Ok(deleted > 0)
    }
}
