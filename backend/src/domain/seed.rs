//! Deterministic demo data: one user with a batch of job applications.
//!
//! The same seed always produces the same names, companies, titles and
//! statuses, so demo environments and tests are reproducible.

use std::sync::Arc;

use chrono::Duration;
use fake::Fake;
use fake::faker::company::raw::CompanyName;
use fake::faker::internet::raw::SafeEmail;
use fake::faker::job::raw::Title;
use fake::faker::name::raw::Name;
use fake::locales::EN;
use mockable::Clock;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::domain::ports::{JobRepository, UserRepository};
use crate::domain::{
    COMPANY_MAX, EmailAddress, Error, Job, JobId, JobStatus, POSITION_MAX, PasswordHash, User,
    UserAccount, UserId, UserName,
};

/// Password given to every seeded demo user.
pub const DEMO_PASSWORD: &str = "password123";
/// Number of jobs created when seeding at startup.
pub const DEMO_JOB_COUNT: usize = 20;

/// Seeds a demo account and its jobs through the driven ports.
pub struct DemoDataSeeder<U, J> {
    users: Arc<U>,
    jobs: Arc<J>,
    clock: Arc<dyn Clock>,
}

impl<U, J> DemoDataSeeder<U, J>
where
    U: UserRepository,
    J: JobRepository,
{
    /// Seed through `users` and `jobs`, stamping times from `clock`.
    #[must_use]
    pub fn new(users: Arc<U>, jobs: Arc<J>, clock: Arc<dyn Clock>) -> Self {
        Self { users, jobs, clock }
    }

    /// Create the demo user and `job_count` jobs owned by it.
    ///
    /// Jobs are stamped one second apart so listing order is stable.
    pub async fn seed(&self, seed: u64, job_count: usize) -> Result<User, Error> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let user = demo_user(&mut rng)?;
        let password_hash =
            PasswordHash::hash(DEMO_PASSWORD).map_err(|err| Error::internal(err.to_string()))?;
        let account = UserAccount {
            user,
            password_hash,
        };
        self.users
            .insert(&account)
            .await
            .map_err(|err| Error::internal(format!("failed to seed demo user: {err}")))?;

        let start = self.clock.utc();
        let owner = *account.user.id();
        for offset in 0..job_count {
            let at = start + Duration::seconds(i64::try_from(offset).unwrap_or(i64::MAX));
            let job = demo_job(&mut rng, owner, at);
            self.jobs
                .insert(&job)
                .await
                .map_err(|err| Error::internal(format!("failed to seed demo job: {err}")))?;
        }

        info!(
            email = %account.user.email(),
            jobs = job_count,
            "seeded demo data"
        );
        Ok(account.user)
    }
}

fn demo_user(rng: &mut ChaCha8Rng) -> Result<User, Error> {
    let name: String = Name(EN).fake_with_rng(rng);
    let email: String = SafeEmail(EN).fake_with_rng(rng);
    let name = UserName::new(name).map_err(|err| Error::internal(err.to_string()))?;
    let email = EmailAddress::new(email).map_err(|err| Error::internal(err.to_string()))?;
    Ok(User::new(UserId::random(), name, email))
}

fn demo_job(rng: &mut ChaCha8Rng, owner: UserId, at: chrono::DateTime<chrono::Utc>) -> Job {
    let company: String = CompanyName(EN).fake_with_rng(rng);
    let position: String = Title(EN).fake_with_rng(rng);
    let status = JobStatus::ALL
        .get(rng.random_range(0..JobStatus::ALL.len()))
        .copied()
        .unwrap_or(JobStatus::Pending);
    Job {
        id: JobId::random(),
        owner,
        company: company.chars().take(COMPANY_MAX).collect(),
        position: position.chars().take(POSITION_MAX).collect(),
        status,
        created_at: at,
        updated_at: at,
    }
}
