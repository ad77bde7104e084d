//! Builders for the HTTP state over Diesel or in-memory repositories.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use jobs_tracker::domain::ports::{JobRepository, UserRepository};
use jobs_tracker::domain::{
    AccountService, DEMO_JOB_COUNT, DemoDataSeeder, JobsService, User,
};
use jobs_tracker::inbound::http::state::HttpState;
use jobs_tracker::outbound::memory::{InMemoryJobRepository, InMemoryUserRepository};
use jobs_tracker::outbound::persistence::{DieselJobRepository, DieselUserRepository};

use super::ServerConfig;

/// RNG seed for startup demo data, fixed so every demo run looks the same.
const DEMO_SEED: u64 = 0x6a6f_6273;

/// Seed the demo account, logging rather than failing when it cannot be
/// created (for example because a previous run already created it).
async fn seed_demo_data<U, J>(users: Arc<U>, jobs: Arc<J>, clock: Arc<dyn Clock>) -> Option<User>
where
    U: UserRepository,
    J: JobRepository,
{
    match DemoDataSeeder::new(users, jobs, clock)
        .seed(DEMO_SEED, DEMO_JOB_COUNT)
        .await
    {
        Ok(user) => {
            info!(email = %user.email(), "demo user ready");
            Some(user)
        }
        Err(error) => {
            warn!(error = %error, "demo data seeding skipped");
            None
        }
    }
}

async fn assemble<U, J>(users: Arc<U>, jobs: Arc<J>, seed_demo: bool) -> web::Data<HttpState>
where
    U: UserRepository + 'static,
    J: JobRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    if seed_demo {
        seed_demo_data(users.clone(), jobs.clone(), clock.clone()).await;
    }
    web::Data::new(HttpState::from_services(
        Arc::new(AccountService::new(users)),
        Arc::new(JobsService::new(jobs, clock)),
    ))
}

/// Build the shared HTTP state, seeding demo data when requested.
pub(crate) async fn build_http_state(config: &ServerConfig, seed_demo: bool) -> web::Data<HttpState> {
    match &config.db_pool {
        Some(pool) => {
            assemble(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselJobRepository::new(pool.clone())),
                seed_demo,
            )
            .await
        }
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            assemble(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryJobRepository::new()),
                seed_demo,
            )
            .await
        }
    }
}
