//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    JobsCommand, JobsQuery, LoginService, RegistrationService, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential checks for the logon form.
    pub login: Arc<dyn LoginService>,
    /// Account creation for the register form.
    pub registration: Arc<dyn RegistrationService>,
    /// Session user lookup.
    pub users: Arc<dyn UsersQuery>,
    /// Job reads.
    pub jobs_query: Arc<dyn JobsQuery>,
    /// Job writes.
    pub jobs_command: Arc<dyn JobsCommand>,
}

impl HttpState {
    /// Build state from a service implementing every account port and one
    /// implementing both job ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use jobs_tracker::domain::{AccountService, JobsService};
    /// use jobs_tracker::inbound::http::state::HttpState;
    /// use jobs_tracker::outbound::memory::{InMemoryJobRepository, InMemoryUserRepository};
    /// use mockable::DefaultClock;
    ///
    /// let accounts = Arc::new(AccountService::new(Arc::new(InMemoryUserRepository::default())));
    /// let jobs = Arc::new(JobsService::new(
    ///     Arc::new(InMemoryJobRepository::default()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::from_services(accounts, jobs);
    /// let _jobs = state.jobs_query.clone();
    /// ```
    pub fn from_services<A, J>(accounts: Arc<A>, jobs: Arc<J>) -> Self
    where
        A: LoginService + RegistrationService + UsersQuery + 'static,
        J: JobsQuery + JobsCommand + 'static,
    {
        Self {
            login: accounts.clone(),
            registration: accounts.clone(),
            users: accounts,
            jobs_query: jobs.clone(),
            jobs_command: jobs,
        }
    }
}
