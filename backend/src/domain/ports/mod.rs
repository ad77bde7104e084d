//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters. Driving
//! ports (`*Service`, `*Query`, `*Command`) are implemented by domain services
//! and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod job_repository;
mod jobs_command;
mod jobs_query;
mod login_service;
mod registration_service;
mod user_repository;
mod users_query;

pub use job_repository::{JobPersistenceError, JobRepository};
pub use jobs_command::JobsCommand;
pub use jobs_query::JobsQuery;
pub use login_service::LoginService;
pub use registration_service::RegistrationService;
pub use user_repository::{UserPersistenceError, UserRepository};
pub use users_query::UsersQuery;

#[cfg(test)]
pub use job_repository::MockJobRepository;
#[cfg(test)]
pub use jobs_command::MockJobsCommand;
#[cfg(test)]
pub use jobs_query::MockJobsQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use registration_service::MockRegistrationService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use users_query::MockUsersQuery;
