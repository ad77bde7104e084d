//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories only translate between Diesel rows and domain types. Row
//! structs and table definitions stay private to this module.
//!
//! ```ignore
//! use jobs_tracker::outbound::persistence::{DbPool, DieselJobRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/jobs")).await?;
//! let jobs = DieselJobRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_job_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_job_repository::DieselJobRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
