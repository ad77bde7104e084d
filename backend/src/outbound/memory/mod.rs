//! In-memory implementations of the driven ports.
//!
//! State lives behind a lock inside each repository and disappears with the
//! process.

mod job_repository;
mod user_repository;

pub use job_repository::InMemoryJobRepository;
pub use user_repository::InMemoryUserRepository;
