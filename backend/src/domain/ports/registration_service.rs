//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, NewAccount, User};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account and return the stored user.
    ///
    /// A taken email yields [`crate::domain::ErrorCode::Conflict`].
    async fn register(&self, account: &NewAccount) -> Result<User, Error>;
}
