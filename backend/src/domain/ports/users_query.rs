//! Driving port for user lookups made on behalf of a session.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Read port used by the authentication gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Resolve the user behind a session, if it still exists.
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}
