//! In-memory `UserRepository`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserAccount, UserId};

/// Accounts keyed by id, with email uniqueness enforced on insert.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = self
            .accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let email = account.user.email();
        if accounts.values().any(|existing| existing.user.email() == email) {
            return Err(UserPersistenceError::duplicate_email(email.as_ref()));
        }
        accounts.insert(*account.user.id(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let accounts = self
            .accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(accounts.get(id).map(|account| account.user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = self
            .accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(accounts
            .values()
            .find(|account| account.user.email() == email)
            .cloned())
    }
}
