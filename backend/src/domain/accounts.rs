//! Account service: registration, logon and session user lookup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    LoginService, RegistrationService, UserPersistenceError, UserRepository, UsersQuery,
};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, NewAccount, PasswordHash, User, UserAccount, UserId,
};

/// Message shown for any failed logon.
pub const INCORRECT_CREDENTIALS: &str = "Incorrect credentials.";
/// Message shown when registering with a taken email.
pub const EMAIL_TAKEN: &str = "That email address is already registered.";

/// Implements the account driving ports over a [`UserRepository`].
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
}

impl<U> AccountService<U> {
    /// Wrap a user repository.
    #[must_use]
    pub const fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(EMAIL_TAKEN),
    }
}

#[async_trait]
impl<U> LoginService for AccountService<U>
where
    U: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(Error::unauthorized(INCORRECT_CREDENTIALS));
        };
        let account = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_persistence_error)?;
        match account {
            Some(account) if account.password_hash.verify(credentials.password()) => {
                Ok(*account.user.id())
            }
            _ => {
                debug!(email = %email, "logon rejected");
                Err(Error::unauthorized(INCORRECT_CREDENTIALS))
            }
        }
    }
}

#[async_trait]
impl<U> RegistrationService for AccountService<U>
where
    U: UserRepository,
{
    async fn register(&self, account: &NewAccount) -> Result<User, Error> {
        let password_hash = PasswordHash::hash(account.password())
            .map_err(|err| Error::internal(err.to_string()))?;
        let user = User::new(
            UserId::random(),
            account.name().clone(),
            account.email().clone(),
        );
        let record = UserAccount {
            user,
            password_hash,
        };
        self.users
            .insert(&record)
            .await
            .map_err(map_persistence_error)?;
        Ok(record.user)
    }
}

#[async_trait]
impl<U> UsersQuery for AccountService<U>
where
    U: UserRepository,
{
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::UserName;
    use rstest::rstest;

    fn account_with_password(password: &str) -> UserAccount {
        UserAccount {
            user: User::new(
                UserId::random(),
                UserName::new("Ada").expect("name"),
                EmailAddress::new("ada@example.com").expect("email"),
            ),
            password_hash: PasswordHash::hash(password).expect("hash"),
        }
    }

    fn service(repo: MockUserRepository) -> AccountService<MockUserRepository> {
        AccountService::new(Arc::new(repo))
    }

    #[rstest]
    #[tokio::test]
    async fn authenticate_accepts_matching_password() {
        let account = account_with_password("secret1");
        let expected = *account.user.id();
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .times(1)
            .return_once(move |_| Ok(Some(account)));

        let creds = LoginCredentials::try_from_parts("ADA@example.com", "secret1").expect("creds");
        let id = service(repo).authenticate(&creds).await.expect("logon");
        assert_eq!(id, expected);
    }

    #[rstest]
    #[case(Some("secret1"), "wrong-password")]
    #[case(None, "secret1")]
    #[tokio::test]
    async fn authenticate_rejects_with_one_message(
        #[case] stored: Option<&'static str>,
        #[case] attempt: &str,
    ) {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .times(1)
            .return_once(move |_| Ok(stored.map(account_with_password)));

        let creds = LoginCredentials::try_from_parts("ada@example.com", attempt).expect("creds");
        let err = service(repo).authenticate(&creds).await.expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), INCORRECT_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn register_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .withf(|record| record.password_hash.verify("secret1"))
            .times(1)
            .return_once(|_| Ok(()));

        let new_account =
            NewAccount::try_from_parts("Ada", "ada@example.com", "secret1", "secret1")
                .expect("valid registration");
        let user = service(repo).register(&new_account).await.expect("registered");
        assert_eq!(user.email().as_ref(), "ada@example.com");
    }

    #[rstest]
    #[tokio::test]
    async fn register_maps_duplicate_email_to_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .times(1)
            .return_once(|_| Err(UserPersistenceError::duplicate_email("ada@example.com")));

        let new_account =
            NewAccount::try_from_parts("Ada", "ada@example.com", "secret1", "secret1")
                .expect("valid registration");
        let err = service(repo).register(&new_account).await.expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), EMAIL_TAKEN);
    }
}
