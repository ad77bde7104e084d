//! Authentication primitives: logon credentials and registration requests.
//!
//! Handlers parse form input through these constructors before talking to a
//! port or service, so services only ever see validated values.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, UserName, UserValidationError};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when logon form values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated logon credentials.
///
/// ## Invariants
/// - `email` is trimmed, lowercased and non-empty.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use jobs_tracker::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com", "pw").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalised,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used to look up the account.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Plaintext password, zeroed on drop.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reasons a registration request is rejected before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// Name or email was rejected.
    User(UserValidationError),
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
    /// Password and confirmation differ.
    PasswordMismatch,
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(err) => err.fmt(f),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::PasswordMismatch => write!(f, "The passwords entered do not match."),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

/// Validated registration request.
#[derive(Debug, Clone)]
pub struct NewAccount {
    name: UserName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl NewAccount {
    /// Validate registration form inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let user_name = UserName::new(name)?;
        let address = EmailAddress::new(email)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if password != password_confirmation {
            return Err(RegistrationValidationError::PasswordMismatch);
        }
        Ok(Self {
            name: user_name,
            email: address,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Validated display name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Validated, lowercased email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password, zeroed on drop.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
