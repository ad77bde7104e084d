//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities for users and job applications,
//! the validation rules that guard them, and the services that implement the
//! driving ports used by inbound adapters.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures.
//! - User, UserId, UserName, EmailAddress, UserAccount: identities.
//! - Job, JobId, JobDraft, JobStatus: owner-scoped job applications.
//! - AccountService, JobsService, DemoDataSeeder: port implementations.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod job;
pub mod jobs_service;
pub mod password;
pub mod ports;
pub mod seed;
pub mod trace_id;
pub mod user;

pub use self::accounts::{AccountService, EMAIL_TAKEN, INCORRECT_CREDENTIALS};
pub use self::auth::{
    LoginCredentials, LoginValidationError, NewAccount, PASSWORD_MIN,
    RegistrationValidationError,
};
pub use self::error::{Error, ErrorCode};
pub use self::job::{
    COMPANY_MAX, Job, JobDraft, JobId, JobStatus, JobValidationError, POSITION_MAX,
};
pub use self::jobs_service::JobsService;
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::seed::{DEMO_JOB_COUNT, DEMO_PASSWORD, DemoDataSeeder};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EMAIL_MAX, EmailAddress, USER_NAME_MAX, User, UserAccount, UserId, UserName,
    UserValidationError,
};
