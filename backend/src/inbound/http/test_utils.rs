//! Test helpers for inbound HTTP components.
//!
//! Compiled for unit tests and, behind the `test-support` feature, for the
//! end-to-end tests under `backend/tests/`.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use mockable::DefaultClock;

use super::state::HttpState;
use crate::domain::ports::UsersQuery;
use crate::domain::{AccountService, JobsService};
use crate::outbound::memory::{InMemoryJobRepository, InMemoryUserRepository};

/// Name of the session cookie used throughout the application.
pub const SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
#[must_use]
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set by a response, if any.
#[must_use]
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// In-memory repositories plus the state built over them.
///
/// Tests keep the repositories to seed data or inspect what handlers stored.
pub struct InMemoryApp {
    /// Account storage behind `state`.
    pub users: Arc<InMemoryUserRepository>,
    /// Job storage behind `state`.
    pub jobs: Arc<InMemoryJobRepository>,
    /// Handler state over both repositories.
    pub state: HttpState,
}

impl InMemoryApp {
    /// Empty repositories and the state over them.
    #[must_use]
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let jobs = Arc::new(InMemoryJobRepository::new());
        let state = HttpState::from_services(
            Arc::new(AccountService::new(users.clone())),
            Arc::new(JobsService::new(jobs.clone(), Arc::new(DefaultClock))),
        );
        Self { users, jobs, state }
    }
}

impl Default for InMemoryApp {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory state whose user lookups go through `users`.
#[must_use]
pub fn state_with_users(users: Arc<dyn UsersQuery>) -> HttpState {
    let mut state = InMemoryApp::new().state;
    state.users = users;
    state
}
