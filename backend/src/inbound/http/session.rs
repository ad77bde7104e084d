//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers deal in domain terms: the logged-on
//! user id, queued flash messages and the current CSRF token.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use super::csrf;
use super::flash::{Flash, Flashes};
use crate::domain::{Error, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const CSRF_TOKEN_KEY: &str = "csrf_token";
pub(crate) const FLASH_KEY: &str = "flash";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    ///
    /// A value that is not a valid id is reported as absent.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let stored = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match stored {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Forget the logged-on user but keep the rest of the session.
    pub fn clear_user(&self) {
        self.0.remove(USER_ID_KEY);
    }

    /// Drop every session value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Keep the session state but issue it under a fresh session key.
    pub fn renew(&self) {
        self.0.renew();
    }

    /// Queue a flash message for the next rendered page.
    pub fn push_flash(&self, flash: Flash) -> Result<(), Error> {
        let mut queued = self.queued_flashes();
        queued.push(flash);
        self.0
            .insert(FLASH_KEY, queued)
            .map_err(|error| Error::internal(format!("failed to store flash: {error}")))
    }

    /// Remove and return all queued flash messages.
    pub fn take_flashes(&self) -> Flashes {
        match self.0.remove_as::<Vec<Flash>>(FLASH_KEY) {
            Some(Ok(flashes)) => flashes.into_iter().collect(),
            Some(Err(raw)) => {
                warn!(raw = %raw, "discarding unreadable flash messages");
                Flashes::default()
            }
            None => Flashes::default(),
        }
    }

    fn queued_flashes(&self) -> Vec<Flash> {
        self.0
            .get::<Vec<Flash>>(FLASH_KEY)
            .unwrap_or_else(|error| {
                warn!("discarding unreadable flash messages: {error}");
                None
            })
            .unwrap_or_default()
    }

    /// Generate a fresh CSRF token, replacing any previous one.
    pub fn issue_csrf_token(&self) -> Result<String, Error> {
        let token = csrf::generate_token();
        self.0
            .insert(CSRF_TOKEN_KEY, &token)
            .map_err(|error| Error::internal(format!("failed to store csrf token: {error}")))?;
        Ok(token)
    }

    /// The CSRF token issued with the last rendered page, if any.
    pub fn csrf_token(&self) -> Option<String> {
        self.0.get::<String>(CSRF_TOKEN_KEY).unwrap_or_else(|error| {
            warn!("unreadable csrf token in session: {error}");
            None
        })
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
