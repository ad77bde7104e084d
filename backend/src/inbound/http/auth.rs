//! Authentication gate for protected pages.
//!
//! [`CurrentUser`] resolves the session's user or redirects to the logon
//! page. [`AuthenticatedForm`] runs the same gate and then validates the
//! CSRF token of a form post, in that order, so an anonymous forged post is
//! answered by the logon redirect and never has its body inspected.

use actix_session::SessionExt;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::csrf::{CsrfSubmission, verify_submission};
use super::flash::Flash;
use super::redirect::RedirectTo;
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::{Error, User};

/// Message flashed when an anonymous visitor requests a protected page.
pub const LOGON_REQUIRED: &str = "You can't access that page before logon.";
/// Where anonymous visitors are sent.
pub const LOGON_PATH: &str = "/sessions/logon";

/// Resolve the logged-on user, if any.
///
/// An id that no longer names a user is dropped from the session.
pub async fn session_user(state: &HttpState, session: &SessionContext) -> Result<Option<User>, Error> {
    let Some(id) = session.user_id()? else {
        return Ok(None);
    };
    let user = state.users.find_user(&id).await?;
    if user.is_none() {
        warn!(user_id = %id, "session refers to a missing user");
        session.clear_user();
    }
    Ok(user)
}

async fn require_user(req: &HttpRequest) -> Result<User, actix_web::Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state is not configured"))?;
    let session = SessionContext::new(req.get_session());
    if let Some(user) = session_user(state, &session).await? {
        return Ok(user);
    }

    debug!(path = req.path(), "anonymous request to protected page");
    session.clear_user();
    session.push_flash(Flash::error(LOGON_REQUIRED))?;
    Err(RedirectTo::new(LOGON_PATH).into())
}

/// The logged-on user, required by every jobs page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Unwrap the user.
    #[must_use]
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let request = req.clone();
        Box::pin(async move { require_user(&request).await.map(Self) })
    }
}

/// A CSRF-checked form posted by the logged-on user.
#[derive(Debug)]
pub struct AuthenticatedForm<T> {
    /// The logged-on user.
    pub user: User,
    /// The verified form body.
    pub form: T,
}

impl<T> FromRequest for AuthenticatedForm<T>
where
    T: CsrfSubmission + DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let request = req.clone();
        let pending = web::Form::<T>::from_request(&request, payload);
        Box::pin(async move {
            let user = require_user(&request).await?;
            let session = SessionContext::new(request.get_session());
            let submitted = pending.await.map(web::Form::into_inner);
            let form = verify_submission(&request, &session, submitted)?;
            Ok(Self { user, form })
        })
    }
}
