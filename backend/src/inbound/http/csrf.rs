//! Synchroniser-token CSRF protection for form posts.
//!
//! Every rendered page stores a fresh random token in the session and embeds
//! it in its forms as `_csrf`. A mutating request is accepted only when the
//! submitted value matches the stored one.

use actix_session::SessionExt;
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::LocalBoxFuture;
use rand::RngCore;
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use tracing::warn;
use url::Url;

use super::flash::Flash;
use super::redirect::RedirectTo;
use super::session::SessionContext;

/// Message flashed when a submission carries no valid token.
pub const CSRF_FAILURE: &str = "Invalid or missing security token. Please try again.";

const TOKEN_BYTES: usize = 32;

/// Generate a new hex-encoded token.
pub(crate) fn generate_token() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Compare tokens through their SHA-256 digests.
///
/// Hashing both sides first means the comparison never stops at the first
/// differing byte of the secret itself.
#[must_use]
pub fn tokens_match(expected: &str, submitted: &str) -> bool {
    Sha256::digest(expected.as_bytes()) == Sha256::digest(submitted.as_bytes())
}

/// Form payloads that carry a CSRF token.
pub trait CsrfSubmission {
    /// Value of the form's `_csrf` field.
    fn csrf_token(&self) -> &str;
}

/// Check a parsed form against the session token.
///
/// On failure the rejection is flashed and the caller is sent back to the
/// page it came from.
pub(crate) fn verify_submission<T: CsrfSubmission>(
    req: &HttpRequest,
    session: &SessionContext,
    form: Result<T, actix_web::Error>,
) -> Result<T, RedirectTo> {
    let issued = session.csrf_token();
    let reason = match form {
        Err(_) => "unreadable form body",
        Ok(submitted) => match issued {
            None => "no token issued for session",
            Some(expected)
                if !submitted.csrf_token().is_empty()
                    && tokens_match(&expected, submitted.csrf_token()) =>
            {
                return Ok(submitted);
            }
            Some(_) => "token mismatch",
        },
    };

    warn!(
        status = 403,
        method = %req.method(),
        path = req.path(),
        reason,
        "csrf validation failed"
    );
    if let Err(error) = session.push_flash(Flash::error(CSRF_FAILURE)) {
        warn!(error = %error, "failed to flash csrf rejection");
    }
    Err(reject_target(req))
}

fn reject_target(req: &HttpRequest) -> RedirectTo {
    RedirectTo::new(same_origin_referer(req).unwrap_or_else(|| "/".to_owned()))
}

/// Path and query of the `Referer` header when it points at this host.
fn same_origin_referer(req: &HttpRequest) -> Option<String> {
    let raw = req.headers().get(header::REFERER)?.to_str().ok()?;
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;
    let authority = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    };
    if !authority.eq_ignore_ascii_case(req.connection_info().host()) {
        return None;
    }
    let mut target = url.path().to_owned();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    Some(target)
}

/// Form extractor that only yields payloads with a valid CSRF token.
///
/// Used on routes that do not require a logged-on user; protected routes use
/// [`AuthenticatedForm`](super::auth::AuthenticatedForm), which checks the
/// session user first.
#[derive(Debug)]
pub struct CsrfForm<T>(pub T);

impl<T> CsrfForm<T> {
    /// Unwrap the verified form.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for CsrfForm<T>
where
    T: CsrfSubmission + DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let request = req.clone();
        let pending = web::Form::<T>::from_request(&request, payload);
        Box::pin(async move {
            let session = SessionContext::new(request.get_session());
            let submitted = pending.await.map(web::Form::into_inner);
            Ok(Self(verify_submission(&request, &session, submitted)?))
        })
    }
}
