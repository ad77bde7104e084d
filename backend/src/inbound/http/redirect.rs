//! Redirect responses and the short-circuit error used by request guards.

use std::fmt;

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};

use super::flash::Flash;
use super::session::SessionContext;
use crate::domain::Error;

/// Build a `302 Found` response pointing at `location`.
#[must_use]
pub fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_owned()))
        .finish()
}

/// Queue `flash` and redirect to `location`.
pub fn flash_redirect(
    session: &SessionContext,
    flash: Flash,
    location: &str,
) -> Result<HttpResponse, Error> {
    session.push_flash(flash)?;
    Ok(found(location))
}

/// Guard rejection that answers with a redirect instead of an error page.
///
/// Extractors return this after recording a flash message, so the handler
/// never runs and the user lands on `location` with feedback waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTo {
    location: String,
}

impl RedirectTo {
    /// Redirect to `location` once the extractor rejects.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Target of the redirect.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Display for RedirectTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "redirect to {}", self.location)
    }
}

impl ResponseError for RedirectTo {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        found(&self.location)
    }
}
