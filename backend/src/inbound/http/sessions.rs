//! Account routes under `/sessions`: registration, logon and logoff.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::info;

use super::auth::{LOGON_PATH, session_user};
use super::csrf::{CsrfForm, CsrfSubmission};
use super::error::ApiResult;
use super::flash::Flash;
use super::redirect::{flash_redirect, found};
use super::session::SessionContext;
use super::state::HttpState;
use super::views::{LogonPage, PageChrome, RegisterPage, render};
use crate::domain::{
    Error, ErrorCode, INCORRECT_CREDENTIALS, LoginCredentials, NewAccount, UserId,
};

/// Fields posted by the logon form.
#[derive(Deserialize)]
pub struct LogonForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(rename = "_csrf", default)]
    csrf: String,
}

impl CsrfSubmission for LogonForm {
    fn csrf_token(&self) -> &str {
        &self.csrf
    }
}

/// Fields posted by the registration form.
#[derive(Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    password1: String,
    #[serde(rename = "_csrf", default)]
    csrf: String,
}

impl CsrfSubmission for RegisterForm {
    fn csrf_token(&self) -> &str {
        &self.csrf
    }
}

/// The logoff form carries only its token.
#[derive(Deserialize)]
pub struct LogoffForm {
    #[serde(rename = "_csrf", default)]
    csrf: String,
}

impl CsrfSubmission for LogoffForm {
    fn csrf_token(&self) -> &str {
        &self.csrf
    }
}

/// Start a fresh session for `user_id`.
fn log_on(session: &SessionContext, user_id: &UserId) -> Result<(), Error> {
    session.renew();
    session.persist_user(user_id)?;
    info!(user_id = %user_id, "user logged on");
    Ok(())
}

/// Render the logon form.
#[get("/sessions/logon")]
pub async fn logon_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session_user(&state, &session).await?;
    let chrome = PageChrome::build(&session, user.as_ref())?;
    render(&LogonPage {
        chrome,
        email: String::new(),
    })
}

/// Check credentials and start a session.
#[post("/sessions/logon")]
pub async fn logon(
    state: web::Data<HttpState>,
    session: SessionContext,
    submission: CsrfForm<LogonForm>,
) -> ApiResult<HttpResponse> {
    let form = submission.into_inner();
    let Ok(credentials) = LoginCredentials::try_from_parts(&form.email, &form.password) else {
        return flash_redirect(&session, Flash::error(INCORRECT_CREDENTIALS), LOGON_PATH);
    };
    match state.login.authenticate(&credentials).await {
        Ok(user_id) => {
            log_on(&session, &user_id)?;
            Ok(found("/"))
        }
        Err(error) if error.code() == ErrorCode::Unauthorized => {
            flash_redirect(&session, Flash::error(error.message()), LOGON_PATH)
        }
        Err(error) => Err(error),
    }
}

/// Render the registration form.
#[get("/sessions/register")]
pub async fn register_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session_user(&state, &session).await?;
    let chrome = PageChrome::build(&session, user.as_ref())?;
    render(&RegisterPage {
        chrome,
        name: String::new(),
        email: String::new(),
    })
}

/// Create an account and log it on.
#[post("/sessions/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    submission: CsrfForm<RegisterForm>,
) -> ApiResult<HttpResponse> {
    let form = submission.into_inner();
    let failure = match NewAccount::try_from_parts(
        &form.name,
        &form.email,
        &form.password,
        &form.password1,
    ) {
        Ok(account) => match state.registration.register(&account).await {
            Ok(user) => {
                log_on(&session, user.id())?;
                return Ok(found("/"));
            }
            Err(error) if error.code() == ErrorCode::Conflict => error.message().to_owned(),
            Err(error) => return Err(error),
        },
        Err(invalid) => invalid.to_string(),
    };

    session.push_flash(Flash::error(failure))?;
    let chrome = PageChrome::build(&session, None)?;
    render(&RegisterPage {
        chrome,
        name: form.name,
        email: form.email,
    })
}

/// End the session.
#[post("/sessions/logoff")]
pub async fn logoff(session: SessionContext, _form: CsrfForm<LogoffForm>) -> HttpResponse {
    session.purge();
    found("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockLoginService, MockRegistrationService};
    use crate::domain::{EmailAddress, User, UserName};
    use crate::inbound::http::test_utils::{InMemoryApp, session_cookie, test_session_middleware};
    use actix_web::cookie::Cookie;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use std::sync::Arc;

    fn sessions_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .service(logon_page)
            .service(logon)
            .service(register_page)
            .service(register)
            .service(logoff)
    }

    /// Fetch a form page and return its session cookie and CSRF token.
    async fn open_form<S>(app: &S, uri: &str) -> (Cookie<'static>, String)
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let res = test::call_service(app, test::TestRequest::get().uri(uri).to_request()).await;
        let cookie = session_cookie(&res).expect("session cookie");
        let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8");
        let token = html
            .split(r#"name="_csrf" value=""#)
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .expect("csrf token in form")
            .to_owned();
        (cookie, token)
    }

    fn location(res: &actix_web::dev::ServiceResponse) -> Option<&str> {
        res.headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }

    #[actix_web::test]
    async fn successful_logon_redirects_home() {
        let mut login = MockLoginService::new();
        login
            .expect_authenticate()
            .withf(|creds| creds.email() == "ada@example.com")
            .times(1)
            .return_once(|_| Ok(UserId::random()));
        let mut state = InMemoryApp::new().state;
        state.login = Arc::new(login);
        let app = test::init_service(sessions_app(state)).await;
        let (cookie, token) = open_form(&app, "/sessions/logon").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/sessions/logon")
                .cookie(cookie)
                .set_form([
                    ("email", "Ada@Example.com"),
                    ("password", "secret1"),
                    ("_csrf", token.as_str()),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), Some("/"));
    }

    #[actix_web::test]
    async fn failed_logon_returns_to_form() {
        let mut login = MockLoginService::new();
        login
            .expect_authenticate()
            .times(1)
            .return_once(|_| Err(Error::unauthorized(INCORRECT_CREDENTIALS)));
        let mut state = InMemoryApp::new().state;
        state.login = Arc::new(login);
        let app = test::init_service(sessions_app(state)).await;
        let (cookie, token) = open_form(&app, "/sessions/logon").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/sessions/logon")
                .cookie(cookie)
                .set_form([
                    ("email", "ada@example.com"),
                    ("password", "nope"),
                    ("_csrf", token.as_str()),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), Some(LOGON_PATH));
        let cookie = session_cookie(&res).expect("flash stored");
        let page = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(LOGON_PATH)
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let html = String::from_utf8(test::read_body(page).await.to_vec()).expect("utf8");
        assert!(html.contains(INCORRECT_CREDENTIALS));
    }

    #[actix_web::test]
    async fn invalid_registration_rerenders_with_values() {
        let mut registration = MockRegistrationService::new();
        registration.expect_register().never();
        let mut state = InMemoryApp::new().state;
        state.registration = Arc::new(registration);
        let app = test::init_service(sessions_app(state)).await;
        let (cookie, token) = open_form(&app, "/sessions/register").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/sessions/register")
                .cookie(cookie)
                .set_form([
                    ("name", "Ada"),
                    ("email", "ada@example.com"),
                    ("password", "secret1"),
                    ("password1", "secret2"),
                    ("_csrf", token.as_str()),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8");
        assert!(html.contains("The passwords entered do not match."));
        assert!(html.contains(r#"value="ada@example.com""#));
    }

    #[actix_web::test]
    async fn duplicate_registration_flashes_conflict() {
        let mut registration = MockRegistrationService::new();
        registration
            .expect_register()
            .times(1)
            .return_once(|_| Err(Error::conflict(crate::domain::EMAIL_TAKEN)));
        let mut state = InMemoryApp::new().state;
        state.registration = Arc::new(registration);
        let app = test::init_service(sessions_app(state)).await;
        let (cookie, token) = open_form(&app, "/sessions/register").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/sessions/register")
                .cookie(cookie)
                .set_form([
                    ("name", "Ada"),
                    ("email", "ada@example.com"),
                    ("password", "secret1"),
                    ("password1", "secret1"),
                    ("_csrf", token.as_str()),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let html = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8");
        assert!(html.contains(crate::domain::EMAIL_TAKEN));
    }

    #[actix_web::test]
    async fn registration_logs_the_new_user_on() {
        let user = User::new(
            UserId::random(),
            UserName::new("Ada").expect("name"),
            EmailAddress::new("ada@example.com").expect("email"),
        );
        let mut registration = MockRegistrationService::new();
        registration
            .expect_register()
            .times(1)
            .return_once(move |_| Ok(user));
        let mut state = InMemoryApp::new().state;
        state.registration = Arc::new(registration);
        let app = test::init_service(sessions_app(state)).await;
        let (cookie, token) = open_form(&app, "/sessions/register").await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/sessions/register")
                .cookie(cookie)
                .set_form([
                    ("name", "Ada"),
                    ("email", "ada@example.com"),
                    ("password", "secret1"),
                    ("password1", "secret1"),
                    ("_csrf", token.as_str()),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), Some("/"));
    }

    #[actix_web::test]
    async fn logoff_without_token_keeps_session() {
        let app = test::init_service(sessions_app(InMemoryApp::new().state)).await;
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/sessions/logoff")
                .set_form([("_csrf", "forged")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(location(&res), Some("/"));
    }
}
