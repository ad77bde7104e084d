//! Shared helpers for the end-to-end HTTP tests.
//!
//! Integration tests compile as separate crates, so the app wiring and the
//! cookie-following client live here instead of being copied into each file.

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, Error, test, web};
use jobs_tracker::domain::ports::UserRepository;
use jobs_tracker::domain::{EmailAddress, PasswordHash, User, UserAccount, UserId, UserName};
use jobs_tracker::inbound::http::pages::not_found;
use jobs_tracker::inbound::http::routes::configure;
use jobs_tracker::inbound::http::state::HttpState;
use jobs_tracker::inbound::http::test_utils::{session_cookie, test_session_middleware};
use jobs_tracker::outbound::memory::InMemoryUserRepository;

/// Application with every page route and the not-found fallback.
pub fn app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .configure(configure)
        .default_service(web::to(not_found))
}

/// Response fields the tests assert on.
pub struct Page {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl Page {
    /// The CSRF token rendered into the page's forms.
    pub fn csrf_token(&self) -> String {
        self.body
            .split(r#"name="_csrf" value=""#)
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .expect("page renders a csrf field")
            .to_owned()
    }

    /// Number of table rows, header included.
    pub fn table_rows(&self) -> usize {
        self.body.matches("<tr>").count()
    }
}

/// Client that carries the session cookie between requests.
#[derive(Default)]
pub struct Browser {
    cookie: Option<Cookie<'static>>,
}

impl Browser {
    pub async fn get<S>(&mut self, app: &S, uri: &str) -> Page
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
    {
        self.send(app, test::TestRequest::get().uri(uri)).await
    }

    pub async fn post<S>(&mut self, app: &S, uri: &str, fields: &[(&str, &str)]) -> Page
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
    {
        self.send(app, test::TestRequest::post().uri(uri).set_form(fields))
            .await
    }

    /// Fetch `form_uri` and submit its CSRF token with `fields` to `action`.
    pub async fn submit<S>(
        &mut self,
        app: &S,
        form_uri: &str,
        action: &str,
        fields: &[(&str, &str)],
    ) -> Page
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
    {
        let token = self.get(app, form_uri).await.csrf_token();
        let mut fields = fields.to_vec();
        fields.push(("_csrf", token.as_str()));
        self.post(app, action, &fields).await
    }

    async fn send<S>(&mut self, app: &S, request: test::TestRequest) -> Page
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
    {
        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let res = test::call_service(app, request.to_request()).await;
        if let Some(cookie) = session_cookie(&res) {
            self.cookie = Some(cookie);
        }
        let status = res.status();
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = String::from_utf8(test::read_body(res).await.to_vec()).expect("utf8 body");
        Page {
            status,
            location,
            body,
        }
    }
}

/// Store an account directly in the repository.
pub async fn add_user(
    users: &InMemoryUserRepository,
    name: &str,
    email: &str,
    password: &str,
) -> UserId {
    let user = User::new(
        UserId::random(),
        UserName::new(name).expect("name"),
        EmailAddress::new(email).expect("email"),
    );
    let id = *user.id();
    users
        .insert(&UserAccount {
            user,
            password_hash: PasswordHash::hash(password).expect("hash"),
        })
        .await
        .expect("insert user");
    id
}

/// Log on through the form and return the authenticated client.
pub async fn log_on<S>(app: &S, email: &str, password: &str) -> Browser
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = Error>,
{
    let mut browser = Browser::default();
    let page = browser
        .submit(
            app,
            "/sessions/logon",
            "/sessions/logon",
            &[("email", email), ("password", password)],
        )
        .await;
    assert_eq!(page.status, StatusCode::FOUND);
    assert_eq!(page.location.as_deref(), Some("/"));
    browser
}
