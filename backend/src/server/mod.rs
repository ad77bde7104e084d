//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub(crate) use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::body::MessageBody;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use jobs_tracker::inbound::http::health::{HealthState, live, ready};
use jobs_tracker::inbound::http::pages::not_found;
use jobs_tracker::inbound::http::routes::configure;
use jobs_tracker::inbound::http::state::HttpState;
use jobs_tracker::middleware::{RateLimit, Trace, security_headers};

/// Grace period for in-flight requests on shutdown.
const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    rate_limit: RateLimit,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        rate_limit,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let pages = web::scope("")
        .wrap(session)
        .wrap(rate_limit)
        .configure(configure);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(security_headers())
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(pages)
        .default_service(web::to(not_found))
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The rate limiter is created once so its counters are shared by every
/// worker.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        rate_limit_max,
        rate_limit_window,
        trust_proxy,
        ..
    } = config;
    let rate_limit = RateLimit::new(rate_limit_max, rate_limit_window).trusting_proxy(trust_proxy);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            rate_limit: rate_limit.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS)
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
