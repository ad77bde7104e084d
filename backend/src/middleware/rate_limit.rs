//! Fixed-window request limiter keyed by client IP.
//!
//! Each client gets `max_requests` per window. The window starts with the
//! client's first request; once it elapses the count resets. Requests over
//! the limit receive `429 Too Many Requests` without reaching the inner
//! service.
//!
//! Clients are keyed by the socket peer address. Behind a reverse proxy that
//! address is the proxy's, so [`RateLimit::trusting_proxy`] switches to the
//! address reported in `Forwarded` or `X-Forwarded-For`.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

/// Body returned to throttled clients for a window of `window`.
///
/// Whole minutes are reported in minutes, anything else in seconds.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use jobs_tracker::middleware::rate_limit::rate_limit_message;
///
/// assert_eq!(
///     rate_limit_message(Duration::from_secs(900)),
///     "Too many requests from this IP, please try again after 15 minutes."
/// );
/// ```
#[must_use]
pub fn rate_limit_message(window: Duration) -> String {
    let secs = window.as_secs();
    let span = match (secs.checked_div(60), secs.checked_rem(60)) {
        (Some(1), Some(0)) => "1 minute".to_owned(),
        (Some(minutes), Some(0)) if minutes > 0 => format!("{minutes} minutes"),
        _ if secs == 1 => "1 second".to_owned(),
        _ => format!("{secs} seconds"),
    };
    format!("Too many requests from this IP, please try again after {span}.")
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of recording a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Counted against the client's window.
    Allowed,
    /// Rejected; the window resets after the contained duration.
    Limited(Duration),
}

/// Shared per-client counters.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    message: String,
    clients: Mutex<HashMap<Option<IpAddr>, Window>>,
}

impl FixedWindowLimiter {
    /// Allow `max_requests` per client in each `window`.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            message: rate_limit_message(window),
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Body sent with each `429` response.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Record a request from `client` at `now`.
    ///
    /// Requests without a known peer address share one bucket.
    #[must_use]
    pub fn check(&self, client: Option<IpAddr>, now: Instant) -> Decision {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(window) = clients.get_mut(&client) {
            let elapsed = now.saturating_duration_since(window.started);
            if elapsed < self.window {
                if window.count >= self.max_requests {
                    return Decision::Limited(self.window.saturating_sub(elapsed));
                }
                window.count += 1;
                return Decision::Allowed;
            }
        }

        let period = self.window;
        clients.retain(|_, window| now.saturating_duration_since(window.started) < period);
        if self.max_requests == 0 {
            return Decision::Limited(period);
        }
        clients.insert(
            client,
            Window {
                started: now,
                count: 1,
            },
        );
        Decision::Allowed
    }

    #[cfg(test)]
    fn tracked_clients(&self) -> usize {
        self.clients
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Middleware applying a [`FixedWindowLimiter`].
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use actix_web::App;
/// use jobs_tracker::middleware::RateLimit;
///
/// let app = App::new().wrap(RateLimit::new(100, Duration::from_secs(900)));
/// ```
#[derive(Clone, Debug)]
pub struct RateLimit {
    limiter: Arc<FixedWindowLimiter>,
    trust_proxy: bool,
}

impl RateLimit {
    /// Limit each peer address to `max_requests` per `window`.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            limiter: Arc::new(FixedWindowLimiter::new(max_requests, window)),
            trust_proxy: false,
        }
    }

    /// Key clients on the forwarded address instead of the peer address.
    ///
    /// Only enable this behind a proxy that overwrites the forwarding
    /// headers; otherwise clients choose their own bucket.
    #[must_use]
    pub const fn trusting_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }
}

fn parse_client_addr(raw: &str) -> Option<IpAddr> {
    raw.parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}

fn client_ip(req: &ServiceRequest, trust_proxy: bool) -> Option<IpAddr> {
    if trust_proxy {
        req.connection_info()
            .realip_remote_addr()
            .and_then(parse_client_addr)
    } else {
        req.peer_addr().map(|addr| addr.ip())
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: Arc::clone(&self.limiter),
            trust_proxy: self.trust_proxy,
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<FixedWindowLimiter>,
    trust_proxy: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = client_ip(&req, self.trust_proxy);
        match self.limiter.check(client, Instant::now()) {
            Decision::Allowed => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Decision::Limited(retry_after) => {
                warn!(client = ?client, path = req.path(), "rate limit exceeded");
                let response = HttpResponse::TooManyRequests()
                    .insert_header((header::RETRY_AFTER, retry_after.as_secs().max(1)))
                    .content_type(header::ContentType::plaintext())
                    .body(self.limiter.message().to_owned());
                Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use std::net::Ipv4Addr;

    const WINDOW: Duration = Duration::from_secs(60);

    fn ip(last: u8) -> Option<IpAddr> {
        Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, last)))
    }

    #[rstest]
    fn limits_after_max_requests() {
        let limiter = FixedWindowLimiter::new(2, WINDOW);
        let now = Instant::now();
        assert_eq!(limiter.check(ip(1), now), Decision::Allowed);
        assert_eq!(limiter.check(ip(1), now), Decision::Allowed);
        assert!(matches!(limiter.check(ip(1), now), Decision::Limited(_)));
        assert_eq!(limiter.check(ip(2), now), Decision::Allowed);
    }

    #[rstest]
    fn window_resets_after_elapsing() {
        let limiter = FixedWindowLimiter::new(1, WINDOW);
        let start = Instant::now();
        assert_eq!(limiter.check(ip(1), start), Decision::Allowed);
        assert!(matches!(limiter.check(ip(1), start), Decision::Limited(_)));
        assert_eq!(limiter.check(ip(1), start + WINDOW), Decision::Allowed);
    }

    #[rstest]
    fn expired_clients_are_pruned() {
        let limiter = FixedWindowLimiter::new(5, WINDOW);
        let start = Instant::now();
        assert_eq!(limiter.check(ip(1), start), Decision::Allowed);
        assert_eq!(limiter.check(ip(2), start), Decision::Allowed);
        assert_eq!(limiter.check(ip(3), start + WINDOW), Decision::Allowed);
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[rstest]
    #[case(900, "15 minutes")]
    #[case(60, "1 minute")]
    #[case(90, "90 seconds")]
    #[case(30, "30 seconds")]
    #[case(1, "1 second")]
    fn message_names_the_configured_window(#[case] secs: u64, #[case] span: &str) {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(secs));
        assert_eq!(
            limiter.message(),
            format!("Too many requests from this IP, please try again after {span}.")
        );
    }

    #[rstest]
    #[case("203.0.113.7", Some(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7))))]
    #[case("203.0.113.7:4000", Some(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7))))]
    #[case("not-an-address", None)]
    fn parses_forwarded_addresses(#[case] raw: &str, #[case] expected: Option<IpAddr>) {
        assert_eq!(parse_client_addr(raw), expected);
    }

    #[actix_web::test]
    async fn rejects_excess_requests_with_429() {
        let window = Duration::from_secs(120);
        let app = actix_test::init_service(
            App::new()
                .wrap(RateLimit::new(1, window))
                .route("/", web::get().to(|| async { "ok" })),
        )
        .await;
        let peer = SocketAddr::from(([10, 0, 0, 9], 4000));

        let first = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/").peer_addr(peer).to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/").peer_addr(peer).to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(second.headers().contains_key(header::RETRY_AFTER));
        let body = actix_test::read_body(second).await;
        assert_eq!(body, rate_limit_message(window).as_bytes());
        assert_eq!(
            body,
            "Too many requests from this IP, please try again after 2 minutes.".as_bytes()
        );
    }

    async fn statuses_for_forwarded_client(trust_proxy: bool) -> (StatusCode, StatusCode) {
        let app = actix_test::init_service(
            App::new()
                .wrap(RateLimit::new(1, WINDOW).trusting_proxy(trust_proxy))
                .route("/", web::get().to(|| async { "ok" })),
        )
        .await;
        let via_proxy = |last: u8| {
            actix_test::TestRequest::get()
                .uri("/")
                .peer_addr(SocketAddr::from(([10, 0, 0, last], 4000)))
                .insert_header(("x-forwarded-for", "203.0.113.7"))
                .to_request()
        };
        let first = actix_test::call_service(&app, via_proxy(1)).await.status();
        let second = actix_test::call_service(&app, via_proxy(2)).await.status();
        (first, second)
    }

    #[rstest]
    #[case(true, StatusCode::TOO_MANY_REQUESTS)]
    #[case(false, StatusCode::OK)]
    #[actix_web::test]
    async fn forwarded_address_is_used_only_when_trusted(
        #[case] trust_proxy: bool,
        #[case] second_status: StatusCode,
    ) {
        let (first, second) = statuses_for_forwarded_client(trust_proxy).await;
        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, second_status);
    }
}
