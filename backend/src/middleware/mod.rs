//! Cross-cutting HTTP middleware.

pub mod rate_limit;
pub mod security_headers;
pub mod trace;

pub use rate_limit::RateLimit;
pub use security_headers::security_headers;
pub use trace::Trace;
