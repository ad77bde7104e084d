//! HTTP inbound adapter: server-rendered pages, forms and the JSON
//! multiply endpoint.

pub mod auth;
pub mod csrf;
pub mod error;
pub mod flash;
pub mod health;
pub mod jobs;
pub mod multiply;
pub mod pages;
pub mod redirect;
pub mod routes;
pub mod session;
pub mod session_config;
pub mod sessions;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod views;

pub use error::ApiResult;
