//! Jobs tracker library: domain model, HTTP adapter, persistence adapters
//! and middleware. The `jobs-tracker` binary wires them into a server.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
