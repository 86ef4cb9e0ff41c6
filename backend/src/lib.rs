//! Notes service library: domain, adapters, and HTTP plumbing.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
