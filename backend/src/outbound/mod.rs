//! Outbound adapters implementing the driven note ports.
//!
//! - **persistence**: PostgreSQL through Diesel and `diesel-async`.
//! - **memory**: process-local store for runs without a database.

pub mod memory;
pub mod persistence;
