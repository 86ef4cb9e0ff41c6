//! HTTP inbound adapter exposing the notes REST endpoints.

pub mod error;
pub mod health;
pub mod notes;
pub mod state;
mod validation;

pub use error::ApiResult;
