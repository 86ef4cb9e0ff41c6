//! PostgreSQL persistence through Diesel.
//!
//! Repositories translate between Diesel rows and domain types and hold no
//! business rules. Row structs (`models`) and table definitions (`schema`)
//! never leave this module.
//!
//! ```no_run
//! use notes_backend::outbound::persistence::{DbPool, DieselNoteRepository, PoolConfig};
//!
//! # async fn connect() -> Result<(), notes_backend::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://notes@localhost/notes")).await?;
//! let repository = DieselNoteRepository::new(pool);
//! # let _ = repository;
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_note_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_note_repository::DieselNoteRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
