//! Embedded schema migrations.
//!
//! Applied once at startup over a dedicated connection. `diesel_migrations`
//! is synchronous, so the async connection is wrapped and driven from a
//! blocking task.

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::{AsyncConnection as _, AsyncPgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness as _, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    /// A migration failed to run.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

/// Apply every pending migration to the database at `database_url`.
///
/// # Errors
///
/// [`MigrationError::Connect`] when the database is unreachable and
/// [`MigrationError::Apply`] when a migration fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let conn = AsyncPgConnection::establish(database_url)
        .await
        .map_err(|err| MigrationError::Connect {
            message: err.to_string(),
        })?;

    let applied = tokio::task::spawn_blocking(move || {
        let mut harness: AsyncConnectionWrapper<AsyncPgConnection> =
            AsyncConnectionWrapper::from(conn);
        harness
            .run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|err| err.to_string())
    })
    .await
    .map_err(|err| MigrationError::Apply {
        message: err.to_string(),
    })?
    .map_err(|message| MigrationError::Apply { message })?;

    info!(applied, "database migrations up to date");
    Ok(())
}
