//! Shared PostgreSQL provisioning for integration tests.
//!
//! `NOTES_TEST_DATABASE_URL` names an existing database to test against.
//! Without it an embedded cluster is started through
//! `pg-embed-setup-unpriv`. A cluster that cannot start fails the suite so
//! CI breakage is not masked. Set `SKIP_TEST_CLUSTER` to a truthy value to
//! print a `SKIP-TEST-CLUSTER` marker and return early instead.
//!
//! All tests share one database and are serialised by [`TestDatabase`].

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use uuid::Uuid;

static DATABASE_URL: OnceLock<Option<String>> = OnceLock::new();
static SERIAL: Mutex<()> = Mutex::new(());

/// Exclusive access to the shared test database.
pub struct TestDatabase {
    pub url: String,
    _serial: MutexGuard<'static, ()>,
}

fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

fn embedded_database_url() -> Result<String, String> {
    let cluster = pg_embedded_setup_unpriv::test_support::shared_cluster_handle()
        .map_err(|err| format!("start embedded cluster: {err:?}"))?;
    let name = format!("notes_test_{}", Uuid::new_v4().simple());
    cluster
        .create_database(name.as_str())
        .map_err(|err| format!("create database: {err:?}"))?;
    Ok(cluster.connection().database_url(&name).to_string())
}

fn resolve_database_url() -> Option<String> {
    if let Some(url) = std::env::var("NOTES_TEST_DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
    {
        return Some(url);
    }
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: SKIP_TEST_CLUSTER is set");
        return None;
    }
    match embedded_database_url() {
        Ok(url) => Some(url),
        Err(reason) => {
            panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.")
        }
    }
}

/// Lock the shared database, or `None` when `SKIP_TEST_CLUSTER` is set.
///
/// # Panics
///
/// When the embedded cluster cannot be started and skipping is not enabled.
pub fn test_database() -> Option<TestDatabase> {
    let url = DATABASE_URL.get_or_init(resolve_database_url).clone()?;
    let serial = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
    Some(TestDatabase {
        url,
        _serial: serial,
    })
}
