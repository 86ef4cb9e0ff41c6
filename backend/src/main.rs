//! Notes service entry-point: loads settings, prepares storage, serves HTTP.

mod server;

use actix_web::web;
use color_eyre::eyre::{WrapErr as _, eyre};
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use notes_backend::inbound::http::health::HealthState;
use notes_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use notes_backend::settings::NotesSettings;

use server::{ServerConfig, create_server, drain_on, shutdown_signal};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

async fn connect_storage(
    settings: &NotesSettings,
    config: ServerConfig,
) -> color_eyre::Result<ServerConfig> {
    let Some(database_url) = settings.database_url() else {
        return Ok(config);
    };

    run_pending_migrations(database_url)
        .await
        .wrap_err("database schema setup failed")?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .wrap_err("database pool setup failed")?;
    Ok(config.with_db_pool(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = NotesSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;

    let config = connect_storage(&settings, ServerConfig::new(bind_addr)).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    actix_web::rt::spawn(drain_on(shutdown_signal(), health_state, server.handle()));
    info!(%bind_addr, "notes service listening");
    server.await.wrap_err("server terminated with an error")
}
