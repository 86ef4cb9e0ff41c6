//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `NOTES_*` environment variables, or a config
//! file, with the usual OrthoConfig precedence.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address `{value}`: {message}")]
    BindAddr { value: String, message: String },
}

/// Settings for the notes service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NOTES")]
pub struct NotesSettings {
    /// Socket address for the HTTP listener.
    #[ortho_config(default = String::from("0.0.0.0:8080"))]
    pub bind_addr: String,
    /// PostgreSQL connection URL. Notes are kept in memory when unset.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

impl NotesSettings {
    /// Parsed listener address.
    ///
    /// # Errors
    ///
    /// [`SettingsError::BindAddr`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .trim()
            .parse()
            .map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
                value: self.bind_addr.clone(),
                message: err.to_string(),
            })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool size.
    pub const fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }
}
